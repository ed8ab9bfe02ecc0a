//! CLI command handlers. Each command is in its own file.

mod fix_page;
mod repair;
mod site;

pub use fix_page::run_fix_page;
pub use repair::{run_repair, RepairPasses};
pub use site::SiteArgs;
