//! relink core: find hardcoded upload links on a migrated domain and point
//! them at the offloaded copies of the same files.

pub mod config;
pub mod error;
pub mod filename;
pub mod gate;
pub mod logging;
pub mod model;
pub mod offload;
pub mod repair;
pub mod scan;
pub mod serialized;
pub mod store;

pub use error::{RelinkError, Result};
