//! CLI for relink.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use relink_core::config::{self, RelinkConfig};
use std::path::PathBuf;

use commands::{run_fix_page, run_repair, RepairPasses, SiteArgs};

/// Top-level CLI for relink.
#[derive(Debug, Parser)]
#[command(name = "relink")]
#[command(about = "relink: point hardcoded upload links at offloaded media", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/relink/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// WordPress database URL (overrides the config file).
    #[arg(long, global = true, env = "RELINK_DATABASE_URL", value_name = "URL")]
    pub database_url: Option<String>,

    /// Base table prefix (overrides the config file).
    #[arg(long, global = true, value_name = "PREFIX")]
    pub table_prefix: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Repair every in-scope document body, then metadata values.
    Repair {
        /// Site to work on; in a multisite network, the site's host.
        #[arg(long)]
        url: Option<String>,

        /// Domain the broken links point at (default: the site's own host).
        #[arg(long)]
        domain: Option<String>,

        /// Report what would change without writing anything.
        #[arg(long)]
        dry_run: bool,

        /// Skip the document body pass.
        #[arg(long)]
        skip_content: bool,

        /// Skip the metadata pass.
        #[arg(long)]
        skip_meta: bool,
    },

    /// Repair one document and report the outcome of every link.
    FixPage {
        /// Document (post) identifier.
        id: u64,

        /// Site to work on; in a multisite network, the site's host.
        #[arg(long)]
        url: Option<String>,

        /// Domain the broken links point at (default: the site's own host).
        #[arg(long)]
        domain: Option<String>,

        /// Report what would change without writing anything.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Config file (explicit or default) with command-line overrides applied.
fn load_config(cli: &Cli) -> Result<RelinkConfig> {
    let mut cfg = match &cli.config {
        Some(path) => config::load_from(path)?,
        None => config::load_or_init()?,
    };
    if let Some(url) = &cli.database_url {
        cfg.database_url = url.clone();
    }
    if let Some(prefix) = &cli.table_prefix {
        cfg.table_prefix = prefix.clone();
    }
    Ok(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(&cli)?;
        tracing::debug!(prefix = %cfg.table_prefix, multisite = cfg.multisite, "loaded config");

        match cli.command {
            CliCommand::Repair {
                url,
                domain,
                dry_run,
                skip_content,
                skip_meta,
            } => {
                let site = SiteArgs { url, domain, dry_run };
                let passes = RepairPasses {
                    content: !skip_content,
                    meta: !skip_meta,
                };
                run_repair(&cfg, &site, passes).await?;
            }
            CliCommand::FixPage {
                id,
                url,
                domain,
                dry_run,
            } => {
                let site = SiteArgs { url, domain, dry_run };
                run_fix_page(&cfg, &site, id).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
