//! Tracing setup. Runs go to an append-only log under the XDG state dir so a
//! bulk repair leaves a record of every link it touched; stderr is the
//! fallback when that file cannot be opened.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,relink=debug,relink_core=debug";

/// Environment variable that moves the log file away from the XDG default.
pub const LOG_FILE_ENV: &str = "RELINK_LOG_FILE";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `$RELINK_LOG_FILE`, else `~/.local/state/relink/relink.log`.
pub fn log_file_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(LOG_FILE_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let xdg_dirs = xdg::BaseDirectories::with_prefix("relink")?;
    Ok(xdg_dirs.get_state_home().join("relink.log"))
}

fn open_log(path: &Path) -> Result<fs::File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log dir {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}

/// Installs the global subscriber writing to [`log_file_path`].
/// Errors leave no subscriber installed, so the caller can fall back to
/// [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    let file = open_log(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing::info!(path = %path.display(), "relink logging initialized");
    Ok(())
}

/// Stderr-only subscriber; never fails.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
