//! File-backed logger. The terminal belongs to the TUI, so records go to the
//! log file inside the data directory instead of stderr.

use std::fs::{self, OpenOptions};

use anyhow::{Context, Result};
use env_logger::{Builder, Target};
use log::LevelFilter;

use crate::config::AppConfig;

/// Install the global logger. Fails if the log file cannot be opened or a
/// logger is already installed.
pub fn init(config: &AppConfig) -> Result<()> {
    fs::create_dir_all(&config.data_dir).context("failed to create data directory")?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("failed to open log file {}", config.log_path.display()))?;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp_secs()
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to install logger")?;

    Ok(())
}
