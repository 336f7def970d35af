//! Filesystem layout and static application metadata. The application takes
//! no command-line arguments or environment variables; everything it needs is
//! derived from the user's home directory.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".school-registry";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "school.sqlite";
/// Log file written next to the database while the TUI owns the terminal.
const LOG_FILE_NAME: &str = "school-registry.log";

pub const APP_TITLE: &str = "School Registry";
pub const APP_DESCRIPTION: &str =
    "Terminal application for registering students and classes in a local SQLite file.";
pub const APP_AUTHORS: &str = "The School Registry maintainers";

/// Resolved paths for one run of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl AppConfig {
    /// Locate the data directory inside the user's home.
    pub fn from_home() -> Result<Self> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::in_dir(base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    /// Lay out the database and log files beneath an explicit directory.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_path: data_dir.join(LOG_FILE_NAME),
            data_dir,
        }
    }
}
