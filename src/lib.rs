//! Core library surface for the School Registry TUI application.
//!
//! The binary wires these pieces together: resolve the data directory,
//! install the file logger, open the SQLite store, and hand it to the
//! Ratatui event loop.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

/// Persistence entry point. Each operation opens its own connection.
pub use db::Store;

pub use config::AppConfig;
pub use error::{StoreError, SubmitError};
pub use models::{ClassRecord, Period, StudentListing, NO_CLASS_LABEL};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
