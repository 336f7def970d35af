//! Binary entry point that glues the SQLite store to the TUI: resolve the data
//! directory, start logging, prepare the database, and drive the Ratatui event
//! loop until the user exits.
use log::{info, warn};
use school_registry::{logging, run_app, App, AppConfig, Store};

/// A failed table creation does not stop start-up; the window opens in a
/// degraded state and shows the error. Only terminal failures bubble up.
fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_home()?;
    if let Err(err) = logging::init(&config) {
        eprintln!("logging disabled: {err:#}");
    }
    info!("starting {} {}", school_registry::config::APP_TITLE, env!("CARGO_PKG_VERSION"));

    let store = Store::open(&config.db_path);
    if let Some(reason) = store.schema_error() {
        warn!("continuing without a usable database: {reason}");
    }

    let mut app = App::new(store);
    run_app(&mut app)
}
