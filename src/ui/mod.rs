//! Ratatui front-end. `App` owns the current screen and overlays; the
//! `terminal` module drives it from crossterm key events.

mod app;
mod dialog;
mod forms;
mod helpers;
mod menu;
mod screens;
mod terminal;

pub use app::App;
pub use dialog::{Dialog, DialogKind};
pub use menu::{Command, ScreenId};
pub use terminal::run_app;
