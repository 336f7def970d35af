//! Persistence layer split across logical submodules. `Store` opens a fresh
//! SQLite connection per operation; the free functions run a single query
//! against whatever connection they are handed.

mod classes;
mod connection;
mod students;

pub use classes::{fetch_classes, insert_class};
pub use connection::{ensure_schema, Store};
pub use students::{fetch_students_with_class, insert_student};
