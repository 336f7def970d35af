//! Error taxonomy shared by the store and the form screens.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while talking to the SQLite file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint on `class.name` rejected the insert.
    #[error("Class '{0}' already exists.")]
    DuplicateClass(String),
    #[error("{context}: {source}")]
    Sqlite {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to create data directory {}: {}", .path.display(), .source)]
    DataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Table creation failed when the store was opened; the session keeps
    /// this error for every later operation.
    #[error("database unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::DuplicateClass(_))
    }
}

/// Attach a short description to a raw `rusqlite` failure.
pub(crate) trait SqlContext<T> {
    fn context(self, context: &'static str) -> Result<T, StoreError>;
}

impl<T> SqlContext<T> for Result<T, rusqlite::Error> {
    fn context(self, context: &'static str) -> Result<T, StoreError> {
        self.map_err(|source| StoreError::Sqlite { context, source })
    }
}

/// Outcome of submitting one of the creation forms.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A required field was empty; the store was never called.
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SubmitError {
    /// Dialog heading matching the error category.
    pub fn title(&self) -> &'static str {
        match self {
            SubmitError::Validation(_) => "Validation error",
            SubmitError::Store(err) if err.is_duplicate() => "Error",
            SubmitError::Store(_) => "Database error",
        }
    }
}
