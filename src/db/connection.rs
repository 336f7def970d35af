use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};
use rusqlite::Connection;

use crate::error::{SqlContext, StoreError};

/// Create both tables if they are missing. Safe to run on every start.
///
/// The `foreign_keys` pragma is left off: a student may keep a `class_id`
/// that no longer resolves, and listings show it as unassigned instead.
pub fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS class (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            period TEXT
        )",
        [],
    )
    .context("failed to create class table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS student (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT,
            class_id INTEGER,
            FOREIGN KEY (class_id) REFERENCES class(id)
        )",
        [],
    )
    .context("failed to create student table")?;

    Ok(())
}

/// Handle to the on-disk database. Holds only the path; each operation opens
/// its own connection and drops it before returning.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    schema: Result<(), String>,
}

impl Store {
    /// Prepare the database file and its tables. A failure does not abort:
    /// it is kept on the store and returned by every later operation.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let schema = match prepare(&path) {
            Ok(()) => {
                info!("database ready at {}", path.display());
                Ok(())
            }
            Err(err) => {
                error!("failed to create tables in {}: {err}", path.display());
                Err(err.to_string())
            }
        };
        Self { path, schema }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Diagnostic from table creation, if it failed.
    pub fn schema_error(&self) -> Option<&str> {
        self.schema.as_ref().err().map(String::as_str)
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        if let Err(reason) = &self.schema {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        Connection::open(&self.path).context("failed to open SQLite database")
    }

    /// Run a read-only operation on a fresh connection.
    pub(crate) fn read<T>(
        &self,
        op: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self.connect()?;
        op(&conn)
    }

    /// Run a write on a fresh connection and commit it. The transaction rolls
    /// back on drop when `op` fails.
    pub(crate) fn write<T>(
        &self,
        op: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction().context("failed to begin transaction")?;
        let value = op(&tx)?;
        tx.commit().context("failed to commit transaction")?;
        Ok(value)
    }
}

fn prepare(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::DataDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    ensure_schema(&conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table_names(path: &Path) -> Vec<String> {
        let conn = Connection::open(path).unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name IN ('class', 'student')
                 ORDER BY name",
            )
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn test_open_creates_directory_and_tables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("school.sqlite");

        let store = Store::open(&path);

        assert!(store.schema_error().is_none());
        assert!(path.exists());
        assert_eq!(table_names(&path), vec!["class", "student"]);
    }

    #[test]
    fn test_schema_creation_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("school.sqlite");

        let first = Store::open(&path);
        first.write(|conn| {
            conn.execute("INSERT INTO class (name, period) VALUES ('Keep', 'Morning')", [])
                .context("seed")
        })
        .unwrap();

        let second = Store::open(&path);
        assert!(second.schema_error().is_none());
        let count: i64 = second
            .read(|conn| {
                conn.query_row("SELECT COUNT(*) FROM class", [], |row| row.get(0))
                    .context("count")
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_failed_schema_makes_store_unavailable() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "plain file").unwrap();

        let store = Store::open(blocker.join("school.sqlite"));

        let reason = store.schema_error().expect("schema should fail");
        assert!(reason.contains("failed to create data directory"));
        let err = store.read(|_| Ok(())).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn test_failed_write_is_rolled_back() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("school.sqlite"));

        let result: Result<(), StoreError> = store.write(|conn| {
            conn.execute("INSERT INTO class (name, period) VALUES ('Gone', 'Morning')", [])
                .context("seed")?;
            Err(StoreError::Unavailable("abort".into()))
        });
        assert!(result.is_err());

        let count: i64 = store
            .read(|conn| {
                conn.query_row("SELECT COUNT(*) FROM class", [], |row| row.get(0))
                    .context("count")
            })
            .unwrap();
        assert_eq!(count, 0);
    }
}
