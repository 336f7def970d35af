use log::{error, info, warn};
use rusqlite::{ffi, params, Connection, Error as SqlError, ErrorCode};

use super::Store;
use crate::error::{SqlContext, StoreError};
use crate::models::{ClassRecord, Period};

impl Store {
    /// Register a new class. A name that is already taken yields
    /// [`StoreError::DuplicateClass`] and leaves the table untouched.
    pub fn add_class(&self, name: &str, period: Period) -> Result<ClassRecord, StoreError> {
        let result = self.write(|conn| insert_class(conn, name, period));
        match &result {
            Ok(class) => info!("added class {} ({})", class.name, class.id),
            Err(err) if err.is_duplicate() => warn!("rejected duplicate class {name}"),
            Err(err) => error!("failed to add class {name}: {err}"),
        }
        result
    }

    /// Every class ordered by name. An empty vector means the table is empty;
    /// failures come back as `Err`.
    pub fn list_classes(&self) -> Result<Vec<ClassRecord>, StoreError> {
        self.read(fetch_classes).inspect_err(|err| error!("failed to list classes: {err}"))
    }
}

/// Retrieve every class sorted by name. The query is the single source of
/// truth for how classes are ordered in both the list screen and the student
/// form's selector.
pub fn fetch_classes(conn: &Connection) -> Result<Vec<ClassRecord>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT id, name, COALESCE(period, '') FROM class ORDER BY name")
        .context("failed to prepare class query")?;

    let classes = stmt
        .query_map([], |row| {
            Ok(ClassRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                period: row.get(2)?,
            })
        })
        .context("failed to load classes")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect classes")?;

    Ok(classes)
}

/// Insert a class row, returning the hydrated record.
pub fn insert_class(
    conn: &Connection,
    name: &str,
    period: Period,
) -> Result<ClassRecord, StoreError> {
    conn.execute(
        "INSERT INTO class (name, period) VALUES (?1, ?2)",
        params![name, period.label()],
    )
    .map_err(|err| map_unique_constraint(err, name))?;

    Ok(ClassRecord {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        period: period.label().to_string(),
    })
}

/// Turn the unique-name violation into its own variant. Other constraint
/// failures stay generic.
fn map_unique_constraint(err: SqlError, name: &str) -> StoreError {
    let unique_violation = match &err {
        SqlError::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    };

    if unique_violation {
        StoreError::DuplicateClass(name.to_string())
    } else {
        StoreError::Sqlite {
            context: "failed to insert class",
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("school.sqlite"));
        (dir, store)
    }

    fn class_count(store: &Store) -> i64 {
        store
            .read(|conn| {
                conn.query_row("SELECT COUNT(*) FROM class", [], |row| row.get(0))
                    .context("count")
            })
            .unwrap()
    }

    fn names(classes: &[ClassRecord]) -> Vec<&str> {
        classes.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_list_classes_empty_is_ok() {
        let (_dir, store) = temp_store();
        assert!(store.list_classes().unwrap().is_empty());
    }

    #[test]
    fn test_add_class_assigns_identity_and_lists_in_name_order() {
        let (_dir, store) = temp_store();
        store.add_class("Chemistry", Period::Afternoon).unwrap();
        store.add_class("Biology", Period::Morning).unwrap();

        let added = store.add_class("Calculus", Period::Evening).unwrap();
        assert!(added.id > 0);
        assert_eq!(added.period, "Evening");

        let classes = store.list_classes().unwrap();
        assert_eq!(names(&classes), vec!["Biology", "Calculus", "Chemistry"]);
        assert_eq!(classes[1], added);
    }

    #[test]
    fn test_list_order_is_independent_of_insertion_order() {
        let (_dir, store) = temp_store();
        store.add_class("Zeta", Period::Morning).unwrap();
        store.add_class("Alpha", Period::FullTime).unwrap();

        assert_eq!(names(&store.list_classes().unwrap()), vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_duplicate_name_is_rejected_without_writing() {
        let (_dir, store) = temp_store();
        store.add_class("History", Period::Morning).unwrap();
        assert_eq!(class_count(&store), 1);

        let err = store.add_class("History", Period::Evening).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(err.to_string(), "Class 'History' already exists.");
        assert_eq!(class_count(&store), 1);
    }

    #[test]
    fn test_unavailable_store_reports_errors_instead_of_empty_lists() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let store = Store::open(blocker.join("school.sqlite"));

        assert!(matches!(
            store.list_classes(),
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.add_class("Art", Period::Morning),
            Err(StoreError::Unavailable(_))
        ));
    }
}
