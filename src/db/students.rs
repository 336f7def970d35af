use log::{error, info};
use rusqlite::{params, Connection};

use super::Store;
use crate::error::{SqlContext, StoreError};
use crate::models::{StudentListing, NO_CLASS_LABEL};

impl Store {
    /// Register a student. `class_id` is written as given; nothing checks
    /// that it points at an existing class. Returns the new identity.
    pub fn add_student(
        &self,
        name: &str,
        email: Option<&str>,
        class_id: Option<i64>,
    ) -> Result<i64, StoreError> {
        self.write(|conn| insert_student(conn, name, email, class_id))
            .inspect(|id| info!("added student {name} ({id})"))
            .inspect_err(|err| error!("failed to add student {name}: {err}"))
    }

    /// Every student ordered by name, joined with its class name.
    pub fn list_students_with_class(&self) -> Result<Vec<StudentListing>, StoreError> {
        self.read(fetch_students_with_class)
            .inspect_err(|err| error!("failed to list students: {err}"))
    }
}

/// Load students with a LEFT JOIN so missing or dangling class references
/// still produce a row, labelled with [`NO_CLASS_LABEL`].
pub fn fetch_students_with_class(conn: &Connection) -> Result<Vec<StudentListing>, StoreError> {
    let mut stmt = conn
        .prepare(
            "SELECT s.id, s.name, s.email, COALESCE(c.name, ?1)
             FROM student s
             LEFT JOIN class c ON s.class_id = c.id
             ORDER BY s.name",
        )
        .context("failed to prepare student query")?;

    let students = stmt
        .query_map([NO_CLASS_LABEL], |row| {
            Ok(StudentListing {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                class_name: row.get(3)?,
            })
        })
        .context("failed to load students")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect students")?;

    Ok(students)
}

/// Insert a student row. Blank emails are stored as NULL.
pub fn insert_student(
    conn: &Connection,
    name: &str,
    email: Option<&str>,
    class_id: Option<i64>,
) -> Result<i64, StoreError> {
    let email = email.map(str::trim).filter(|e| !e.is_empty());
    conn.execute(
        "INSERT INTO student (name, email, class_id) VALUES (?1, ?2, ?3)",
        params![name, email, class_id],
    )
    .context("failed to insert student")?;

    Ok(conn.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Period;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("school.sqlite"));
        (dir, store)
    }

    #[test]
    fn test_student_is_listed_with_its_class_name() {
        let (_dir, store) = temp_store();
        let class = store.add_class("Physics", Period::Morning).unwrap();

        let id = store
            .add_student("Ada", Some("ada@example.com"), Some(class.id))
            .unwrap();

        let students = store.list_students_with_class().unwrap();
        assert_eq!(
            students,
            vec![StudentListing {
                id,
                name: "Ada".into(),
                email: Some("ada@example.com".into()),
                class_name: "Physics".into(),
            }]
        );
    }

    #[test]
    fn test_students_are_ordered_by_name() {
        let (_dir, store) = temp_store();
        let class = store.add_class("Art", Period::Evening).unwrap();
        for name in ["Zoe", "Mia", "Ben"] {
            store.add_student(name, None, Some(class.id)).unwrap();
        }

        let names: Vec<String> = store
            .list_students_with_class()
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Ben", "Mia", "Zoe"]);
    }

    #[test]
    fn test_null_class_reference_uses_placeholder() {
        let (_dir, store) = temp_store();
        store.add_student("Loner", None, None).unwrap();

        let students = store.list_students_with_class().unwrap();
        assert_eq!(students[0].class_name, NO_CLASS_LABEL);
    }

    #[test]
    fn test_deleted_class_falls_back_to_placeholder() {
        let (_dir, store) = temp_store();
        let class = store.add_class("Latin", Period::Afternoon).unwrap();
        store.add_student("Cato", None, Some(class.id)).unwrap();

        let conn = Connection::open(store.path()).unwrap();
        conn.execute("DELETE FROM class WHERE id = ?1", [class.id]).unwrap();
        drop(conn);

        let students = store.list_students_with_class().unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].name, "Cato");
        assert_eq!(students[0].class_name, NO_CLASS_LABEL);
    }

    #[test]
    fn test_unknown_class_id_is_accepted() {
        let (_dir, store) = temp_store();
        store.add_student("Ghost", None, Some(9_999)).unwrap();

        let students = store.list_students_with_class().unwrap();
        assert_eq!(students[0].class_name, NO_CLASS_LABEL);
    }

    #[test]
    fn test_blank_email_is_stored_as_null() {
        let (_dir, store) = temp_store();
        store.add_student("Quiet", Some("   "), None).unwrap();

        let students = store.list_students_with_class().unwrap();
        assert_eq!(students[0].email, None);
        assert_eq!(students[0].email_display(), "");
    }

    #[test]
    fn test_unavailable_store_reports_errors() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let store = Store::open(blocker.join("school.sqlite"));

        assert!(matches!(
            store.add_student("Ada", None, None),
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.list_students_with_class(),
            Err(StoreError::Unavailable(_))
        ));
    }
}
