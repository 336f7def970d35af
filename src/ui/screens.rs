use std::cmp::min;

use ratatui::layout::Constraint;

use super::menu::{Command, ScreenId};
use crate::error::StoreError;
use crate::models::{ClassRecord, StudentListing};

/// Shortcut buttons on the welcome panel.
pub(crate) const WELCOME_SHORTCUTS: &[(&str, Command)] = &[
    ("List Students", Command::Open(ScreenId::ListStudents)),
    ("List Classes", Command::Open(ScreenId::ListClasses)),
];

/// Landing panel shown at launch.
#[derive(Debug, Default, Clone)]
pub(crate) struct WelcomeScreen {
    pub(crate) selected: usize,
}

impl WelcomeScreen {
    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = WELCOME_SHORTCUTS.len() as isize;
        self.selected = (self.selected as isize + offset).rem_euclid(len) as usize;
    }

    pub(crate) fn current_command(&self) -> Command {
        WELCOME_SHORTCUTS[self.selected].1
    }
}

/// A record type that can be shown in one of the fixed-column tables.
pub(crate) trait TableRow {
    const TITLE: &'static str;
    const HEADERS: &'static [&'static str];
    /// Shown instead of the table when the read succeeded with no rows.
    const EMPTY_MESSAGE: &'static str;

    fn widths() -> Vec<Constraint>;
    fn cells(&self) -> Vec<String>;
}

impl TableRow for ClassRecord {
    const TITLE: &'static str = "Classes";
    const HEADERS: &'static [&'static str] = &["ID", "Class Name", "Period"];
    const EMPTY_MESSAGE: &'static str = "No classes registered yet.";

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Length(6),
            Constraint::Percentage(60),
            Constraint::Min(10),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), self.period.clone()]
    }
}

impl TableRow for StudentListing {
    const TITLE: &'static str = "Students";
    const HEADERS: &'static [&'static str] = &["ID", "Student Name", "Email", "Class"];
    const EMPTY_MESSAGE: &'static str = "No students registered yet.";

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Length(6),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Min(10),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email_display().to_string(),
            self.class_name.clone(),
        ]
    }
}

/// Read-only table populated by one store read. A failed read is kept as
/// its diagnostic so it never renders as an empty table.
#[derive(Debug)]
pub(crate) struct ListScreen<T> {
    pub(crate) rows: Result<Vec<T>, String>,
    pub(crate) selected: usize,
}

pub(crate) type ClassListScreen = ListScreen<ClassRecord>;
pub(crate) type StudentListScreen = ListScreen<StudentListing>;

impl<T> ListScreen<T> {
    pub(crate) fn new(rows: Result<Vec<T>, StoreError>) -> Self {
        Self {
            rows: rows.map_err(|err| err.to_string()),
            selected: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.as_ref().map_or(0, Vec::len)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = self.len();
        if len == 0 {
            return;
        }
        let new = (self.selected as isize + offset).clamp(0, len as isize - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.len().saturating_sub(1);
    }

    /// Index to highlight, clamped to the rows actually present.
    pub(crate) fn highlighted(&self) -> Option<usize> {
        match self.len() {
            0 => None,
            len => Some(min(self.selected, len - 1)),
        }
    }
}
