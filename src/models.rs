//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. These types stay light-weight data holders so the store can focus on
//! queries and the screens can focus on presentation.

use std::fmt;

/// Label shown for a student whose class reference is NULL or no longer
/// resolves to a row in the `class` table.
pub const NO_CLASS_LABEL: &str = "No class";

/// Time-of-day slot a class meets in. Stored as its label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Morning,
    Afternoon,
    Evening,
    FullTime,
}

impl Period {
    /// Every period in selector order. The first entry is the form default.
    pub const ALL: [Period; 4] = [
        Period::Morning,
        Period::Afternoon,
        Period::Evening,
        Period::FullTime,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Period::Morning => "Morning",
            Period::Afternoon => "Afternoon",
            Period::Evening => "Evening",
            Period::FullTime => "Full-time",
        }
    }

    /// Cycle forward through [`Period::ALL`], wrapping at the end.
    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Cycle backward through [`Period::ALL`], wrapping at the start.
    pub fn previous(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|period| *period == self)
            .unwrap_or(0)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the `class` table.
pub struct ClassRecord {
    /// Surrogate key assigned by SQLite.
    pub id: i64,
    /// Unique display name. The student form resolves selections through it.
    pub name: String,
    /// Period label as stored. Kept as text so rows written by other tools
    /// still list instead of failing to decode.
    pub period: String,
}

impl fmt::Display for ClassRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A student row joined with the name of its class.
pub struct StudentListing {
    pub id: i64,
    pub name: String,
    /// `None` when the student was saved without an email.
    pub email: Option<String>,
    /// Class name, or [`NO_CLASS_LABEL`] when the reference is NULL or dangling.
    pub class_name: String,
}

impl StudentListing {
    /// Email text for table cells, blank when absent.
    pub fn email_display(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_default_is_first_entry() {
        assert_eq!(Period::default(), Period::ALL[0]);
    }

    #[test]
    fn test_period_cycling_wraps() {
        assert_eq!(Period::FullTime.next(), Period::Morning);
        assert_eq!(Period::Morning.previous(), Period::FullTime);
        assert_eq!(Period::Afternoon.next(), Period::Evening);
    }
}
