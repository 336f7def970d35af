use ratatui::style::{Color, Style};

use crate::config::{APP_AUTHORS, APP_DESCRIPTION, APP_TITLE};
use crate::error::SubmitError;

/// Severity of a modal message, which picks its border colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Validation,
    Error,
}

impl DialogKind {
    pub(crate) fn style(self) -> Style {
        match self {
            DialogKind::Info => Style::default().fg(Color::Green),
            DialogKind::Validation => Style::default().fg(Color::Yellow),
            DialogKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Modal message drawn over the whole frame until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub body: String,
}

impl Dialog {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Info,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Error,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Static "about" text. Performs no data access.
    pub fn about() -> Self {
        Self::info(
            "About",
            format!(
                "{APP_TITLE} {}\n\nDescription:\n{APP_DESCRIPTION}\n\nDeveloped by:\n{APP_AUTHORS}",
                env!("CARGO_PKG_VERSION")
            ),
        )
    }
}

impl From<&SubmitError> for Dialog {
    fn from(err: &SubmitError) -> Self {
        let kind = match err {
            SubmitError::Validation(_) => DialogKind::Validation,
            SubmitError::Store(_) => DialogKind::Error,
        };
        Self {
            kind,
            title: err.title().to_string(),
            body: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn test_about_mentions_title_and_authors() {
        let about = Dialog::about();
        assert_eq!(about.kind, DialogKind::Info);
        assert!(about.body.contains(APP_TITLE));
        assert!(about.body.contains(APP_AUTHORS));
    }

    #[test]
    fn test_submit_errors_map_to_dialog_kinds() {
        let validation = Dialog::from(&SubmitError::Validation("Class name is required."));
        assert_eq!(validation.kind, DialogKind::Validation);
        assert_eq!(validation.body, "Class name is required.");

        let duplicate = Dialog::from(&SubmitError::from(StoreError::DuplicateClass("X".into())));
        assert_eq!(duplicate.kind, DialogKind::Error);
        assert_eq!(duplicate.title, "Error");
        assert_eq!(duplicate.body, "Class 'X' already exists.");
    }
}
