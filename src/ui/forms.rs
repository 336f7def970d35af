use crossterm::event::KeyCode;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::db::Store;
use crate::error::SubmitError;
use crate::models::{ClassRecord, Period};

/// What a form asks the shell to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormAction {
    None,
    Submit,
    Cancel,
}

/// Render one `Label: value` line, highlighting the focused field.
pub(crate) fn field_line(
    field_name: &str,
    value: &str,
    placeholder: &str,
    is_active: bool,
) -> Line<'static> {
    let display = if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ])
}

/// Render a `Label: < value >` selector line.
pub(crate) fn selector_line(
    field_name: &str,
    value: Option<&str>,
    is_active: bool,
) -> Line<'static> {
    let (display, style) = match value {
        Some(value) if is_active => (
            format!("< {value} >"),
            Style::default().fg(Color::Yellow),
        ),
        Some(value) => (format!("  {value}  "), Style::default()),
        None => (
            "<no classes available>".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ])
}

/// Fields available within the class form.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum ClassField {
    #[default]
    Name,
    Period,
}

/// Input state of the class-creation screen.
#[derive(Default, Clone, Debug)]
pub(crate) struct ClassForm {
    pub(crate) name: String,
    pub(crate) period: Period,
    pub(crate) active: ClassField,
    pub(crate) error: Option<String>,
}

impl ClassForm {
    pub(crate) fn handle_key(&mut self, code: KeyCode) -> FormAction {
        match code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.toggle_field(),
            KeyCode::Left if self.active == ClassField::Period => {
                self.period = self.period.previous();
            }
            KeyCode::Right | KeyCode::Char(' ') if self.active == ClassField::Period => {
                self.period = self.period.next();
            }
            KeyCode::Backspace if self.active == ClassField::Name => {
                self.name.pop();
            }
            KeyCode::Char(ch) if self.active == ClassField::Name && !ch.is_control() => {
                self.name.push(ch);
                self.error = None;
            }
            _ => {}
        }
        FormAction::None
    }

    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            ClassField::Name => ClassField::Period,
            ClassField::Period => ClassField::Name,
        };
    }

    /// Presence check on the trimmed name.
    pub(crate) fn parse_inputs(&self) -> Result<(String, Period), SubmitError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(SubmitError::Validation("Class name is required."));
        }
        Ok((name.to_string(), self.period))
    }

    /// Validate, save, and reset on success. On failure the inputs stay as
    /// typed and the message is kept for inline display.
    pub(crate) fn submit(&mut self, store: &Store) -> Result<ClassRecord, SubmitError> {
        let result = self
            .parse_inputs()
            .and_then(|(name, period)| {
                store.add_class(&name, period).map_err(SubmitError::from)
            });
        match &result {
            Ok(_) => self.reset(),
            Err(err) => self.error = Some(err.to_string()),
        }
        result
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn lines(&self) -> Vec<Line<'static>> {
        vec![
            field_line(
                "Class name",
                &self.name,
                "<required>",
                self.active == ClassField::Name,
            ),
            selector_line(
                "Period",
                Some(self.period.label()),
                self.active == ClassField::Period,
            ),
        ]
    }

    /// Cursor column offset and row for the text field, if one is focused.
    pub(crate) fn cursor(&self) -> Option<(u16, u16)> {
        match self.active {
            ClassField::Name => Some((
                ("Class name: ".len() + self.name.chars().count()) as u16,
                0,
            )),
            ClassField::Period => None,
        }
    }
}

/// Fields available within the student form.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum StudentField {
    #[default]
    Name,
    Email,
    Class,
}

impl StudentField {
    fn next(self) -> Self {
        match self {
            StudentField::Name => StudentField::Email,
            StudentField::Email => StudentField::Class,
            StudentField::Class => StudentField::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            StudentField::Name => StudentField::Class,
            StudentField::Email => StudentField::Name,
            StudentField::Class => StudentField::Email,
        }
    }
}

/// Input state of the student-creation screen, including the class list
/// captured when the screen was built.
#[derive(Default, Clone, Debug)]
pub(crate) struct StudentForm {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) classes: Vec<ClassRecord>,
    pub(crate) selected: Option<usize>,
    pub(crate) active: StudentField,
    pub(crate) error: Option<String>,
}

impl StudentForm {
    /// Seed the selector with the given classes, defaulting to the first.
    pub(crate) fn with_classes(classes: Vec<ClassRecord>) -> Self {
        let selected = if classes.is_empty() { None } else { Some(0) };
        Self {
            classes,
            selected,
            ..Self::default()
        }
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode) -> FormAction {
        match code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => self.active = self.active.next(),
            KeyCode::BackTab | KeyCode::Up => self.active = self.active.previous(),
            KeyCode::Left if self.active == StudentField::Class => self.cycle_class(-1),
            KeyCode::Right | KeyCode::Char(' ') if self.active == StudentField::Class => {
                self.cycle_class(1)
            }
            KeyCode::Backspace => {
                if let Some(field) = self.active_text_mut() {
                    field.pop();
                }
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                if let Some(field) = self.active_text_mut() {
                    field.push(ch);
                    self.error = None;
                }
            }
            _ => {}
        }
        FormAction::None
    }

    fn active_text_mut(&mut self) -> Option<&mut String> {
        match self.active {
            StudentField::Name => Some(&mut self.name),
            StudentField::Email => Some(&mut self.email),
            StudentField::Class => None,
        }
    }

    fn cycle_class(&mut self, offset: isize) {
        if let Some(current) = self.selected {
            let len = self.classes.len() as isize;
            self.selected = Some((current as isize + offset).rem_euclid(len) as usize);
        }
    }

    pub(crate) fn selected_class(&self) -> Option<&ClassRecord> {
        self.selected.and_then(|idx| self.classes.get(idx))
    }

    /// Presence checks on name and class. Returns the trimmed name, the
    /// optional email, and the chosen class identity.
    pub(crate) fn parse_inputs(&self) -> Result<(String, Option<String>, i64), SubmitError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(SubmitError::Validation("Student name is required."));
        }
        let class = self
            .selected_class()
            .ok_or(SubmitError::Validation("Select a class for the student."))?;
        let email = self.email.trim();
        let email = (!email.is_empty()).then(|| email.to_string());
        Ok((name.to_string(), email, class.id))
    }

    /// Validate, save, and reset on success. On failure the inputs stay as
    /// typed and the message is kept for inline display.
    pub(crate) fn submit(&mut self, store: &Store) -> Result<i64, SubmitError> {
        let result = self.parse_inputs().and_then(|(name, email, class_id)| {
            store
                .add_student(&name, email.as_deref(), Some(class_id))
                .map_err(SubmitError::from)
        });
        match &result {
            Ok(_) => self.reset(),
            Err(err) => self.error = Some(err.to_string()),
        }
        result
    }

    /// Clear the text fields and point the selector back at its first entry.
    pub(crate) fn reset(&mut self) {
        let classes = std::mem::take(&mut self.classes);
        *self = Self::with_classes(classes);
    }

    pub(crate) fn lines(&self) -> Vec<Line<'static>> {
        vec![
            field_line(
                "Student name",
                &self.name,
                "<required>",
                self.active == StudentField::Name,
            ),
            field_line(
                "Email",
                &self.email,
                "<optional>",
                self.active == StudentField::Email,
            ),
            selector_line(
                "Class",
                self.selected_class().map(|class| class.name.as_str()),
                self.active == StudentField::Class,
            ),
        ]
    }

    /// Cursor column offset and row for the focused text field, if any.
    pub(crate) fn cursor(&self) -> Option<(u16, u16)> {
        match self.active {
            StudentField::Name => Some((
                ("Student name: ".len() + self.name.chars().count()) as u16,
                0,
            )),
            StudentField::Email => Some((
                ("Email: ".len() + self.email.chars().count()) as u16,
                1,
            )),
            StudentField::Class => None,
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

    fn type_into(form: &mut impl FnMut(KeyCode) -> FormAction, text: &str) {
        for ch in text.chars() {
            form(KeyCode::Char(ch));
        }
    }

    #[test]
    fn test_class_form_rejects_whitespace_name() {
        let (_dir, store) = temp_store();
        let mut form = ClassForm {
            name: "   ".into(),
            ..ClassForm::default()
        };

        let err = form.submit(&store).unwrap_err();
        assert!(matches!(err, SubmitError::Validation(_)));
        assert_eq!(form.error.as_deref(), Some("Class name is required."));
        assert_eq!(form.name, "   ");
        assert!(store.list_classes().unwrap().is_empty());
    }

    #[test]
    fn test_class_form_saves_trimmed_name_and_resets() {
        let (_dir, store) = temp_store();
        let mut form = ClassForm::default();
        type_into(&mut |code| form.handle_key(code), "  Geometry ");
        form.handle_key(KeyCode::Tab);
        form.handle_key(KeyCode::Right);
        assert_eq!(form.period, Period::Afternoon);

        let class = form.submit(&store).unwrap();
        assert_eq!(class.name, "Geometry");
        assert_eq!(class.period, "Afternoon");
        assert!(form.name.is_empty());
        assert_eq!(form.period, Period::default());
    }

    #[test]
    fn test_class_form_keeps_input_on_duplicate() {
        let (_dir, store) = temp_store();
        store.add_class("Music", Period::Morning).unwrap();
        let mut form = ClassForm {
            name: "Music".into(),
            period: Period::Evening,
            ..ClassForm::default()
        };

        let err = form.submit(&store).unwrap_err();
        assert_eq!(err.title(), "Error");
        assert_eq!(form.name, "Music");
        assert_eq!(form.period, Period::Evening);
        assert_eq!(form.error.as_deref(), Some("Class 'Music' already exists."));
    }

    #[test]
    fn test_class_form_keys_route_to_focused_field() {
        let mut form = ClassForm::default();
        form.handle_key(KeyCode::Right);
        assert_eq!(form.period, Period::Morning);
        form.handle_key(KeyCode::Char('a'));
        form.handle_key(KeyCode::Char('b'));
        form.handle_key(KeyCode::Backspace);
        assert_eq!(form.name, "a");
        assert_eq!(form.handle_key(KeyCode::Enter), FormAction::Submit);
        assert_eq!(form.handle_key(KeyCode::Esc), FormAction::Cancel);
    }

    #[test]
    fn test_student_form_without_classes_blocks_submission() {
        let (_dir, store) = temp_store();
        let mut form = StudentForm::with_classes(store.list_classes().unwrap());
        form.name = "Orphan".into();
        assert!(form.selected.is_none());

        let err = form.submit(&store).unwrap_err();
        assert_eq!(err.to_string(), "Select a class for the student.");
        assert!(store.list_students_with_class().unwrap().is_empty());
    }

    #[test]
    fn test_student_form_requires_name_first() {
        let (_dir, store) = temp_store();
        let mut form = StudentForm::with_classes(Vec::new());
        form.email = "x@example.com".into();

        let err = form.submit(&store).unwrap_err();
        assert_eq!(err.to_string(), "Student name is required.");
        assert_eq!(form.email, "x@example.com");
    }

    #[test]
    fn test_student_form_saves_selected_class() {
        let (_dir, store) = temp_store();
        store.add_class("Alpha", Period::Morning).unwrap();
        let beta = store.add_class("Beta", Period::Evening).unwrap();

        let mut form = StudentForm::with_classes(store.list_classes().unwrap());
        type_into(&mut |code| form.handle_key(code), "Grace");
        form.handle_key(KeyCode::Tab);
        type_into(&mut |code| form.handle_key(code), "grace@example.com");
        form.handle_key(KeyCode::Tab);
        form.handle_key(KeyCode::Right);
        assert_eq!(form.selected_class().map(|c| c.id), Some(beta.id));

        form.submit(&store).unwrap();
        assert!(form.name.is_empty());
        assert!(form.email.is_empty());
        assert_eq!(form.selected, Some(0));
        assert_eq!(form.classes.len(), 2);

        let students = store.list_students_with_class().unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].class_name, "Beta");
        assert_eq!(students[0].email.as_deref(), Some("grace@example.com"));
    }

    #[test]
    fn test_student_form_class_selector_wraps() {
        let classes = vec![
            ClassRecord {
                id: 1,
                name: "A".into(),
                period: "Morning".into(),
            },
            ClassRecord {
                id: 2,
                name: "B".into(),
                period: "Morning".into(),
            },
        ];
        let mut form = StudentForm::with_classes(classes);
        form.active = StudentField::Class;
        form.handle_key(KeyCode::Left);
        assert_eq!(form.selected, Some(1));
        form.handle_key(KeyCode::Right);
        assert_eq!(form.selected, Some(0));
    }
}
