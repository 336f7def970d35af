use std::mem;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
    Wrap,
};
use ratatui::Frame;

use crate::config::APP_TITLE;
use crate::db::Store;
use crate::error::StoreError;

use super::dialog::Dialog;
use super::forms::{ClassForm, FormAction, StudentForm};
use super::helpers::{centered_rect, key_hint};
use super::menu::{Command, MenuState, ScreenId, MENU};
use super::screens::{
    ClassListScreen, ListScreen, StudentListScreen, TableRow, WelcomeScreen, WELCOME_SHORTCUTS,
};

/// Menu bar occupies the first line of the frame.
const MENU_HEIGHT: u16 = 1;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// The single screen occupying the content region. Each variant owns its
/// own input or table state.
enum Screen {
    Welcome(WelcomeScreen),
    ClassForm(ClassForm),
    StudentForm(StudentForm),
    ClassList(ClassListScreen),
    StudentList(StudentListScreen),
}

impl Screen {
    fn id(&self) -> ScreenId {
        match self {
            Screen::Welcome(_) => ScreenId::Welcome,
            Screen::ClassForm(_) => ScreenId::CreateClass,
            Screen::StudentForm(_) => ScreenId::CreateStudent,
            Screen::ClassList(_) => ScreenId::ListClasses,
            Screen::StudentList(_) => ScreenId::ListStudents,
        }
    }
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state: the store handle, the current screen, and the
/// overlays drawn on top of it.
pub struct App {
    store: Store,
    screen: Screen,
    menu: Option<MenuState>,
    dialog: Option<Dialog>,
    status: Option<StatusMessage>,
}

impl App {
    /// Start on the welcome panel. A store whose tables could not be created
    /// still opens, with the failure shown in an error dialog.
    pub fn new(store: Store) -> Self {
        let dialog = store.schema_error().map(|reason| {
            Dialog::error("Database error", format!("Failed to create tables: {reason}"))
        });
        Self {
            store,
            screen: Screen::Welcome(WelcomeScreen::default()),
            menu: None,
            dialog,
            status: None,
        }
    }

    pub fn screen_id(&self) -> ScreenId {
        self.screen.id()
    }

    /// The dialog currently blocking input, if any.
    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Route a terminal key event. Characters chorded with Ctrl or Alt are
    /// shortcuts, not text, and are dropped here.
    pub fn handle_key_event(&mut self, event: KeyEvent) -> bool {
        let chorded = event
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        if chorded && matches!(event.code, KeyCode::Char(_)) {
            return false;
        }
        self.handle_key(event.code)
    }

    /// Route one key press. Returns `true` when the application should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.dialog.is_some() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc) {
                self.dialog = None;
            }
            return false;
        }

        if let Some(mut menu) = self.menu {
            match code {
                KeyCode::Esc | KeyCode::F(10) => {
                    self.menu = None;
                    return false;
                }
                KeyCode::Enter => {
                    self.menu = None;
                    return self.dispatch(menu.current_command());
                }
                KeyCode::Left | KeyCode::BackTab => menu.move_group(-1),
                KeyCode::Right | KeyCode::Tab => menu.move_group(1),
                KeyCode::Up => menu.move_item(-1),
                KeyCode::Down => menu.move_item(1),
                _ => {}
            }
            self.menu = Some(menu);
            return false;
        }

        match code {
            KeyCode::F(10) => {
                self.menu = Some(MenuState::default());
                false
            }
            KeyCode::F(1) => self.dispatch(Command::About),
            KeyCode::F(5) => self.dispatch(Command::Refresh),
            _ => match self.handle_screen_key(code) {
                Some(command) => self.dispatch(command),
                None => false,
            },
        }
    }

    /// Perform a command. Returns `true` for [`Command::Quit`].
    pub fn dispatch(&mut self, command: Command) -> bool {
        match command {
            Command::Open(id) => self.navigate(id),
            Command::Refresh => {
                // Forms hold unsaved input; only the tables re-read.
                if matches!(self.screen, Screen::ClassList(_) | Screen::StudentList(_)) {
                    self.navigate(self.screen.id());
                }
            }
            Command::About => self.dialog = Some(Dialog::about()),
            Command::Quit => return true,
        }
        false
    }

    /// Discard the current screen, then build `id` from scratch, running
    /// its store read if it has one.
    pub fn navigate(&mut self, id: ScreenId) {
        debug!("navigating from {:?} to {id:?}", self.screen.id());
        let previous = mem::replace(&mut self.screen, Screen::Welcome(WelcomeScreen::default()));
        drop(previous);
        self.clear_status();
        self.screen = self.build_screen(id);
    }

    fn build_screen(&mut self, id: ScreenId) -> Screen {
        match id {
            ScreenId::Welcome => Screen::Welcome(WelcomeScreen::default()),
            ScreenId::CreateClass => Screen::ClassForm(ClassForm::default()),
            ScreenId::CreateStudent => {
                let classes = self.store.list_classes();
                self.report_read_error(&classes);
                Screen::StudentForm(StudentForm::with_classes(classes.unwrap_or_default()))
            }
            ScreenId::ListClasses => {
                let rows = self.store.list_classes();
                self.report_read_error(&rows);
                Screen::ClassList(ListScreen::new(rows))
            }
            ScreenId::ListStudents => {
                let rows = self.store.list_students_with_class();
                self.report_read_error(&rows);
                Screen::StudentList(ListScreen::new(rows))
            }
        }
    }

    fn report_read_error<T>(&mut self, result: &Result<T, StoreError>) {
        if let Err(err) = result {
            self.set_status(err.to_string(), StatusKind::Error);
            self.dialog = Some(Dialog::error("Database error", err.to_string()));
        }
    }

    fn handle_screen_key(&mut self, code: KeyCode) -> Option<Command> {
        match &mut self.screen {
            Screen::Welcome(welcome) => match code {
                KeyCode::Up | KeyCode::BackTab => welcome.move_selection(-1),
                KeyCode::Down | KeyCode::Tab => welcome.move_selection(1),
                KeyCode::Enter => return Some(welcome.current_command()),
                KeyCode::Char('q') | KeyCode::Esc => return Some(Command::Quit),
                _ => {}
            },
            Screen::ClassForm(form) => match form.handle_key(code) {
                FormAction::Submit => self.submit_class_form(),
                FormAction::Cancel => return Some(Command::Open(ScreenId::Welcome)),
                FormAction::None => {}
            },
            Screen::StudentForm(form) => match form.handle_key(code) {
                FormAction::Submit => self.submit_student_form(),
                FormAction::Cancel => return Some(Command::Open(ScreenId::Welcome)),
                FormAction::None => {}
            },
            Screen::ClassList(list) => return handle_list_key(list, code),
            Screen::StudentList(list) => return handle_list_key(list, code),
        }
        None
    }

    fn submit_class_form(&mut self) {
        let Screen::ClassForm(form) = &mut self.screen else {
            return;
        };
        match form.submit(&self.store) {
            Ok(class) => {
                self.navigate(ScreenId::ListClasses);
                self.set_status(format!("Added class {}.", class.name), StatusKind::Info);
                self.dialog
                    .get_or_insert_with(|| Dialog::info("Success", "Class added successfully!"));
            }
            Err(err) => {
                self.set_status(err.to_string(), StatusKind::Error);
                self.dialog = Some(Dialog::from(&err));
            }
        }
    }

    fn submit_student_form(&mut self) {
        let Screen::StudentForm(form) = &mut self.screen else {
            return;
        };
        match form.submit(&self.store) {
            Ok(id) => {
                self.navigate(ScreenId::ListStudents);
                self.set_status(format!("Added student #{id}."), StatusKind::Info);
                self.dialog
                    .get_or_insert_with(|| Dialog::info("Success", "Student added successfully!"));
            }
            Err(err) => {
                self.set_status(err.to_string(), StatusKind::Error);
                self.dialog = Some(Dialog::from(&err));
            }
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(MENU_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_menu_bar(frame, chunks[0]);

        match &self.screen {
            Screen::Welcome(welcome) => self.draw_welcome(frame, chunks[1], welcome),
            Screen::ClassForm(form) => self.draw_form(
                frame,
                chunks[1],
                "Class Registration",
                form.lines(),
                form.error.as_deref(),
                form.cursor(),
            ),
            Screen::StudentForm(form) => self.draw_form(
                frame,
                chunks[1],
                "Student Registration",
                form.lines(),
                form.error.as_deref(),
                form.cursor(),
            ),
            Screen::ClassList(list) => self.draw_table(frame, chunks[1], list),
            Screen::StudentList(list) => self.draw_table(frame, chunks[1], list),
        }

        self.draw_footer(frame, chunks[2]);

        if let Some(menu) = &self.menu {
            self.draw_menu_dropdown(frame, area, menu);
        }
        if let Some(dialog) = &self.dialog {
            self.draw_dialog(frame, area, dialog);
        }
    }

    fn draw_menu_bar(&self, frame: &mut Frame, area: Rect) {
        let bar_style = Style::default().add_modifier(Modifier::REVERSED);
        let mut spans = Vec::with_capacity(MENU.len() + 1);
        for (idx, group) in MENU.iter().enumerate() {
            let open = self.menu.is_some_and(|menu| menu.group == idx);
            let style = if open {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                bar_style
            };
            spans.push(Span::styled(format!(" {} ", group.title), style));
        }
        spans.push(Span::styled(format!("  {APP_TITLE}"), bar_style));

        let bar = Paragraph::new(Line::from(spans)).style(bar_style);
        frame.render_widget(bar, area);
    }

    fn draw_menu_dropdown(&self, frame: &mut Frame, area: Rect, menu: &MenuState) {
        let group = &MENU[menu.group];
        let offset: usize = MENU[..menu.group]
            .iter()
            .map(|g| g.title.chars().count() + 2)
            .sum();
        let width = group
            .items
            .iter()
            .map(|item| item.label.chars().count())
            .max()
            .unwrap_or(0)
            + 4;

        let x = area.x + (offset as u16).min(area.width.saturating_sub(1));
        let popup_area = Rect {
            x,
            y: area.y + MENU_HEIGHT.min(area.height),
            width: (width as u16).min(area.right().saturating_sub(x)),
            height: (group.items.len() as u16 + 2).min(area.height.saturating_sub(MENU_HEIGHT)),
        };
        frame.render_widget(Clear, popup_area);

        let items: Vec<ListItem> = group
            .items
            .iter()
            .map(|item| ListItem::new(item.label))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default();
        state.select(Some(menu.item));
        frame.render_stateful_widget(list, popup_area, &mut state);
    }

    fn draw_welcome(&self, frame: &mut Frame, area: Rect, welcome: &WelcomeScreen) {
        let block = Block::default().borders(Borders::ALL).title(APP_TITLE);
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Welcome to the School Registry!",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (idx, (label, _)) in WELCOME_SHORTCUTS.iter().enumerate() {
            let style = if idx == welcome.selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::Cyan)
            };
            lines.push(Line::from(Span::styled(format!("[ {label} ]"), style)));
            lines.push(Line::from(""));
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn draw_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        mut lines: Vec<Line<'static>>,
        error: Option<&str>,
        cursor: Option<(u16, u16)>,
    ) {
        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        lines.push(Line::from(""));
        if let Some(error) = error {
            lines.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch field • ←/→ to choose • Esc to go back",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let overlay_open = self.menu.is_some() || self.dialog.is_some();
        if let (Some((dx, dy)), false) = (cursor, overlay_open) {
            if dx < inner.width && dy < inner.height {
                frame.set_cursor_position((inner.x + dx, inner.y + dy));
            }
        }
    }

    fn draw_table<T: TableRow>(&self, frame: &mut Frame, area: Rect, list: &ListScreen<T>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({})", T::TITLE, list.len()));

        let rows = match &list.rows {
            Err(message) => {
                let paragraph = Paragraph::new(vec![
                    Line::styled(
                        format!("Could not load {}.", T::TITLE.to_lowercase()),
                        Style::default().fg(Color::Red),
                    ),
                    Line::from(message.clone()),
                ])
                .block(block)
                .wrap(Wrap { trim: true });
                frame.render_widget(paragraph, area);
                return;
            }
            Ok(rows) if rows.is_empty() => {
                let paragraph = Paragraph::new(T::EMPTY_MESSAGE)
                    .block(block)
                    .alignment(Alignment::Center);
                frame.render_widget(paragraph, area);
                return;
            }
            Ok(rows) => rows,
        };

        let header = Row::new(T::HEADERS.iter().map(|title| Cell::from(*title))).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let body = rows.iter().map(|row| Row::new(row.cells()));
        let table = Table::new(body, T::widths())
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = TableState::default();
        state.select(list.highlighted());
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let hints: Vec<(&str, &str)> = if self.dialog.is_some() {
            vec![("Enter", "Close")]
        } else if self.menu.is_some() {
            vec![
                ("←→", "Menu"),
                ("↑↓", "Item"),
                ("Enter", "Open"),
                ("Esc", "Close"),
            ]
        } else {
            match &self.screen {
                Screen::Welcome(_) => vec![
                    ("↑↓", "Choose"),
                    ("Enter", "Open"),
                    ("F10", "Menu"),
                    ("F1", "About"),
                    ("q", "Quit"),
                ],
                Screen::ClassForm(_) | Screen::StudentForm(_) => vec![
                    ("Enter", "Save"),
                    ("Tab", "Next field"),
                    ("F10", "Menu"),
                    ("Esc", "Back"),
                    ("Ctrl+Q", "Quit"),
                ],
                Screen::ClassList(_) | Screen::StudentList(_) => vec![
                    ("↑↓", "Scroll"),
                    ("r", "Refresh"),
                    ("F10", "Menu"),
                    ("Esc", "Back"),
                    ("q", "Quit"),
                ],
            }
        };

        Line::from(
            hints
                .into_iter()
                .flat_map(|(key, description)| key_hint(key, description))
                .collect::<Vec<_>>(),
        )
    }

    fn draw_dialog(&self, frame: &mut Frame, area: Rect, dialog: &Dialog) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(dialog.title.as_str())
            .borders(Borders::ALL)
            .border_style(dialog.kind.style());

        let mut lines: Vec<Line> = dialog.body.lines().map(Line::from).collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Enter to close",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup_area);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

/// Scrolling and refresh keys shared by both table screens.
fn handle_list_key<T>(list: &mut ListScreen<T>, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Up => list.move_selection(-1),
        KeyCode::Down => list.move_selection(1),
        KeyCode::PageUp => list.move_selection(-5),
        KeyCode::PageDown => list.move_selection(5),
        KeyCode::Home => list.select_first(),
        KeyCode::End => list.select_last(),
        KeyCode::Char('r') | KeyCode::Char('R') => return Some(Command::Refresh),
        KeyCode::Char('q') => return Some(Command::Quit),
        KeyCode::Esc => return Some(Command::Open(ScreenId::Welcome)),
        _ => {}
    }
    None
}
