//! Static routing table. Every navigation path in the application is one of
//! the [`Command`] values listed here or on the welcome panel.

/// Closed set of screens the content region can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenId {
    Welcome,
    CreateClass,
    CreateStudent,
    ListClasses,
    ListStudents,
}

/// An action the shell can perform in response to a menu entry, a shortcut,
/// or a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Tear down the current screen and build the named one.
    Open(ScreenId),
    /// Rebuild the current list screen, re-running its store read. Ignored
    /// on the forms.
    Refresh,
    About,
    Quit,
}

pub(crate) struct MenuItem {
    pub(crate) label: &'static str,
    pub(crate) command: Command,
}

pub(crate) struct MenuGroup {
    pub(crate) title: &'static str,
    pub(crate) items: &'static [MenuItem],
}

pub(crate) const MENU: &[MenuGroup] = &[
    MenuGroup {
        title: "Registrations",
        items: &[
            MenuItem {
                label: "Students",
                command: Command::Open(ScreenId::CreateStudent),
            },
            MenuItem {
                label: "Classes",
                command: Command::Open(ScreenId::CreateClass),
            },
        ],
    },
    MenuGroup {
        title: "Display",
        items: &[
            MenuItem {
                label: "List Students",
                command: Command::Open(ScreenId::ListStudents),
            },
            MenuItem {
                label: "List Classes",
                command: Command::Open(ScreenId::ListClasses),
            },
        ],
    },
    MenuGroup {
        title: "Help",
        items: &[MenuItem {
            label: "About",
            command: Command::About,
        }],
    },
];

/// Cursor inside the open menu bar.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MenuState {
    pub(crate) group: usize,
    pub(crate) item: usize,
}

impl MenuState {
    pub(crate) fn move_group(&mut self, offset: isize) {
        let len = MENU.len() as isize;
        self.group = (self.group as isize + offset).rem_euclid(len) as usize;
        self.item = 0;
    }

    pub(crate) fn move_item(&mut self, offset: isize) {
        let len = MENU[self.group].items.len() as isize;
        self.item = (self.item as isize + offset).rem_euclid(len) as usize;
    }

    pub(crate) fn current_command(&self) -> Command {
        MENU[self.group].items[self.item].command
    }
}
