//! Named user actions and the keyboard shortcuts bound to them.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Every command reachable from the keyboard or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    New,
    Open,
    Save,
    SaveAs,
    Quit,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    Find,
    Replace,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    WordCount,
    RecentFiles,
}

impl Action {
    pub const ALL: [Action; 18] = [
        Action::New,
        Action::Open,
        Action::Save,
        Action::SaveAs,
        Action::Quit,
        Action::Undo,
        Action::Redo,
        Action::Cut,
        Action::Copy,
        Action::Paste,
        Action::SelectAll,
        Action::Find,
        Action::Replace,
        Action::ZoomIn,
        Action::ZoomOut,
        Action::ResetZoom,
        Action::WordCount,
        Action::RecentFiles,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Action::New => "new",
            Action::Open => "open",
            Action::Save => "save",
            Action::SaveAs => "save-as",
            Action::Quit => "quit",
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::Cut => "cut",
            Action::Copy => "copy",
            Action::Paste => "paste",
            Action::SelectAll => "select-all",
            Action::Find => "find",
            Action::Replace => "replace",
            Action::ZoomIn => "zoom-in",
            Action::ZoomOut => "zoom-out",
            Action::ResetZoom => "reset-zoom",
            Action::WordCount => "word-count",
            Action::RecentFiles => "recent-files",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.name() == wanted)
            .ok_or_else(|| anyhow::anyhow!("Unknown command: {}", s))
    }
}

/// A key plus modifiers, normalised so that letters are lowercase with
/// SHIFT carried as a modifier and SHIFT is ignored on symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self::normalize(code, modifiers)
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn ctrl_shift(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL | KeyModifiers::SHIFT)
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self::normalize(event.code, event.modifiers)
    }

    fn normalize(code: KeyCode, modifiers: KeyModifiers) -> Self {
        let modifiers = modifiers & (KeyModifiers::CONTROL | KeyModifiers::SHIFT | KeyModifiers::ALT);
        match code {
            KeyCode::Char(c) if c.is_alphabetic() => {
                let modifiers = if c.is_uppercase() {
                    modifiers | KeyModifiers::SHIFT
                } else {
                    modifiers
                };
                let lower = c.to_lowercase().next().unwrap_or(c);
                Self {
                    code: KeyCode::Char(lower),
                    modifiers,
                }
            }
            KeyCode::Char(_) => Self {
                code,
                modifiers: modifiers.difference(KeyModifiers::SHIFT),
            },
            _ => Self { code, modifiers },
        }
    }
}

/// Shortcut table consulted before a key reaches the text area.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyCombo, Action>,
}

impl Keymap {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn bind(&mut self, combo: KeyCombo, action: Action) {
        self.bindings.insert(combo, action);
    }

    pub fn lookup(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings.get(&KeyCombo::from_event(event)).copied()
    }

    /// Shortcuts bound to `action`, e.g. for the help line.
    pub fn combos_for(&self, action: Action) -> Vec<KeyCombo> {
        self.bindings
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(combo, _)| *combo)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self::empty();

        keymap.bind(KeyCombo::ctrl('n'), Action::New);
        keymap.bind(KeyCombo::ctrl('o'), Action::Open);
        keymap.bind(KeyCombo::ctrl('s'), Action::Save);
        keymap.bind(KeyCombo::ctrl_shift('s'), Action::SaveAs);
        keymap.bind(KeyCombo::ctrl('q'), Action::Quit);

        keymap.bind(KeyCombo::ctrl('z'), Action::Undo);
        keymap.bind(KeyCombo::ctrl_shift('z'), Action::Redo);
        keymap.bind(KeyCombo::ctrl('y'), Action::Redo);
        keymap.bind(KeyCombo::ctrl('x'), Action::Cut);
        keymap.bind(KeyCombo::ctrl('c'), Action::Copy);
        keymap.bind(KeyCombo::ctrl('v'), Action::Paste);
        keymap.bind(KeyCombo::ctrl('a'), Action::SelectAll);
        keymap.bind(KeyCombo::ctrl('f'), Action::Find);
        keymap.bind(KeyCombo::ctrl('r'), Action::Replace);

        keymap.bind(KeyCombo::ctrl('+'), Action::ZoomIn);
        keymap.bind(KeyCombo::ctrl('='), Action::ZoomIn);
        keymap.bind(KeyCombo::ctrl('-'), Action::ZoomOut);
        keymap.bind(KeyCombo::ctrl('0'), Action::ResetZoom);

        keymap.bind(KeyCombo::ctrl('w'), Action::WordCount);
        keymap.bind(KeyCombo::ctrl('e'), Action::RecentFiles);

        keymap
    }
}
