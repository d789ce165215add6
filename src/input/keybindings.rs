use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::config::KeybindingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Top,
    Bottom,
    PageUp,
    PageDown,

    // Selection
    ToggleSelect,
    SelectAll,
    Back,

    // Bulk delete
    Delete,
    Confirm,
    Undo,
    RetryFailed,
    DismissFailed,

    // Other
    Accounts,
    Open,
    Refresh,
    Help,
    Quit,
}

pub struct KeyBindings {
    bindings: HashMap<KeyEvent, Action>,
}

/// A displayable keybinding entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeybindingEntry {
    pub key: String,
    pub description: &'static str,
    pub category: &'static str,
}

impl KeyBindings {
    pub fn new(mode: &KeybindingMode) -> Self {
        let mut bindings = Self::common_bindings();
        match mode {
            KeybindingMode::Vim => bindings.extend(Self::vim_bindings()),
            KeybindingMode::Arrows => bindings.extend(Self::arrow_bindings()),
        }
        Self { bindings }
    }

    pub fn get(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings.get(event).copied()
    }

    /// All keybindings as displayable entries, grouped by category
    pub fn all_bindings(&self) -> Vec<KeybindingEntry> {
        let mut entries: Vec<_> = self
            .bindings
            .iter()
            .map(|(event, action)| KeybindingEntry {
                key: format_key_event(event),
                description: action_description(action),
                category: action_category(action),
            })
            .collect();

        entries.sort_by(|a, b| {
            category_order(a.category)
                .cmp(&category_order(b.category))
                .then_with(|| a.description.cmp(b.description))
                .then_with(|| a.key.cmp(&b.key))
        });
        entries
    }

    fn common_bindings() -> HashMap<KeyEvent, Action> {
        let mut map = HashMap::new();

        map.insert(key_code(KeyCode::Up), Action::Up);
        map.insert(key_code(KeyCode::Down), Action::Down);
        map.insert(key_code(KeyCode::Home), Action::Top);
        map.insert(key_code(KeyCode::End), Action::Bottom);
        map.insert(key_code(KeyCode::PageUp), Action::PageUp);
        map.insert(key_code(KeyCode::PageDown), Action::PageDown);

        map.insert(key(' '), Action::ToggleSelect);
        map.insert(key('a'), Action::SelectAll);
        map.insert(key_code(KeyCode::Esc), Action::Back);
        map.insert(key('d'), Action::Delete);
        map.insert(key('o'), Action::Open);
        map.insert(key_code(KeyCode::Enter), Action::Open);

        map.insert(key('u'), Action::Undo);
        map.insert(shift_key('R'), Action::RetryFailed);
        map.insert(key('x'), Action::DismissFailed);
        map.insert(key('r'), Action::Refresh);
        map.insert(shift_key('A'), Action::Accounts);
        map.insert(key('?'), Action::Help);
        map.insert(key('q'), Action::Quit);
        map.insert(ctrl_key('c'), Action::Quit);

        map
    }

    fn vim_bindings() -> HashMap<KeyEvent, Action> {
        let mut map = HashMap::new();

        map.insert(key('j'), Action::Down);
        map.insert(key('k'), Action::Up);
        map.insert(key('g'), Action::Top);
        map.insert(shift_key('G'), Action::Bottom);
        map.insert(ctrl_key('u'), Action::PageUp);
        map.insert(ctrl_key('d'), Action::PageDown);

        map
    }

    fn arrow_bindings() -> HashMap<KeyEvent, Action> {
        let mut map = HashMap::new();

        map.insert(ctrl_key('a'), Action::SelectAll);
        map.insert(key_code(KeyCode::Delete), Action::Delete);

        map
    }
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn shift_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT)
}

fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Format a KeyEvent for display
fn format_key_event(event: &KeyEvent) -> String {
    let mut prefix = String::new();
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        prefix.push_str("Ctrl+");
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        prefix.push_str("Alt+");
    }

    let key_str = match event.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        _ => format!("{:?}", event.code),
    };

    format!("{}{}", prefix, key_str)
}

fn action_description(action: &Action) -> &'static str {
    match action {
        Action::Up => "Move up",
        Action::Down => "Move down",
        Action::Top => "Go to top",
        Action::Bottom => "Go to bottom",
        Action::PageUp => "Page up",
        Action::PageDown => "Page down",
        Action::ToggleSelect => "Select / unselect email",
        Action::SelectAll => "Select all",
        Action::Back => "Clear selection / close",
        Action::Delete => "Archive/delete selected",
        Action::Confirm => "Confirm",
        Action::Undo => "Undo last delete",
        Action::RetryFailed => "Retry failed delete",
        Action::DismissFailed => "Restore failed delete",
        Action::Accounts => "Manage linked accounts",
        Action::Open => "Open in browser",
        Action::Refresh => "Refresh",
        Action::Help => "Toggle help",
        Action::Quit => "Quit",
    }
}

fn action_category(action: &Action) -> &'static str {
    match action {
        Action::Up
        | Action::Down
        | Action::Top
        | Action::Bottom
        | Action::PageUp
        | Action::PageDown => "Navigation",

        Action::ToggleSelect | Action::SelectAll | Action::Back => "Selection",

        Action::Delete
        | Action::Confirm
        | Action::Undo
        | Action::RetryFailed
        | Action::DismissFailed => "Delete",

        Action::Accounts | Action::Open | Action::Refresh | Action::Help | Action::Quit => {
            "General"
        }
    }
}

fn category_order(category: &str) -> u8 {
    match category {
        "Navigation" => 0,
        "Selection" => 1,
        "Delete" => 2,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vim_bindings() {
        let bindings = KeyBindings::new(&KeybindingMode::Vim);
        assert_eq!(bindings.get(&key('j')), Some(Action::Down));
        assert_eq!(bindings.get(&key('d')), Some(Action::Delete));
        assert_eq!(bindings.get(&key(' ')), Some(Action::ToggleSelect));
        assert_eq!(bindings.get(&key('u')), Some(Action::Undo));
        assert_eq!(bindings.get(&shift_key('R')), Some(Action::RetryFailed));
        assert_eq!(bindings.get(&shift_key('A')), Some(Action::Accounts));
    }

    #[test]
    fn test_arrow_bindings_have_no_vim_keys() {
        let bindings = KeyBindings::new(&KeybindingMode::Arrows);
        assert_eq!(bindings.get(&key('j')), None);
        assert_eq!(bindings.get(&key_code(KeyCode::Down)), Some(Action::Down));
        assert_eq!(
            bindings.get(&key_code(KeyCode::Delete)),
            Some(Action::Delete)
        );
    }

    #[test]
    fn test_help_entries_are_grouped() {
        let bindings = KeyBindings::new(&KeybindingMode::Vim);
        let entries = bindings.all_bindings();
        assert_eq!(entries.first().map(|e| e.category), Some("Navigation"));
        assert_eq!(entries.last().map(|e| e.category), Some("General"));
        assert!(
            entries
                .iter()
                .any(|e| e.key == "Space" && e.description == "Select / unselect email")
        );
    }
}
