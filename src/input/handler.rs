use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

use super::keybindings::{Action, KeyBindings};
use crate::app::state::{AppState, ModalState};

pub enum InputResult {
    Continue,
    Quit,
    Action(Action),
}

pub fn handle_input(event: Event, state: &AppState, bindings: &KeyBindings) -> InputResult {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            handle_key(key_event, state, bindings)
        }
        _ => InputResult::Continue,
    }
}

fn handle_key(key: KeyEvent, state: &AppState, bindings: &KeyBindings) -> InputResult {
    match state.modal {
        ModalState::ConfirmDelete { .. } | ModalState::ConfirmRemoveAccount { .. } => {
            return handle_confirm_input(key);
        }
        ModalState::Help { .. } => return handle_help_input(key, bindings),
        ModalState::Accounts { .. } => return handle_accounts_input(key, bindings),
        ModalState::None => {}
    }

    match bindings.get(&key) {
        Some(Action::Quit) => InputResult::Quit,
        Some(action) => InputResult::Action(action),
        None => InputResult::Continue,
    }
}

fn handle_confirm_input(key: KeyEvent) -> InputResult {
    // In confirm modal: y/Enter confirms, n/Esc cancels
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => InputResult::Action(Action::Confirm),
        KeyCode::Char('n') | KeyCode::Esc => InputResult::Action(Action::Back),
        _ => InputResult::Continue,
    }
}

fn handle_help_input(key: KeyEvent, bindings: &KeyBindings) -> InputResult {
    if let Some(action) = bindings.get(&key)
        && matches!(action, Action::Help | Action::Back | Action::Up | Action::Down)
    {
        return InputResult::Action(action);
    }
    InputResult::Continue
}

fn handle_accounts_input(key: KeyEvent, bindings: &KeyBindings) -> InputResult {
    // In accounts list: move, d removes, A or Esc closes
    match bindings.get(&key) {
        Some(
            action @ (Action::Up | Action::Down | Action::Delete | Action::Accounts | Action::Back),
        ) => InputResult::Action(action),
        _ => InputResult::Continue,
    }
}
