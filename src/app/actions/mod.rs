//! Action handlers for user input
//!
//! This module is split into focused submodules:
//! - `navigation`: Cursor movement and help scrolling
//! - `selection`: Building the set of emails to act on
//! - `delete`: Confirming, undoing, retrying and dismissing bulk deletes
//! - `accounts`: Listing and unlinking accounts

mod accounts;
mod delete;
mod navigation;
mod selection;

use anyhow::Result;

use crate::app::state::ModalState;
use crate::input::Action;

use super::App;

impl App {
    pub(crate) async fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            // Navigation
            Action::Up => {
                if self.state.modal.is_help() {
                    self.help_scroll_up();
                } else if self.state.modal.is_accounts() {
                    self.account_cursor_up();
                } else {
                    self.state.move_up();
                }
            }
            Action::Down => {
                if self.state.modal.is_help() {
                    self.help_scroll_down();
                } else if self.state.modal.is_accounts() {
                    self.account_cursor_down();
                } else {
                    self.state.move_down();
                }
            }
            Action::Top => self.state.move_top(),
            Action::Bottom => self.state.move_bottom(),
            Action::PageUp => self.state.page_up(),
            Action::PageDown => self.state.page_down(),

            // Selection
            Action::ToggleSelect => self.toggle_selected(),
            Action::SelectAll => self.select_all(),
            Action::Back => self.go_back(),

            // Bulk delete
            Action::Delete => {
                if self.state.modal.is_accounts() {
                    self.request_remove_account();
                } else {
                    self.request_delete();
                }
            }
            Action::Confirm => {
                if matches!(self.state.modal, ModalState::ConfirmRemoveAccount { .. }) {
                    self.remove_account().await;
                } else {
                    self.confirm_delete();
                }
            }
            Action::Undo => self.undo(),
            Action::RetryFailed => self.retry_failed(),
            Action::DismissFailed => self.dismiss_failed(),

            Action::Accounts => self.toggle_accounts(),
            Action::Open => self.open_in_browser(),
            Action::Refresh => self.refresh().await,
            Action::Help => self.toggle_help(),
            Action::Quit => {} // Handled in event loop
        }
        Ok(())
    }

    /// Open the email under the cursor in the provider's web client
    fn open_in_browser(&mut self) {
        let Some(row) = self.state.current_row() else {
            return;
        };
        let url = row.email.web_url();

        match open::that(&url) {
            Ok(()) => tracing::debug!("Opened {}", url),
            Err(e) => {
                tracing::warn!("Failed to open {}: {}", url, e);
                self.state.set_error(format!("Could not open browser: {}", e));
            }
        }
    }

    fn toggle_help(&mut self) {
        if self.state.modal.is_help() {
            self.state.modal = ModalState::None;
        } else if !self.state.modal.is_active() {
            self.state.modal = ModalState::Help {
                keybindings: self.bindings.all_bindings(),
                scroll: 0,
            };
        }
    }
}
