//! Linked account management

use crate::app::state::ModalState;

use super::super::App;

impl App {
    pub(crate) fn toggle_accounts(&mut self) {
        if self.state.modal.is_accounts() {
            self.state.modal = ModalState::None;
        } else if !self.state.modal.is_active() {
            self.state.modal = ModalState::Accounts { selected: 0 };
        }
    }

    pub(crate) fn account_cursor_down(&mut self) {
        let last = self.accounts.len().saturating_sub(1);
        if let ModalState::Accounts { selected } = &mut self.state.modal
            && *selected < last
        {
            *selected += 1;
        }
    }

    pub(crate) fn account_cursor_up(&mut self) {
        if let ModalState::Accounts { selected } = &mut self.state.modal {
            *selected = selected.saturating_sub(1);
        }
    }

    /// Ask before unlinking the highlighted account
    pub(crate) fn request_remove_account(&mut self) {
        let ModalState::Accounts { selected } = self.state.modal else {
            return;
        };
        let Some(account) = self.accounts.get(selected) else {
            self.state.set_status("No linked accounts");
            return;
        };

        self.state.modal = ModalState::ConfirmRemoveAccount {
            account_id: account.id.clone(),
            email: account.email.clone(),
        };
    }

    /// Unlink the confirmed account, then reload accounts and emails
    pub(crate) async fn remove_account(&mut self) {
        let (account_id, email) = match &self.state.modal {
            ModalState::ConfirmRemoveAccount { account_id, email } => {
                (account_id.clone(), email.clone())
            }
            _ => return,
        };
        self.state.modal = ModalState::None;

        match self.remote.remove_account(&account_id).await {
            Ok(()) => {
                tracing::info!(%account_id, "Removed account {}", email);
                self.refresh().await;
                self.state.set_status(format!("Removed {}", email));
            }
            Err(e) => {
                tracing::error!("Failed to remove account {}: {:#}", email, e);
                self.state
                    .set_error(format!("Failed to remove {}: {}", email, e));
            }
        }
    }
}
