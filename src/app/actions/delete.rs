//! Bulk delete actions
//!
//! Confirmed deletes go through the deferred queue: the selection is
//! snapshotted, the emails are marked pending, and the remote delete runs
//! once the grace window closes unless undone first.

use crate::app::state::{ModalState, human_duration};
use crate::deferred::{ActionStatus, CancelOutcome};

use super::super::App;

impl App {
    /// Ask for confirmation before deleting the selection
    pub(crate) fn request_delete(&mut self) {
        if self.selection.is_empty() {
            self.state.set_status("Nothing selected");
            return;
        }
        self.state.modal = ModalState::ConfirmDelete {
            count: self.selection.len(),
        };
    }

    pub(crate) fn confirm_delete(&mut self) {
        if !matches!(self.state.modal, ModalState::ConfirmDelete { .. }) {
            return;
        }
        self.state.modal = ModalState::None;

        let grace = self.config.actions.grace_period();
        match self.queue.enqueue(self.selection.snapshot(), grace) {
            Ok(action) => {
                self.selection.clear();
                self.state.set_status(format!(
                    "Deleting {} email(s) in {}. Press u to undo.",
                    action.len(),
                    human_duration(grace)
                ));
            }
            Err(e) => {
                tracing::warn!("Delete rejected: {}", e);
                self.state.set_error(format!("Cannot delete: {}", e));
            }
        }
        self.sync_view();
    }

    /// Cancel the most recent delete still inside its grace window
    pub(crate) fn undo(&mut self) {
        let newest = self
            .queue
            .list_pending()
            .into_iter()
            .rev()
            .find(|action| action.status == ActionStatus::Scheduled);

        let Some(action) = newest else {
            self.state.set_status("Nothing to undo");
            return;
        };

        match self.queue.cancel(action.action_id) {
            Ok(CancelOutcome::Cancelled) => {
                self.state
                    .set_status(format!("Restored {} email(s)", action.len()));
            }
            Ok(CancelOutcome::AlreadyResolved(status)) => {
                self.state
                    .set_status(format!("Too late to undo, delete already {}", status));
            }
            Err(e) => self.state.set_error(format!("Undo failed: {}", e)),
        }
        self.sync_view();
    }

    /// Re-issue the most recent failed delete
    pub(crate) fn retry_failed(&mut self) {
        let Some(action) = self.queue.list_failed().pop() else {
            self.state.set_status("No failed deletes");
            return;
        };

        match self.queue.retry(action.action_id) {
            Ok(retried) => {
                self.state
                    .set_status(format!("Retrying delete of {} email(s)", retried.len()));
            }
            Err(e) => self.state.set_error(format!("Retry failed: {}", e)),
        }
        self.sync_view();
    }

    /// Give up on the most recent failed delete and keep its emails
    pub(crate) fn dismiss_failed(&mut self) {
        let Some(action) = self.queue.list_failed().pop() else {
            self.state.set_status("No failed deletes");
            return;
        };

        match self.queue.dismiss(action.action_id) {
            Ok(()) => {
                self.state
                    .set_status(format!("Kept {} email(s)", action.len()));
            }
            Err(e) => self.state.set_error(format!("Dismiss failed: {}", e)),
        }
        self.sync_view();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::app::state::ModalState;
    use crate::app::tests::{settle, test_app};
    use crate::deferred::{ActionStatus, ItemId, ItemStatus};

    #[tokio::test]
    async fn test_request_delete_needs_selection() {
        let (mut app, _remote) = test_app(&["a", "b"]);
        app.refresh().await;

        app.request_delete();
        assert!(!app.state.modal.is_active());
        assert_eq!(app.state.status.message, "Nothing selected");

        app.select_all();
        app.request_delete();
        assert!(matches!(
            app.state.modal,
            ModalState::ConfirmDelete { count: 2 }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_then_undo_restores_rows() {
        let (mut app, remote) = test_app(&["a", "b", "c"]);
        app.refresh().await;
        app.toggle_selected();
        app.toggle_selected();
        app.request_delete();
        app.confirm_delete();

        assert_eq!(app.state.selected_count, 0);
        assert!(app.state.rows[0].is_pending());
        assert!(app.state.rows[1].is_pending());
        assert_eq!(app.state.rows[2].status, ItemStatus::Normal);
        assert_eq!(app.state.pending.len(), 1);
        assert_eq!(app.state.pending[0].count, 2);
        assert!(app.state.has_countdown());

        tokio::time::advance(Duration::from_secs(5)).await;
        app.undo();

        assert!(app.state.rows.iter().all(|r| r.status == ItemStatus::Normal));
        assert!(app.state.pending.is_empty());
        assert_eq!(app.state.status.message, "Restored 2 email(s)");

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert!(remote.delete_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_undo_targets_newest_action() {
        let (mut app, _remote) = test_app(&["a", "b"]);
        app.refresh().await;

        app.toggle_selected();
        app.request_delete();
        app.confirm_delete();
        app.state.cursor = 1;
        app.toggle_selected();
        app.request_delete();
        app.confirm_delete();
        assert_eq!(app.state.pending.len(), 2);

        app.undo();
        assert_eq!(app.state.pending.len(), 1);
        assert!(app.state.rows[0].is_pending());
        assert_eq!(app.state.rows[1].status, ItemStatus::Normal);
    }

    #[tokio::test(start_paused = true)]
    async fn test_grace_elapses_then_rows_disappear() {
        let (mut app, remote) = test_app(&["a", "b"]);
        app.refresh().await;
        app.toggle_selected();
        app.request_delete();
        app.confirm_delete();

        tokio::time::advance(Duration::from_secs(11)).await;
        settle().await;
        app.sync_view();

        assert_eq!(remote.delete_calls(), vec![vec![ItemId::from("a")]]);
        assert_eq!(app.state.rows.len(), 1);
        assert!(app.state.pending.is_empty());

        app.undo();
        assert_eq!(app.state.status.message, "Nothing to undo");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_delete_retry_and_dismiss() {
        let (mut app, remote) = test_app(&["a", "b"]);
        app.refresh().await;
        remote.fail_deletes("service unavailable");

        app.select_all();
        app.request_delete();
        app.confirm_delete();
        tokio::time::advance(Duration::from_secs(11)).await;
        settle().await;
        app.sync_view();

        assert_eq!(app.state.failed.len(), 1);
        assert_eq!(app.state.failed[0].status, ActionStatus::Failed);
        assert!(app.state.rows.iter().all(|r| r.is_failed()));

        // Retry fails again
        app.retry_failed();
        settle().await;
        app.sync_view();
        assert_eq!(remote.delete_calls().len(), 2);
        assert_eq!(app.state.failed.len(), 1);

        // Dismiss gives the emails back
        app.dismiss_failed();
        assert!(app.state.failed.is_empty());
        assert!(
            app.state
                .rows
                .iter()
                .all(|r| r.status == ItemStatus::Normal && r.failure.is_none())
        );

        app.dismiss_failed();
        assert_eq!(app.state.status.message, "No failed deletes");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_succeeds_after_recovery() {
        let (mut app, remote) = test_app(&["a", "b"]);
        app.refresh().await;
        remote.fail_deletes("timeout");

        app.toggle_selected();
        app.request_delete();
        app.confirm_delete();
        tokio::time::advance(Duration::from_secs(11)).await;
        settle().await;

        remote.succeed_deletes();
        app.retry_failed();
        settle().await;
        app.sync_view();

        assert!(app.state.failed.is_empty());
        assert_eq!(app.state.rows.len(), 1);
        assert_eq!(app.state.rows[0].email.id, ItemId::from("b"));
    }
}
