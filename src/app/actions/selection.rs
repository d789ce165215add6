//! Selection actions

use crate::app::state::ModalState;
use crate::deferred::ItemStatus;

use super::super::App;

impl App {
    /// Toggle the email under the cursor. Emails awaiting removal cannot be
    /// selected again.
    pub(crate) fn toggle_selected(&mut self) {
        let Some(row) = self.state.current_row() else {
            return;
        };
        if self.queue.reconciler().has_failure(&row.email.id) {
            self.state.set_status("Delete failed for this email: R to retry, x to keep");
            return;
        }
        if row.status != ItemStatus::Normal {
            self.state.set_status("Email is already being deleted");
            return;
        }

        let id = row.email.id.clone();
        self.selection.toggle(&id);
        self.state.move_down();
        self.sync_view();
    }

    pub(crate) fn select_all(&mut self) {
        let selectable: Vec<_> = self
            .state
            .rows
            .iter()
            .filter(|row| row.status == ItemStatus::Normal)
            .map(|row| row.email.id.clone())
            .collect();

        self.selection.select_all(&selectable);
        self.state
            .set_status(format!("{} selected", self.selection.len()));
        self.sync_view();
    }

    /// Close the open modal, otherwise drop the selection
    pub(crate) fn go_back(&mut self) {
        if self.state.modal.is_active() {
            self.state.modal = ModalState::None;
            return;
        }

        if !self.selection.is_empty() {
            self.selection.clear();
            self.state.set_status("Selection cleared");
            self.sync_view();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::state::ModalState;
    use crate::app::tests::test_app;
    use crate::deferred::ItemId;
    use std::time::Duration;

    #[tokio::test]
    async fn test_toggle_moves_cursor_and_tracks_count() {
        let (mut app, _remote) = test_app(&["a", "b", "c"]);
        app.refresh().await;

        app.toggle_selected();
        assert_eq!(app.state.cursor, 1);
        assert_eq!(app.state.selected_count, 1);
        assert!(app.state.rows[0].selected);

        app.state.cursor = 0;
        app.toggle_selected();
        assert_eq!(app.state.selected_count, 0);
        assert!(!app.state.rows[0].selected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_rows_cannot_be_selected() {
        let (mut app, _remote) = test_app(&["a", "b"]);
        app.refresh().await;
        app.queue
            .enqueue(vec![ItemId::from("a")], Duration::from_secs(10))
            .unwrap();
        app.sync_view();

        app.toggle_selected();
        assert_eq!(app.state.selected_count, 0);

        app.select_all();
        assert_eq!(app.selection.snapshot(), vec![ItemId::from("b")]);
    }

    #[tokio::test]
    async fn test_back_closes_modal_before_clearing() {
        let (mut app, _remote) = test_app(&["a", "b"]);
        app.refresh().await;
        app.select_all();
        app.state.modal = ModalState::ConfirmDelete { count: 2 };

        app.go_back();
        assert!(!app.state.modal.is_active());
        assert_eq!(app.state.selected_count, 2);

        app.go_back();
        assert_eq!(app.state.selected_count, 0);
    }
}
