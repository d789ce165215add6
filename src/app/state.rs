//! Application state types
//!
//! All state types live here to maintain clean dependency:
//! UI layer imports from app layer, not vice versa.

use std::time::Duration;

use crate::constants::{ERROR_TTL_SECS, PAGE_SIZE};
use crate::deferred::{ActionId, ActionStatus, ItemStatus, PendingAction, StatusCounts};
use crate::input::KeybindingEntry;
use crate::remote::{Account, Email};

/// Modal overlay state - only one can be active at a time
#[derive(Debug, Clone, Default)]
pub enum ModalState {
    #[default]
    None,
    /// Waiting for the user to confirm deleting the selection
    ConfirmDelete { count: usize },
    Help {
        keybindings: Vec<KeybindingEntry>,
        scroll: usize,
    },
    /// Linked accounts list; `selected` is the highlighted row
    Accounts { selected: usize },
    /// Waiting for the user to confirm unlinking an account
    ConfirmRemoveAccount { account_id: String, email: String },
}

impl ModalState {
    pub fn is_help(&self) -> bool {
        matches!(self, Self::Help { .. })
    }

    pub fn is_accounts(&self) -> bool {
        matches!(self, Self::Accounts { .. })
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// One visible line of the inbox list
#[derive(Debug, Clone)]
pub struct EmailRow {
    pub email: Email,
    pub selected: bool,
    pub status: ItemStatus,
    /// Last commit failure for an item still awaiting removal
    pub failure: Option<String>,
}

impl EmailRow {
    pub fn is_pending(&self) -> bool {
        self.status == ItemStatus::PendingRemoval
    }

    pub fn is_failed(&self) -> bool {
        self.is_pending() && self.failure.is_some()
    }
}

/// Undo notification for one deferred action
#[derive(Debug, Clone)]
pub struct UndoNotice {
    pub action_id: ActionId,
    pub count: usize,
    pub remaining: Duration,
    pub grace: Duration,
    /// Local wall-clock time the delete was confirmed, e.g. `14:03`
    pub confirmed_at: String,
    pub status: ActionStatus,
    pub failure: Option<String>,
}

impl UndoNotice {
    pub fn from_action(action: &PendingAction, now: tokio::time::Instant) -> Self {
        Self {
            action_id: action.action_id,
            count: action.len(),
            remaining: action.remaining(now),
            grace: action.grace,
            confirmed_at: action
                .created_at
                .with_timezone(&chrono::Local)
                .format("%H:%M")
                .to_string(),
            status: action.status,
            failure: action.failure.clone(),
        }
    }

    /// Whether undo is still possible
    pub fn can_undo(&self) -> bool {
        self.status == ActionStatus::Scheduled
    }
}

/// Loading, error, and status message state
#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub loading: bool,
    pub error: Option<String>,
    pub error_time: Option<std::time::Instant>,
    pub message: String,
    /// Persists after error bar expires - shown as indicator in status bar
    pub has_unacknowledged_error: bool,
}

impl StatusState {
    pub fn set_error(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
        self.error_time = Some(std::time::Instant::now());
        self.has_unacknowledged_error = true;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.error_time = None;
    }

    /// Acknowledge the error indicator (clear the persistent flag)
    pub fn acknowledge_error(&mut self) {
        self.has_unacknowledged_error = false;
    }

    /// Clear error if TTL expired. Returns true if error was cleared.
    pub fn clear_error_if_expired(&mut self) -> bool {
        if let Some(time) = self.error_time
            && time.elapsed().as_secs() >= ERROR_TTL_SECS
        {
            self.clear_error();
            true
        } else {
            false
        }
    }

    pub fn set_message(&mut self, msg: impl ToString) {
        self.message = msg.to_string();
    }
}

/// Everything the render thread needs for one frame
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Emails not yet removed, in service order
    pub rows: Vec<EmailRow>,
    pub cursor: usize,
    pub selected_count: usize,
    /// Actions still inside their grace window or being committed
    pub pending: Vec<UndoNotice>,
    /// Actions whose commit failed, awaiting retry or dismissal
    pub failed: Vec<UndoNotice>,
    pub counts: StatusCounts,
    pub accounts: Vec<Account>,
    pub check_interval_hours: u32,
    pub grace: Duration,
    pub modal: ModalState,
    pub status: StatusState,
}

impl AppState {
    pub fn current_row(&self) -> Option<&EmailRow> {
        self.rows.get(self.cursor)
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
        }
    }

    pub fn move_top(&mut self) {
        self.cursor = 0;
    }

    pub fn move_bottom(&mut self) {
        self.cursor = self.rows.len().saturating_sub(1);
    }

    pub fn page_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(PAGE_SIZE);
    }

    pub fn page_down(&mut self) {
        self.cursor = (self.cursor + PAGE_SIZE).min(self.rows.len().saturating_sub(1));
    }

    /// Keep the cursor inside the list after rows change
    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
    }

    /// Whether any undo countdown is running
    pub fn has_countdown(&self) -> bool {
        self.pending.iter().any(UndoNotice::can_undo)
    }

    // Delegate methods to StatusState
    pub fn set_error(&mut self, error: impl ToString) {
        self.status.set_error(error);
    }

    pub fn clear_error_if_expired(&mut self) -> bool {
        self.status.clear_error_if_expired()
    }

    pub fn acknowledge_error(&mut self) {
        self.status.acknowledge_error();
    }

    pub fn has_unacknowledged_error(&self) -> bool {
        self.status.has_unacknowledged_error
    }

    pub fn set_status(&mut self, msg: impl ToString) {
        self.status.set_message(msg);
    }
}

/// Render a grace window the way the confirmation prompt words it
pub fn human_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        let mins = secs / 60;
        format!("{} minute{}", mins, if mins == 1 { "" } else { "s" })
    } else {
        format!("{} second{}", secs, if secs == 1 { "" } else { "s" })
    }
}

/// Countdown text for undo notices, e.g. `1:05`
pub fn countdown(remaining: Duration) -> String {
    // Round up so the notice never shows 0:00 while undo is still possible
    let secs = remaining.as_millis().div_ceil(1000) as u64;
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deferred::ItemId;

    fn row(id: &str) -> EmailRow {
        EmailRow {
            email: Email {
                id: ItemId::from(id),
                sender: String::new(),
                account: String::new(),
                subject: String::new(),
                summary: None,
                time: None,
                web_link: None,
            },
            selected: false,
            status: ItemStatus::Normal,
            failure: None,
        }
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut state = AppState {
            rows: vec![row("a"), row("b"), row("c")],
            ..Default::default()
        };

        state.move_up();
        assert_eq!(state.cursor, 0);
        state.page_down();
        assert_eq!(state.cursor, 2);
        state.move_down();
        assert_eq!(state.cursor, 2);

        state.rows.truncate(1);
        state.clamp_cursor();
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_empty_list_cursor() {
        let mut state = AppState::default();
        state.move_bottom();
        state.page_down();
        assert_eq!(state.cursor, 0);
        assert!(state.current_row().is_none());
    }

    #[test]
    fn test_human_duration() {
        assert_eq!(human_duration(Duration::from_secs(120)), "2 minutes");
        assert_eq!(human_duration(Duration::from_secs(60)), "1 minute");
        assert_eq!(human_duration(Duration::from_secs(90)), "90 seconds");
        assert_eq!(human_duration(Duration::from_secs(1)), "1 second");
    }

    #[test]
    fn test_countdown_rounds_up() {
        assert_eq!(countdown(Duration::from_millis(119_200)), "2:00");
        assert_eq!(countdown(Duration::from_millis(65_000)), "1:05");
        assert_eq!(countdown(Duration::from_millis(1)), "0:01");
        assert_eq!(countdown(Duration::ZERO), "0:00");
    }

    #[test]
    fn test_error_ttl() {
        let mut status = StatusState::default();
        status.set_error("boom");
        assert!(status.has_unacknowledged_error);
        assert!(!status.clear_error_if_expired());

        status.error_time =
            Some(std::time::Instant::now() - Duration::from_secs(ERROR_TTL_SECS + 1));
        assert!(status.clear_error_if_expired());
        assert!(status.error.is_none());
        // The indicator outlives the message
        assert!(status.has_unacknowledged_error);
    }
}
