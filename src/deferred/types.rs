//! Identifiers, statuses and snapshots shared across the deferred action core

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Opaque item identifier, stable for the lifetime of a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Visible workflow status of an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ItemStatus {
    #[default]
    Normal,
    PendingRemoval,
    Removed,
}

/// Identifier of a deferred action, issued in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub(crate) u64);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a deferred action.
///
/// `Scheduled -> Cancelled` or `Scheduled -> Committing -> Committed | Failed`.
/// `Committing` means the executor was invoked and cancellation is no longer
/// possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ActionStatus {
    Scheduled = 0,
    Committing = 1,
    Committed = 2,
    Cancelled = 3,
    Failed = 4,
}

impl ActionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::Cancelled | Self::Failed)
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Scheduled,
            1 => Self::Committing,
            2 => Self::Committed,
            3 => Self::Cancelled,
            _ => Self::Failed,
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scheduled => "scheduled",
            Self::Committing => "committing",
            Self::Committed => "committed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Read-only view of a deferred action at a point in time
#[derive(Debug, Clone)]
pub struct PendingAction {
    pub action_id: ActionId,
    /// Targets captured at confirmation time, never rebound
    pub target_ids: Vec<ItemId>,
    pub created_at: DateTime<Utc>,
    pub deadline: Instant,
    pub grace: Duration,
    pub status: ActionStatus,
    /// Set once the action is `Failed`
    pub failure: Option<String>,
}

impl PendingAction {
    /// Time left before the action commits (zero once past the deadline)
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    pub fn len(&self) -> usize {
        self.target_ids.len()
    }
}

/// Result of an undo request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    /// The action already left `Scheduled`; nothing changed
    AlreadyResolved(ActionStatus),
}

/// Notifications emitted by the queue as actions move through their lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEvent {
    Scheduled { action_id: ActionId, count: usize },
    Cancelled { action_id: ActionId, count: usize },
    Committed { action_id: ActionId, count: usize },
    Failed {
        action_id: ActionId,
        count: usize,
        reason: String,
    },
}
