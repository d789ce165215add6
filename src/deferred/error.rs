use std::time::Duration;

use thiserror::Error;

use super::types::{ActionId, ActionStatus, ItemId};

/// Errors reported synchronously by the deferred action queue.
///
/// None of these leave the queue or the reconciler in a modified state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeferredError {
    #[error("Invalid target: {0}")]
    InvalidTarget(#[from] InvalidTarget),

    #[error("Action {0} already resolved ({1})")]
    AlreadyResolved(ActionId, ActionStatus),

    #[error("Action {0} has not failed ({1})")]
    NotFailed(ActionId, ActionStatus),

    #[error("Unknown action {0}")]
    UnknownAction(ActionId),

    #[error("Grace window of {0:?} is too long")]
    GraceTooLong(Duration),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidTarget {
    #[error("nothing selected")]
    Empty,

    #[error("{id} is already pending removal")]
    AlreadyPending { id: ItemId, action: Option<ActionId> },

    #[error("{0} was already removed")]
    AlreadyRemoved(ItemId),
}

/// The external commit call failed after the grace window elapsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Commit failed: {reason}")]
pub struct CommitError {
    pub reason: String,
}

impl CommitError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeferredError>;
