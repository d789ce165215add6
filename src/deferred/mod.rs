//! Deferred bulk actions with undo
//!
//! - `selection`: which emails the user has ticked
//! - `queue`: scheduled actions, their timers, undo and commit
//! - `executor`: the single remote commit call
//! - `reconciler`: per-email status (normal, pending removal, removed)

mod error;
mod executor;
mod queue;
mod reconciler;
mod selection;
mod types;

pub use executor::ActionExecutor;
pub use queue::DeferredActionQueue;
pub use reconciler::{StateReconciler, StatusCounts};
pub use selection::SelectionSet;
pub use types::{
    ActionEvent, ActionId, ActionStatus, CancelOutcome, ItemId, ItemStatus, PendingAction,
};
