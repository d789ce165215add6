//! Deferred action queue: scheduling, undo and commit of bulk deletes.
//!
//! Every action owns a background timer task and a cancellation token. The
//! timer and `cancel` race on a per-action atomic status; exactly one of them
//! moves the action out of `Scheduled`.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Notify, mpsc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::{DeferredError, InvalidTarget, Result};
use super::executor::ActionExecutor;
use super::reconciler::StateReconciler;
use super::types::{
    ActionEvent, ActionId, ActionStatus, CancelOutcome, ItemId, ItemStatus, PendingAction,
};
use crate::constants::{ACTION_EVENT_CAPACITY, RESOLVED_HISTORY};

struct ActionRecord {
    id: ActionId,
    target_ids: Vec<ItemId>,
    created_at: DateTime<Utc>,
    deadline: Instant,
    grace: Duration,
    status: AtomicU8,
    failure: Mutex<Option<String>>,
    cancel: CancellationToken,
    /// Woken once the status becomes terminal
    done: Notify,
}

impl ActionRecord {
    fn new(id: ActionId, target_ids: Vec<ItemId>, deadline: Instant, grace: Duration) -> Self {
        Self {
            id,
            target_ids,
            created_at: Utc::now(),
            deadline,
            grace,
            status: AtomicU8::new(ActionStatus::Scheduled as u8),
            failure: Mutex::new(None),
            cancel: CancellationToken::new(),
            done: Notify::new(),
        }
    }

    fn status(&self) -> ActionStatus {
        ActionStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Compare-and-set the status. Terminal states never transition again.
    fn try_transition(&self, from: ActionStatus, to: ActionStatus) -> bool {
        if from.is_terminal() {
            return false;
        }
        self.status
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Wait until the action reaches a terminal status
    async fn settled(&self) -> ActionStatus {
        loop {
            let notified = self.done.notified();
            let status = self.status();
            if status.is_terminal() {
                return status;
            }
            notified.await;
        }
    }

    fn failure(&self) -> Option<String> {
        self.failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn set_failure(&self, reason: &str) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(reason.to_string());
    }

    fn snapshot(&self) -> PendingAction {
        PendingAction {
            action_id: self.id,
            target_ids: self.target_ids.clone(),
            created_at: self.created_at,
            deadline: self.deadline,
            grace: self.grace,
            status: self.status(),
            failure: self.failure(),
        }
    }
}

/// Bookkeeping of the actions the queue has issued
#[derive(Default)]
struct Book {
    /// `Scheduled` or `Committing`
    active: BTreeMap<ActionId, Arc<ActionRecord>>,
    /// `Failed`, awaiting retry or dismissal
    failed: BTreeMap<ActionId, Arc<ActionRecord>>,
    /// Final status of the most recently resolved actions. Bounded by
    /// `RESOLVED_HISTORY`; the oldest ids are evicted first.
    resolved: BTreeMap<ActionId, ActionStatus>,
}

impl Book {
    /// Record of an action that is still active or awaiting a failure decision
    fn find(&self, id: ActionId) -> Option<&Arc<ActionRecord>> {
        self.active.get(&id).or_else(|| self.failed.get(&id))
    }

    /// Current status of any action still remembered
    fn status_of(&self, id: ActionId) -> Option<ActionStatus> {
        self.find(id)
            .map(|record| record.status())
            .or_else(|| self.resolved.get(&id).copied())
    }

    fn retire(&mut self, id: ActionId, status: ActionStatus) {
        self.resolved.insert(id, status);
        while self.resolved.len() > RESOLVED_HISTORY {
            self.resolved.pop_first();
        }
    }

    fn governing(&self, item: &ItemId) -> Option<ActionId> {
        self.active
            .values()
            .chain(self.failed.values())
            .find(|record| record.target_ids.contains(item))
            .map(|record| record.id)
    }
}

struct Shared {
    book: Mutex<Book>,
    reconciler: StateReconciler,
    executor: ActionExecutor,
    next_id: AtomicU64,
    events: Mutex<Option<mpsc::Sender<ActionEvent>>>,
}

/// Owner of all in-flight deferred actions.
///
/// Cheap to clone; clones share the same queue. `enqueue` and `retry` spawn
/// timer tasks and must be called from within a tokio runtime.
#[derive(Clone)]
pub struct DeferredActionQueue {
    shared: Arc<Shared>,
}

impl DeferredActionQueue {
    pub fn new(reconciler: StateReconciler, executor: ActionExecutor) -> Self {
        Self {
            shared: Arc::new(Shared {
                book: Mutex::new(Book::default()),
                reconciler,
                executor,
                next_id: AtomicU64::new(1),
                events: Mutex::new(None),
            }),
        }
    }

    /// Receive lifecycle events. A new subscription replaces the previous one.
    pub fn subscribe(&self) -> mpsc::Receiver<ActionEvent> {
        let (tx, rx) = mpsc::channel(ACTION_EVENT_CAPACITY);
        *self.shared.events.lock().unwrap_or_else(|e| e.into_inner()) = Some(tx);
        rx
    }

    pub fn reconciler(&self) -> &StateReconciler {
        &self.shared.reconciler
    }

    fn book(&self) -> MutexGuard<'_, Book> {
        self.shared.book.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: ActionEvent) {
        let tx = self
            .shared
            .events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(tx) = tx
            && let Err(e) = tx.try_send(event)
        {
            tracing::warn!("Dropping action event: {}", e);
        }
    }

    /// Schedule a deferred delete of `target_ids`, committed after `grace`
    /// unless cancelled first.
    ///
    /// Duplicate ids are collapsed. Rejects the whole request, without
    /// touching any state, when the targets are empty or any of them is
    /// already pending or removed.
    pub fn enqueue(&self, target_ids: Vec<ItemId>, grace: Duration) -> Result<PendingAction> {
        let record = {
            let mut book = self.book();
            self.schedule_locked(&mut book, target_ids, grace)?
        };
        Ok(self.start(record))
    }

    fn schedule_locked(
        &self,
        book: &mut Book,
        target_ids: Vec<ItemId>,
        grace: Duration,
    ) -> Result<Arc<ActionRecord>> {
        let mut seen = HashSet::new();
        let target_ids: Vec<ItemId> = target_ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        if target_ids.is_empty() {
            return Err(InvalidTarget::Empty.into());
        }

        let reconciler = &self.shared.reconciler;
        for id in &target_ids {
            match reconciler.status_of(id) {
                ItemStatus::Normal => {}
                ItemStatus::PendingRemoval => {
                    return Err(InvalidTarget::AlreadyPending {
                        id: id.clone(),
                        action: book.governing(id),
                    }
                    .into());
                }
                ItemStatus::Removed => {
                    return Err(InvalidTarget::AlreadyRemoved(id.clone()).into());
                }
            }
        }

        let deadline = Instant::now()
            .checked_add(grace)
            .ok_or(DeferredError::GraceTooLong(grace))?;

        let id = ActionId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        let record = Arc::new(ActionRecord::new(id, target_ids, deadline, grace));
        reconciler.mark_pending(&record.target_ids);
        book.active.insert(id, Arc::clone(&record));
        Ok(record)
    }

    /// Spawn the timer for a freshly scheduled action
    fn start(&self, record: Arc<ActionRecord>) -> PendingAction {
        let queue = self.clone();
        let token = record.cancel.clone();
        let deadline = record.deadline;
        let id = record.id;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::trace!(action_id = %id, "Timer stopped");
                }
                _ = tokio::time::sleep_until(deadline) => {
                    if let Err(e) = queue.commit_now(id).await {
                        tracing::debug!(action_id = %id, "Timer fired after resolution: {}", e);
                    }
                }
            }
        });

        tracing::debug!(
            action_id = %id,
            count = record.target_ids.len(),
            grace_ms = record.grace.as_millis() as u64,
            "Scheduled deferred action"
        );
        self.emit(ActionEvent::Scheduled {
            action_id: id,
            count: record.target_ids.len(),
        });
        record.snapshot()
    }

    /// Undo a scheduled action. Cancelling an action that already left
    /// `Scheduled` reports `AlreadyResolved` and changes nothing.
    pub fn cancel(&self, id: ActionId) -> Result<CancelOutcome> {
        let record = {
            let book = self.book();
            match book.find(id) {
                Some(record) => Arc::clone(record),
                None => {
                    return match book.resolved.get(&id) {
                        Some(status) => Ok(CancelOutcome::AlreadyResolved(*status)),
                        None => Err(DeferredError::UnknownAction(id)),
                    };
                }
            }
        };

        if !record.try_transition(ActionStatus::Scheduled, ActionStatus::Cancelled) {
            let status = record.status();
            tracing::debug!(action_id = %id, %status, "Cancel lost to resolution");
            return Ok(CancelOutcome::AlreadyResolved(status));
        }
        record.cancel.cancel();
        record.done.notify_waiters();

        {
            let mut book = self.book();
            book.active.remove(&id);
            self.shared.reconciler.restore_normal(&record.target_ids);
            book.retire(id, ActionStatus::Cancelled);
        }

        tracing::debug!(action_id = %id, "Cancelled deferred action");
        self.emit(ActionEvent::Cancelled {
            action_id: id,
            count: record.target_ids.len(),
        });
        Ok(CancelOutcome::Cancelled)
    }

    /// Resolve a scheduled action right away, as if its grace window had
    /// elapsed. Returns the terminal status; a failed commit is reported as
    /// `Ok(ActionStatus::Failed)`.
    pub async fn commit_now(&self, id: ActionId) -> Result<ActionStatus> {
        let record = {
            let book = self.book();
            match book.find(id) {
                Some(record) => Arc::clone(record),
                None => {
                    return Err(match book.resolved.get(&id) {
                        Some(status) => DeferredError::AlreadyResolved(id, *status),
                        None => DeferredError::UnknownAction(id),
                    });
                }
            }
        };

        if !record.try_transition(ActionStatus::Scheduled, ActionStatus::Committing) {
            return Err(DeferredError::AlreadyResolved(id, record.status()));
        }
        record.cancel.cancel();

        let count = record.target_ids.len();
        let outcome = self
            .shared
            .executor
            .commit(id, &record.target_ids)
            .await;

        let mut book = self.book();
        book.active.remove(&id);
        match outcome {
            Ok(receipt) => {
                record.try_transition(ActionStatus::Committing, ActionStatus::Committed);
                self.shared.reconciler.mark_removed(&record.target_ids);
                book.retire(id, ActionStatus::Committed);
                drop(book);
                record.done.notify_waiters();

                tracing::info!(
                    action_id = %receipt.action_id,
                    count = receipt.count,
                    at = %receipt.committed_at,
                    "Deferred action committed"
                );
                self.emit(ActionEvent::Committed {
                    action_id: id,
                    count,
                });
                Ok(ActionStatus::Committed)
            }
            Err(e) => {
                record.set_failure(&e.reason);
                record.try_transition(ActionStatus::Committing, ActionStatus::Failed);
                self.shared
                    .reconciler
                    .mark_failed(&record.target_ids, &e.reason);
                book.failed.insert(id, Arc::clone(&record));
                drop(book);
                record.done.notify_waiters();

                self.emit(ActionEvent::Failed {
                    action_id: id,
                    count,
                    reason: e.reason,
                });
                Ok(ActionStatus::Failed)
            }
        }
    }

    /// Commit every scheduled action immediately and wait for commits
    /// already in flight. Returns the final status of each, oldest first.
    pub async fn flush(&self) -> Vec<(ActionId, ActionStatus)> {
        let active: Vec<Arc<ActionRecord>> = self.book().active.values().cloned().collect();

        let mut results = Vec::with_capacity(active.len());
        for record in active {
            let status = match self.commit_now(record.id).await {
                Ok(status) => status,
                // Committing already, or cancelled meanwhile
                Err(e) => {
                    tracing::debug!(action_id = %record.id, "Waiting during flush: {}", e);
                    record.settled().await
                }
            };
            results.push((record.id, status));
        }
        results
    }

    /// Re-issue a failed action over the same targets with no grace window
    pub fn retry(&self, id: ActionId) -> Result<PendingAction> {
        let record = {
            let mut book = self.book();
            let failed = self.take_failed(&mut book, id)?;
            self.shared.reconciler.restore_normal(&failed.target_ids);
            let targets = failed.target_ids.clone();
            book.retire(id, ActionStatus::Failed);
            self.schedule_locked(&mut book, targets, Duration::ZERO)?
        };
        tracing::debug!(action_id = %id, retry = %record.id, "Retrying failed action");
        Ok(self.start(record))
    }

    /// Give up on a failed action and restore its targets
    pub fn dismiss(&self, id: ActionId) -> Result<()> {
        let mut book = self.book();
        let failed = self.take_failed(&mut book, id)?;
        self.shared.reconciler.restore_normal(&failed.target_ids);
        book.retire(id, ActionStatus::Failed);
        tracing::debug!(action_id = %id, "Dismissed failed action");
        Ok(())
    }

    fn take_failed(&self, book: &mut Book, id: ActionId) -> Result<Arc<ActionRecord>> {
        if let Some(record) = book.failed.remove(&id) {
            return Ok(record);
        }
        match book.status_of(id) {
            Some(status) => Err(DeferredError::NotFailed(id, status)),
            None => Err(DeferredError::UnknownAction(id)),
        }
    }

    /// Actions not yet resolved, oldest first
    pub fn list_pending(&self) -> Vec<PendingAction> {
        self.book()
            .active
            .values()
            .map(|record| record.snapshot())
            .collect()
    }

    /// Failed actions awaiting retry or dismissal, oldest first
    pub fn list_failed(&self) -> Vec<PendingAction> {
        self.book()
            .failed
            .values()
            .map(|record| record.snapshot())
            .collect()
    }

    /// Status of an action, resolved ones included while still remembered
    #[cfg(test)]
    pub fn status(&self, id: ActionId) -> Option<ActionStatus> {
        self.book().status_of(id)
    }
}
