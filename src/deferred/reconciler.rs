//! Authoritative per-item workflow status.
//!
//! Items absent from the map are `Normal`. Only the queue writes statuses;
//! everything else reads them.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::types::{ItemId, ItemStatus};

#[derive(Debug, Clone)]
struct Entry {
    status: ItemStatus,
    /// Reason of the last failed commit, while the item stays pending
    failure: Option<String>,
}

/// Aggregate counts for status display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub failed: usize,
    pub removed: usize,
}

/// Shared, cheaply clonable status map
#[derive(Debug, Clone, Default)]
pub struct StateReconciler {
    entries: Arc<RwLock<HashMap<ItemId, Entry>>>,
}

impl StateReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ItemId, Entry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ItemId, Entry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn status_of(&self, id: &ItemId) -> ItemStatus {
        self.read()
            .get(id)
            .map(|e| e.status)
            .unwrap_or(ItemStatus::Normal)
    }

    /// Whether the item is pending removal after a failed commit
    pub fn has_failure(&self, id: &ItemId) -> bool {
        self.read().get(id).is_some_and(|e| e.failure.is_some())
    }

    pub fn failure_reason(&self, id: &ItemId) -> Option<String> {
        self.read().get(id).and_then(|e| e.failure.clone())
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for entry in self.read().values() {
            match entry.status {
                ItemStatus::PendingRemoval if entry.failure.is_some() => counts.failed += 1,
                ItemStatus::PendingRemoval => counts.pending += 1,
                ItemStatus::Removed => counts.removed += 1,
                ItemStatus::Normal => {}
            }
        }
        counts
    }

    /// Drop bookkeeping for removed items the remote no longer reports.
    /// Entries in any other status are left alone.
    pub fn forget_removed<'a>(&self, ids: impl IntoIterator<Item = &'a ItemId>) {
        let mut entries = self.write();
        for id in ids {
            if entries
                .get(id)
                .is_some_and(|e| e.status == ItemStatus::Removed)
            {
                entries.remove(id);
            }
        }
    }

    /// All items currently reported as removed
    pub fn removed_ids(&self) -> Vec<ItemId> {
        self.read()
            .iter()
            .filter(|(_, e)| e.status == ItemStatus::Removed)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub(super) fn mark_pending(&self, ids: &[ItemId]) {
        self.set_all(ids, ItemStatus::PendingRemoval, None);
    }

    pub(super) fn mark_removed(&self, ids: &[ItemId]) {
        self.set_all(ids, ItemStatus::Removed, None);
    }

    pub(super) fn mark_failed(&self, ids: &[ItemId], reason: &str) {
        self.set_all(ids, ItemStatus::PendingRemoval, Some(reason));
    }

    pub(super) fn restore_normal(&self, ids: &[ItemId]) {
        let mut entries = self.write();
        for id in ids {
            entries.remove(id);
        }
    }

    fn set_all(&self, ids: &[ItemId], status: ItemStatus, failure: Option<&str>) {
        let mut entries = self.write();
        for id in ids {
            entries.insert(
                id.clone(),
                Entry {
                    status,
                    failure: failure.map(str::to_string),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<ItemId> {
        raw.iter().map(|s| ItemId::from(*s)).collect()
    }

    #[test]
    fn test_unknown_items_are_normal() {
        let reconciler = StateReconciler::new();
        assert_eq!(reconciler.status_of(&"x".into()), ItemStatus::Normal);
        assert!(!reconciler.has_failure(&"x".into()));
    }

    #[test]
    fn test_pending_then_removed() {
        let reconciler = StateReconciler::new();
        let targets = ids(&["a", "b"]);

        reconciler.mark_pending(&targets);
        assert_eq!(reconciler.status_of(&"a".into()), ItemStatus::PendingRemoval);
        assert_eq!(reconciler.status_of(&"b".into()), ItemStatus::PendingRemoval);

        reconciler.mark_removed(&targets);
        assert_eq!(reconciler.status_of(&"a".into()), ItemStatus::Removed);
        assert_eq!(reconciler.removed_ids().len(), 2);
    }

    #[test]
    fn test_failed_items_stay_pending_with_reason() {
        let reconciler = StateReconciler::new();
        let targets = ids(&["a"]);

        reconciler.mark_pending(&targets);
        reconciler.mark_failed(&targets, "503 Service Unavailable");

        assert_eq!(reconciler.status_of(&"a".into()), ItemStatus::PendingRemoval);
        assert!(reconciler.has_failure(&"a".into()));
        assert_eq!(
            reconciler.failure_reason(&"a".into()).as_deref(),
            Some("503 Service Unavailable")
        );
        assert_eq!(
            reconciler.counts(),
            StatusCounts {
                pending: 0,
                failed: 1,
                removed: 0
            }
        );
    }

    #[test]
    fn test_restore_clears_failure() {
        let reconciler = StateReconciler::new();
        let targets = ids(&["a", "b"]);

        reconciler.mark_failed(&targets, "boom");
        reconciler.restore_normal(&targets);

        assert_eq!(reconciler.status_of(&"a".into()), ItemStatus::Normal);
        assert!(!reconciler.has_failure(&"b".into()));
        assert_eq!(reconciler.counts(), StatusCounts::default());
    }

    #[test]
    fn test_forget_removed_only_touches_removed() {
        let reconciler = StateReconciler::new();
        reconciler.mark_removed(&ids(&["gone"]));
        reconciler.mark_pending(&ids(&["waiting"]));

        reconciler.forget_removed(&ids(&["gone", "waiting"]));

        assert_eq!(reconciler.status_of(&"gone".into()), ItemStatus::Normal);
        assert_eq!(
            reconciler.status_of(&"waiting".into()),
            ItemStatus::PendingRemoval
        );
    }

    #[test]
    fn test_clones_share_state() {
        let reconciler = StateReconciler::new();
        let view = reconciler.clone();
        reconciler.mark_pending(&ids(&["a"]));
        assert_eq!(view.status_of(&"a".into()), ItemStatus::PendingRemoval);
    }
}
