//! Multi-select tracking for the email list

use std::collections::HashSet;

use super::types::ItemId;

/// Currently selected item IDs, kept in the order they were selected
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    order: Vec<ItemId>,
    members: HashSet<ItemId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &ItemId) -> bool {
        if self.members.remove(id) {
            self.order.retain(|selected| selected != id);
            false
        } else {
            self.members.insert(id.clone());
            self.order.push(id.clone());
            true
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Detached copy of the selection; later toggles do not affect it
    pub fn snapshot(&self) -> Vec<ItemId> {
        self.order.clone()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Select every id not already selected
    pub fn select_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a ItemId>) {
        for id in ids {
            if self.members.insert(id.clone()) {
                self.order.push(id.clone());
            }
        }
    }

    /// Keep only the ids for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&ItemId) -> bool) {
        let members = &mut self.members;
        self.order.retain(|id| {
            let keep = keep(id);
            if !keep {
                members.remove(id);
            }
            keep
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<ItemId> {
        raw.iter().map(|s| ItemId::from(*s)).collect()
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut selection = SelectionSet::new();
        let a = ItemId::from("a");

        assert!(selection.toggle(&a));
        assert!(selection.contains(&a));
        assert!(!selection.toggle(&a));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_final_selection_is_ids_toggled_odd_times() {
        let mut selection = SelectionSet::new();
        let sequence = ids(&["a", "b", "a", "c", "b", "b", "d", "d", "a"]);
        for id in &sequence {
            selection.toggle(id);
        }

        // a: 3, b: 3, c: 1, d: 2
        let mut selected = selection.snapshot();
        selected.sort();
        assert_eq!(selected, ids(&["a", "b", "c"]));
    }

    #[test]
    fn test_snapshot_is_detached_from_live_selection() {
        let mut selection = SelectionSet::new();
        for id in ids(&["a", "b"]) {
            selection.toggle(&id);
        }

        let snapshot = selection.snapshot();
        selection.toggle(&ItemId::from("c"));
        selection.toggle(&ItemId::from("a"));

        assert_eq!(snapshot, ids(&["a", "b"]));
        assert_eq!(selection.snapshot(), ids(&["b", "c"]));
    }

    #[test]
    fn test_snapshot_keeps_selection_order() {
        let mut selection = SelectionSet::new();
        for id in ids(&["c", "a", "b"]) {
            selection.toggle(&id);
        }
        assert_eq!(selection.snapshot(), ids(&["c", "a", "b"]));
    }

    #[test]
    fn test_select_all_skips_existing() {
        let mut selection = SelectionSet::new();
        selection.toggle(&ItemId::from("b"));
        let all = ids(&["a", "b", "c"]);
        selection.select_all(&all);

        assert_eq!(selection.len(), 3);
        assert_eq!(selection.snapshot(), ids(&["b", "a", "c"]));
    }

    #[test]
    fn test_retain_drops_members() {
        let mut selection = SelectionSet::new();
        selection.select_all(&ids(&["a", "b", "c"]));
        selection.retain(|id| id.as_str() != "b");

        assert!(!selection.contains(&ItemId::from("b")));
        assert_eq!(selection.snapshot(), ids(&["a", "c"]));
    }

    #[test]
    fn test_clear() {
        let mut selection = SelectionSet::new();
        selection.select_all(&ids(&["a", "b"]));
        selection.clear();
        assert!(selection.is_empty());
        assert!(selection.snapshot().is_empty());
    }
}
