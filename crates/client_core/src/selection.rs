use std::collections::BTreeSet;

use shared::domain::ItemId;

/// Selected ids, independent of which items are currently materialized.
///
/// Local toggles win for the session: a failed save is never rolled back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    selected: BTreeSet<ItemId>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hydrate(&mut self, ids: impl IntoIterator<Item = ItemId>) {
        self.selected = ids.into_iter().collect();
    }

    /// Flips membership of `id` and returns whether it is now selected.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The full set in ascending id order, as persisted by `POST /selected`.
    pub fn to_vec(&self) -> Vec<ItemId> {
        self.selected.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut store = SelectionStore::new();
        store.hydrate([ItemId(3)]);

        assert!(store.toggle(ItemId(7)));
        assert_eq!(store.to_vec(), vec![ItemId(3), ItemId(7)]);

        assert!(!store.toggle(ItemId(7)));
        assert_eq!(store.to_vec(), vec![ItemId(3)]);
    }

    #[test]
    fn double_toggle_restores_prior_state() {
        let mut store = SelectionStore::new();
        store.hydrate([ItemId(1), ItemId(40), ItemId(900)]);
        let before = store.clone();

        for id in [ItemId(1), ItemId(2), ItemId(900)] {
            store.toggle(id);
            store.toggle(id);
            assert_eq!(store, before);
        }
    }

    #[test]
    fn hydrate_replaces_and_dedupes() {
        let mut store = SelectionStore::new();
        store.toggle(ItemId(5));
        store.hydrate([ItemId(9), ItemId(2), ItemId(9)]);
        assert_eq!(store.len(), 2);
        assert!(!store.contains(ItemId(5)));
        assert_eq!(store.to_vec(), vec![ItemId(2), ItemId(9)]);
    }
}
