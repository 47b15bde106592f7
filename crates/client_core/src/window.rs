use std::collections::HashSet;

use shared::domain::{Item, ItemId};

/// The client-side prefix of the remote, search-filtered collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemWindow {
    items: Vec<Item>,
}

impl ItemWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.position(id).is_some()
    }

    pub fn replace(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    /// Appends a following page, keeping the current order. Ids already in
    /// the window are skipped; a local reorder can shift the server's page
    /// boundaries and hand the same item back a second time.
    pub fn append(&mut self, items: Vec<Item>) -> usize {
        let mut seen: HashSet<ItemId> = self.items.iter().map(|item| item.id).collect();
        let before = self.items.len();
        self.items
            .extend(items.into_iter().filter(|item| seen.insert(item.id)));
        self.items.len() - before
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }
}
