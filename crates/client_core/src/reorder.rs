//! Drag-and-drop gesture state and the local move it produces.

use shared::domain::{Item, ItemId};

/// The item being dragged, alive only for the duration of one gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    dragged: Option<ItemId>,
}

impl DragState {
    pub fn start(&mut self, id: ItemId) {
        self.dragged = Some(id);
    }

    pub fn dragged(&self) -> Option<ItemId> {
        self.dragged
    }

    pub fn take(&mut self) -> Option<ItemId> {
        self.dragged.take()
    }

    pub fn clear(&mut self) {
        self.dragged = None;
    }
}

/// A resolved drop: positions in the local window plus the global ids sent
/// to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlan {
    pub dragged: ItemId,
    pub target: ItemId,
    pub from: usize,
    pub to: usize,
}

impl MovePlan {
    pub fn is_forward(&self) -> bool {
        self.from < self.to
    }
}

/// Resolves a drop of `dragged` onto `target` against the local window.
/// Returns `None` for a self-drop or when either id is not materialized.
pub fn plan_move(items: &[Item], dragged: ItemId, target: ItemId) -> Option<MovePlan> {
    if dragged == target {
        return None;
    }
    let from = items.iter().position(|item| item.id == dragged)?;
    let to = items.iter().position(|item| item.id == target)?;
    Some(MovePlan {
        dragged,
        target,
        from,
        to,
    })
}

/// Removes the dragged item and reinserts it at the target's original index.
///
/// Moving forward, the removal shifts the target down by one, so the item
/// lands right after the target. Moving backward, it takes the target's slot
/// and the target shifts down behind it.
pub fn apply_move(items: &mut Vec<Item>, plan: &MovePlan) {
    let moved = items.remove(plan.from);
    items.insert(plan.to, moved);
}

#[cfg(test)]
#[path = "tests/reorder_tests.rs"]
mod tests;
