//! Recorded mutation commands and snapshot rollback.
//!
//! # Responsibility
//! - Capture each local transition as per-entity before/after commands.
//! - Rebuild the exact pre-mutation collection state on remote failure.
//!
//! # Invariants
//! - Reverting applies commands in reverse recording order.
//! - A reverted collection matches the pre-mutation snapshot exactly,
//!   including item ordering.

use crate::model::item::{Item, ItemId};

/// One entity-level command recorded during a local transition.
#[derive(Debug, Clone)]
pub(crate) enum Change {
    /// Entity was inserted; revert removes it.
    Inserted { id: ItemId },
    /// Entity was replaced in place; revert restores `before`.
    Updated { before: Item },
    /// Entity was removed from `index`; revert reinserts `before` there.
    Removed { before: Item, index: usize },
}

/// Ordered record of all commands belonging to one mutation call.
#[derive(Debug, Default)]
pub(crate) struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_insert(&mut self, id: ItemId) {
        self.changes.push(Change::Inserted { id });
    }

    pub(crate) fn record_update(&mut self, before: Item) {
        self.changes.push(Change::Updated { before });
    }

    pub(crate) fn record_remove(&mut self, before: Item, index: usize) {
        self.changes.push(Change::Removed { before, index });
    }

    pub(crate) fn len(&self) -> usize {
        self.changes.len()
    }

    /// Restores `items` to the state it had before this change set was applied.
    pub(crate) fn revert(self, items: &mut Vec<Item>) {
        for change in self.changes.into_iter().rev() {
            match change {
                Change::Inserted { id } => {
                    if let Some(pos) = items.iter().position(|item| item.id() == &id) {
                        items.remove(pos);
                    }
                }
                Change::Updated { before } => {
                    if let Some(pos) = items.iter().position(|item| item.id() == before.id()) {
                        items[pos] = before;
                    }
                }
                Change::Removed { before, index } => {
                    let at = index.min(items.len());
                    items.insert(at, before);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChangeSet;
    use crate::model::item::{Cage, Item};

    fn cage(id: &str, name: &str) -> Item {
        Item::Cage(Cage {
            id: id.to_string(),
            name: name.to_string(),
            bird_ids: Vec::new(),
        })
    }

    #[test]
    fn revert_undoes_insert_update_and_remove_in_order() {
        let mut items = vec![cage("a", "one"), cage("b", "two"), cage("c", "three")];
        let snapshot = items.clone();

        let mut changes = ChangeSet::new();

        changes.record_insert("d".to_string());
        items.insert(0, cage("d", "four"));

        changes.record_update(items[2].clone());
        items[2] = cage("b", "renamed");

        let removed = items.remove(3);
        changes.record_remove(removed, 3);

        changes.revert(&mut items);
        assert_eq!(items, snapshot);
    }

    #[test]
    fn revert_restores_removal_position_exactly() {
        let mut items = vec![cage("a", "one"), cage("b", "two"), cage("c", "three")];
        let snapshot = items.clone();

        let mut changes = ChangeSet::new();
        let removed = items.remove(1);
        changes.record_remove(removed, 1);
        let removed = items.remove(1);
        changes.record_remove(removed, 1);

        changes.revert(&mut items);
        assert_eq!(items, snapshot);
    }
}
