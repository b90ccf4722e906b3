//! Optimistic mutation engine over the flat item collection.
//!
//! # Responsibility
//! - Expose the only mutation surface for the entity graph.
//! - Apply every transition locally first, then persist through the sync
//!   adapter, reverting the local transition on remote failure.
//! - Maintain cross-entity reference hygiene on delete paths.
//!
//! # Invariants
//! - The collection is ordered most-recent-first; adds prepend.
//! - Local state is fully updated before any adapter call begins.
//! - A failed call leaves the collection byte-equal to its pre-call state.
//! - Remote writes are ordered updates-first, deletions-second within one
//!   composite operation.

use crate::model::item::{Item, ItemCategory, ItemId, ItemValidationError};
use crate::store::changeset::ChangeSet;
use crate::sync::adapter::{SyncAdapter, SyncError};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Mutation engine error.
///
/// Validation and field errors reject the call before any state change.
/// Sync errors are returned after the local transition has been reverted.
#[derive(Debug)]
pub enum StoreError {
    Validation(ItemValidationError),
    DuplicateId(ItemId),
    CategoryMismatch {
        id: ItemId,
        expected: ItemCategory,
    },
    InvalidFields(String),
    Sync(SyncError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "an entity with id `{id}` already exists"),
            Self::CategoryMismatch { id, expected } => {
                write!(f, "entity `{id}` is not in category `{expected}`")
            }
            Self::InvalidFields(message) => write!(f, "invalid update fields: {message}"),
            Self::Sync(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Sync(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemValidationError> for StoreError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SyncError> for StoreError {
    fn from(value: SyncError) -> Self {
        Self::Sync(value)
    }
}

/// One entry of an `update_many` batch: target id plus a shallow field patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub id: ItemId,
    pub fields: Value,
}

/// The owned item collection plus its remote persistence adapter.
///
/// All readers receive borrows or cloned snapshots; nothing outside this type
/// mutates the collection. Batch operations are all-or-nothing: the first
/// remote failure reverts every local change the call made.
pub struct AviaryStore<S: SyncAdapter> {
    items: Vec<Item>,
    sync: S,
}

impl<S: SyncAdapter> AviaryStore<S> {
    /// Creates an empty store over the given adapter.
    pub fn new(sync: S) -> Self {
        Self {
            items: Vec::new(),
            sync,
        }
    }

    /// Creates a store seeded with an existing collection, most-recent-first.
    ///
    /// Used when restoring from the local snapshot cache; no remote writes
    /// are issued for the seed items.
    pub fn with_items(items: Vec<Item>, sync: S) -> Self {
        Self { items, sync }
    }

    /// Borrows the collection, most-recent-first.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Resolves one weak reference at read time.
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Clones the full collection for snapshot consumers.
    pub fn snapshot(&self) -> Vec<Item> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Adds one entity at the front of the collection.
    pub fn add_one(&mut self, item: Item) -> StoreResult<()> {
        self.add_many(vec![item])
    }

    /// Adds a batch of entities, preserving batch order at the front.
    ///
    /// All-or-nothing: the first remote insert failure reverts the entire
    /// batch locally and returns the error.
    pub fn add_many(&mut self, new_items: Vec<Item>) -> StoreResult<()> {
        for item in &new_items {
            item.validate()?;
            if self.position(item.id()).is_some() {
                return Err(StoreError::DuplicateId(item.id().clone()));
            }
        }
        for (index, item) in new_items.iter().enumerate() {
            if new_items[..index].iter().any(|other| other.id() == item.id()) {
                return Err(StoreError::DuplicateId(item.id().clone()));
            }
        }

        let mut changes = ChangeSet::new();
        for (offset, item) in new_items.iter().enumerate() {
            changes.record_insert(item.id().clone());
            self.items.insert(offset, item.clone());
        }

        for item in &new_items {
            let table = item.category().table();
            if let Err(err) = self.sync.insert(table, item) {
                error!(
                    "event=store_add module=store status=error table={table} id={} error={err}",
                    item.id()
                );
                self.revert(changes, "add");
                return Err(err.into());
            }
        }

        info!(
            "event=store_add module=store status=ok count={}",
            new_items.len()
        );
        Ok(())
    }

    /// Shallow-merges a JSON object of fields into the entity matching `id`.
    ///
    /// `null` clears an optional field; `id` and `category` keys are ignored.
    /// A missing id is a local no-op.
    pub fn update_one(&mut self, id: &str, fields: &Value) -> StoreResult<()> {
        self.update_many(&[FieldUpdate {
            id: id.to_string(),
            fields: fields.clone(),
        }])
    }

    /// Applies a batch of shallow field merges.
    ///
    /// All-or-nothing: the first failure (invalid fields, validation, or
    /// remote) reverts every local change the batch made and returns the
    /// error. Entries whose id is absent are skipped.
    pub fn update_many(&mut self, updates: &[FieldUpdate]) -> StoreResult<()> {
        let mut changes = ChangeSet::new();
        let mut applied: Vec<Item> = Vec::new();

        for update in updates {
            let Some(pos) = self.position(&update.id) else {
                debug!(
                    "event=store_update module=store status=skip id={} reason=not_found",
                    update.id
                );
                continue;
            };

            let before = self.items[pos].clone();
            let after = match merge_fields(&before, &update.fields) {
                Ok(after) => after,
                Err(err) => {
                    self.revert(changes, "update");
                    return Err(err);
                }
            };
            if let Err(err) = after.validate() {
                self.revert(changes, "update");
                return Err(err.into());
            }

            self.items[pos] = after.clone();
            changes.record_update(before);
            applied.push(after);
        }

        for item in &applied {
            let table = item.category().table();
            if let Err(err) = self.sync.update(table, item.id(), item) {
                error!(
                    "event=store_update module=store status=error table={table} id={} error={err}",
                    item.id()
                );
                self.revert(changes, "update");
                return Err(err.into());
            }
        }

        info!(
            "event=store_update module=store status=ok count={}",
            applied.len()
        );
        Ok(())
    }

    /// Removes the entity with this id.
    ///
    /// A missing id is a local no-op. Deleting a Permit also clears
    /// `permit_id` on every bird referencing it, persisted as updates before
    /// the delete inside the same rollback envelope. Other weak references
    /// to the removed entity are left to dangle.
    pub fn delete_one(&mut self, id: &str) -> StoreResult<()> {
        let Some(pos) = self.position(id) else {
            debug!("event=store_delete module=store status=skip id={id} reason=not_found");
            return Ok(());
        };

        let mut changes = ChangeSet::new();
        let mut updated: Vec<Item> = Vec::new();

        if matches!(self.items[pos], Item::Permit(_)) {
            self.clear_permit_references(id, &mut changes, &mut updated);
        }

        let before = self.items.remove(pos);
        let table = before.category().table();
        changes.record_remove(before, pos);

        if let Err(err) = self.persist_updates_then_deletes(&updated, &[(table, id.to_string())]) {
            self.revert(changes, "delete");
            return Err(err);
        }

        info!("event=store_delete module=store status=ok table={table} id={id}");
        Ok(())
    }

    /// Cascading bird delete.
    ///
    /// In one local transition: the housing cage drops the bird from
    /// `bird_ids`, the bird's mate (if any) has its own `mate_id` cleared,
    /// every pair naming the bird as male or female is deleted, and the bird
    /// itself is deleted. Remote persistence runs updates first, deletions
    /// second; any remote error reverts the whole transition.
    ///
    /// Mate clearing is one-directional; dangling father/mother references
    /// on other birds are tolerated by readers.
    pub fn delete_bird(&mut self, bird_id: &str) -> StoreResult<()> {
        let Some(pos) = self.position(bird_id) else {
            debug!("event=store_delete_bird module=store status=skip id={bird_id} reason=not_found");
            return Ok(());
        };
        let Item::Bird(bird) = self.items[pos].clone() else {
            return Err(StoreError::CategoryMismatch {
                id: bird_id.to_string(),
                expected: ItemCategory::Bird,
            });
        };

        let mut changes = ChangeSet::new();
        let mut updated: Vec<Item> = Vec::new();

        // Housing: at most one cage should name this bird.
        if let Some(cage_pos) = self.items.iter().position(|item| {
            matches!(item, Item::Cage(cage) if cage.bird_ids.iter().any(|id| id == bird_id))
        }) {
            let before = self.items[cage_pos].clone();
            if let Item::Cage(cage) = &mut self.items[cage_pos] {
                cage.bird_ids.retain(|id| id != bird_id);
            }
            changes.record_update(before);
            updated.push(self.items[cage_pos].clone());
        }

        if let Some(mate_id) = bird.mate_id.as_deref() {
            if let Some(mate_pos) = self
                .items
                .iter()
                .position(|item| matches!(item, Item::Bird(mate) if mate.id == mate_id))
            {
                let before = self.items[mate_pos].clone();
                if let Item::Bird(mate) = &mut self.items[mate_pos] {
                    mate.mate_id = None;
                }
                changes.record_update(before);
                updated.push(self.items[mate_pos].clone());
            }
        }

        let pair_ids: Vec<ItemId> = self
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Pair(pair) if pair.male_id == bird_id || pair.female_id == bird_id => {
                    Some(pair.id.clone())
                }
                _ => None,
            })
            .collect();

        let mut deletions: Vec<(&'static str, ItemId)> = Vec::new();
        for pair_id in &pair_ids {
            if let Some(pair_pos) = self.position(pair_id) {
                let before = self.items.remove(pair_pos);
                changes.record_remove(before, pair_pos);
                deletions.push((ItemCategory::Pair.table(), pair_id.clone()));
            }
        }
        if let Some(bird_pos) = self.position(bird_id) {
            let before = self.items.remove(bird_pos);
            changes.record_remove(before, bird_pos);
            deletions.push((ItemCategory::Bird.table(), bird_id.to_string()));
        }

        if let Err(err) = self.persist_updates_then_deletes(&updated, &deletions) {
            self.revert(changes, "delete_bird");
            return Err(err);
        }

        info!(
            "event=store_delete_bird module=store status=ok id={bird_id} pairs_deleted={} updates={}",
            pair_ids.len(),
            updated.len()
        );
        Ok(())
    }

    fn clear_permit_references(
        &mut self,
        permit_id: &str,
        changes: &mut ChangeSet,
        updated: &mut Vec<Item>,
    ) {
        for index in 0..self.items.len() {
            let references_permit = matches!(
                &self.items[index],
                Item::Bird(bird) if bird.permit_id.as_deref() == Some(permit_id)
            );
            if !references_permit {
                continue;
            }

            let before = self.items[index].clone();
            if let Item::Bird(bird) = &mut self.items[index] {
                bird.permit_id = None;
            }
            changes.record_update(before);
            updated.push(self.items[index].clone());
        }
    }

    fn persist_updates_then_deletes(
        &mut self,
        updated: &[Item],
        deletions: &[(&'static str, ItemId)],
    ) -> StoreResult<()> {
        for item in updated {
            self.sync.update(item.category().table(), item.id(), item)?;
        }
        for (table, id) in deletions {
            self.sync.delete(table, id)?;
        }
        Ok(())
    }

    fn revert(&mut self, changes: ChangeSet, op: &str) {
        error!(
            "event=store_revert module=store status=ok op={op} reverted_changes={}",
            changes.len()
        );
        changes.revert(&mut self.items);
    }
}

/// Shallow-merges a JSON object of fields into one entity.
///
/// The entity is serialized with its inline `category` tag, the patch keys
/// replace top-level fields (`null` clears optionals), and the result is
/// decoded back into a typed `Item`. `id` and `category` keys are skipped;
/// keys that name no field of the entity are rejected.
pub(crate) fn merge_fields(item: &Item, fields: &Value) -> StoreResult<Item> {
    let Some(patch) = fields.as_object() else {
        return Err(StoreError::InvalidFields(
            "update fields must be a JSON object".to_string(),
        ));
    };

    let mut doc = serde_json::to_value(item)
        .map_err(|err| StoreError::InvalidFields(format!("entity did not serialize: {err}")))?;
    let Some(doc_map) = doc.as_object_mut() else {
        return Err(StoreError::InvalidFields(
            "entity did not serialize to an object".to_string(),
        ));
    };

    for (key, value) in patch {
        if key == "id" || key == "category" {
            continue;
        }
        if !doc_map.contains_key(key) {
            return Err(StoreError::InvalidFields(format!(
                "`{key}` is not a field of category `{}`",
                item.category()
            )));
        }
        doc_map.insert(key.clone(), value.clone());
    }

    serde_json::from_value(doc)
        .map_err(|err| StoreError::InvalidFields(format!("merged entity did not decode: {err}")))
}

#[cfg(test)]
mod tests {
    use super::merge_fields;
    use crate::model::item::{Bird, Item};
    use serde_json::json;

    #[test]
    fn merge_replaces_and_clears_top_level_fields() {
        let mut bird = Bird::new("Lovebird");
        bird.mate_id = Some("m-1".to_string());
        let item = Item::Bird(bird);

        let merged = merge_fields(
            &item,
            &json!({"species": "Fischer's Lovebird", "mate_id": null}),
        )
        .unwrap();

        let Item::Bird(merged) = merged else {
            panic!("category changed during merge");
        };
        assert_eq!(merged.species, "Fischer's Lovebird");
        assert_eq!(merged.mate_id, None);
    }

    #[test]
    fn merge_ignores_id_and_category_keys() {
        let item = Item::Bird(Bird::new("Budgerigar"));
        let original_id = item.id().clone();

        let merged = merge_fields(&item, &json!({"id": "hijacked", "category": "cage"})).unwrap();
        assert_eq!(merged.id(), &original_id);
        assert!(matches!(merged, Item::Bird(_)));
    }

    #[test]
    fn merge_rejects_unknown_keys_and_non_objects() {
        let item = Item::Bird(Bird::new("Budgerigar"));

        assert!(merge_fields(&item, &json!({"wingspan": 20})).is_err());
        assert!(merge_fields(&item, &json!([1, 2, 3])).is_err());
    }
}
