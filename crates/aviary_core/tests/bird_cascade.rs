mod common;

use aviary_core::{AviaryStore, Item, NullSyncAdapter, StoreError};
use common::{bird, cage, pair, permit, RecordingAdapter};
use serde_json::json;

/// Mated pair housed together, one partner deleted.
#[test]
fn delete_bird_cascades_to_cage_mate_and_pair() {
    let mut store = AviaryStore::new(NullSyncAdapter);
    store.add_one(bird("1", "Budgerigar")).unwrap();
    store.add_one(bird("4", "Budgerigar")).unwrap();
    store.update_one("1", &json!({"mate_id": "4"})).unwrap();
    store.update_one("4", &json!({"mate_id": "1"})).unwrap();
    store.add_one(cage("c1", "Flight cage", &["1", "4"])).unwrap();
    store.add_one(pair("p1", "1", "4")).unwrap();

    store.delete_bird("1").unwrap();

    assert!(store.get("1").is_none());
    assert!(store.get("p1").is_none());

    let Some(Item::Cage(cage)) = store.get("c1") else {
        panic!("cage should survive");
    };
    assert_eq!(cage.bird_ids, ["4"]);

    let Some(Item::Bird(mate)) = store.get("4") else {
        panic!("mate should survive");
    };
    assert_eq!(mate.mate_id, None);
}

#[test]
fn delete_bird_matches_female_side_of_pairs_too() {
    let mut store = AviaryStore::new(NullSyncAdapter);
    store.add_one(bird("m", "Canary")).unwrap();
    store.add_one(bird("f", "Canary")).unwrap();
    store.add_one(pair("p1", "m", "f")).unwrap();
    store.add_one(pair("p2", "other", "f")).unwrap();

    store.delete_bird("f").unwrap();

    assert!(store.get("p1").is_none());
    assert!(store.get("p2").is_none());
    assert!(store.get("m").is_some());
}

#[test]
fn delete_unreferenced_bird_issues_no_spurious_updates() {
    let (adapter, calls) = RecordingAdapter::new();
    let mut store = AviaryStore::new(adapter);
    store.add_one(bird("solo", "Zebra Finch")).unwrap();
    calls.borrow_mut().clear();

    store.delete_bird("solo").unwrap();

    assert!(store.is_empty());
    assert_eq!(calls.borrow().as_slice(), ["delete birds solo"]);
}

#[test]
fn delete_bird_on_missing_id_is_a_noop() {
    let mut store = AviaryStore::new(NullSyncAdapter);
    store.add_one(bird("1", "Budgerigar")).unwrap();

    store.delete_bird("ghost").unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn delete_bird_rejects_non_bird_targets() {
    let mut store = AviaryStore::new(NullSyncAdapter);
    store.add_one(cage("c1", "Nursery", &[])).unwrap();

    let err = store.delete_bird("c1").unwrap_err();
    assert!(matches!(err, StoreError::CategoryMismatch { .. }));
    assert_eq!(store.len(), 1);
}

/// Father/mother references to a deleted bird are tolerated dangling; only
/// the mate link is cleared.
#[test]
fn delete_bird_leaves_parent_references_dangling() {
    let mut store = AviaryStore::new(NullSyncAdapter);
    store.add_one(bird("sire", "Budgerigar")).unwrap();
    store.add_one(bird("chick", "Budgerigar")).unwrap();
    store.update_one("chick", &json!({"father_id": "sire"})).unwrap();

    store.delete_bird("sire").unwrap();

    let Some(Item::Bird(chick)) = store.get("chick") else {
        panic!("chick should survive");
    };
    assert_eq!(chick.father_id.as_deref(), Some("sire"));
}

#[test]
fn delete_permit_clears_bird_references_but_keeps_birds() {
    let mut store = AviaryStore::new(NullSyncAdapter);
    store.add_one(permit("perm-1", "WLP-0042")).unwrap();
    store.add_one(bird("b", "African Grey")).unwrap();
    store
        .update_one("b", &json!({"permit_id": "perm-1", "ring_number": "R-9"}))
        .unwrap();

    store.delete_one("perm-1").unwrap();

    assert!(store.get("perm-1").is_none());
    let Some(Item::Bird(kept)) = store.get("b") else {
        panic!("bird must not be deleted with its permit");
    };
    assert_eq!(kept.permit_id, None);
    // Otherwise unchanged.
    assert_eq!(kept.ring_number.as_deref(), Some("R-9"));
    assert_eq!(kept.species, "African Grey");
}
