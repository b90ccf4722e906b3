mod common;

use aviary_core::{AviaryStore, FieldUpdate, Item, StoreError};
use common::{bird, cage, pair, permit, transaction, RecordingAdapter};
use serde_json::json;

/// Persisting "y" fails remotely; both "x" and "y" must revert.
#[test]
fn update_many_is_all_or_nothing_on_remote_failure() {
    let (adapter, _calls) = RecordingAdapter::failing_on("update transactions y");
    let mut store = AviaryStore::new(adapter);
    store.add_one(transaction("x", 1.0)).unwrap();
    store.add_one(transaction("y", 2.0)).unwrap();

    let err = store
        .update_many(&[
            FieldUpdate {
                id: "x".to_string(),
                fields: json!({"amount": 10.0}),
            },
            FieldUpdate {
                id: "y".to_string(),
                fields: json!({"amount": 20.0}),
            },
        ])
        .unwrap_err();
    assert!(matches!(err, StoreError::Sync(_)));

    let Some(Item::Transaction(x)) = store.get("x") else {
        panic!("x should survive");
    };
    let Some(Item::Transaction(y)) = store.get("y") else {
        panic!("y should survive");
    };
    assert_eq!(x.amount, 1.0);
    assert_eq!(y.amount, 2.0);
}

#[test]
fn update_many_reverts_earlier_entries_on_invalid_later_entry() {
    let (adapter, calls) = RecordingAdapter::new();
    let mut store = AviaryStore::new(adapter);
    store.add_one(transaction("x", 1.0)).unwrap();
    calls.borrow_mut().clear();

    let err = store
        .update_many(&[
            FieldUpdate {
                id: "x".to_string(),
                fields: json!({"amount": 10.0}),
            },
            FieldUpdate {
                id: "x".to_string(),
                fields: json!({"no_such_field": true}),
            },
        ])
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidFields(_)));

    let Some(Item::Transaction(x)) = store.get("x") else {
        panic!("x should survive");
    };
    assert_eq!(x.amount, 1.0);
    // Nothing reached the adapter: the batch failed before persistence.
    assert!(calls.borrow().is_empty());
}

#[test]
fn add_many_reverts_whole_batch_on_remote_failure() {
    let (adapter, _calls) = RecordingAdapter::failing_on("insert birds b");
    let mut store = AviaryStore::new(adapter);
    store.add_one(bird("old", "Canary")).unwrap();
    let before = store.snapshot();

    let err = store
        .add_many(vec![bird("a", "Budgerigar"), bird("b", "Cockatiel")])
        .unwrap_err();
    assert!(matches!(err, StoreError::Sync(_)));

    assert_eq!(store.snapshot(), before);
}

#[test]
fn add_one_reverts_on_remote_failure() {
    let (adapter, _calls) = RecordingAdapter::failing_on("insert birds solo");
    let mut store = AviaryStore::new(adapter);

    let err = store.add_one(bird("solo", "Zebra Finch")).unwrap_err();
    assert!(matches!(err, StoreError::Sync(_)));
    assert!(store.is_empty());
}

#[test]
fn delete_bird_reverts_full_cascade_on_remote_failure() {
    let (adapter, calls) = RecordingAdapter::failing_on("delete pairs p1");
    let mut store = AviaryStore::new(adapter);
    store.add_one(bird("1", "Budgerigar")).unwrap();
    store.add_one(bird("4", "Budgerigar")).unwrap();
    store.update_one("1", &json!({"mate_id": "4"})).unwrap();
    store.update_one("4", &json!({"mate_id": "1"})).unwrap();
    store.add_one(cage("c1", "Flight cage", &["1", "4"])).unwrap();
    store.add_one(pair("p1", "1", "4")).unwrap();
    let before = store.snapshot();
    calls.borrow_mut().clear();

    let err = store.delete_bird("1").unwrap_err();
    assert!(matches!(err, StoreError::Sync(_)));

    // Collection is byte-equal to the pre-call snapshot, ordering included.
    assert_eq!(store.snapshot(), before);

    // Remote writes ran updates first, deletions second.
    assert_eq!(
        calls.borrow().as_slice(),
        ["update cages c1", "update birds 4", "delete pairs p1"]
    );
}

#[test]
fn delete_permit_reverts_cleared_references_on_remote_failure() {
    let (adapter, _calls) = RecordingAdapter::failing_on("delete permits perm-1");
    let mut store = AviaryStore::new(adapter);
    store.add_one(permit("perm-1", "WLP-0042")).unwrap();
    store.add_one(bird("b", "African Grey")).unwrap();
    store.update_one("b", &json!({"permit_id": "perm-1"})).unwrap();
    let before = store.snapshot();

    let err = store.delete_one("perm-1").unwrap_err();
    assert!(matches!(err, StoreError::Sync(_)));

    assert_eq!(store.snapshot(), before);
    let Some(Item::Bird(kept)) = store.get("b") else {
        panic!("bird should survive");
    };
    assert_eq!(kept.permit_id.as_deref(), Some("perm-1"));
}
