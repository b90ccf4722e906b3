//! Shared test fixtures: a recording sync adapter and entity builders.

// Not every test file exercises every fixture.
#![allow(dead_code)]

use aviary_core::{
    Bird, Cage, Item, Pair, Permit, SyncAdapter, SyncError, SyncOp, SyncResult, Transaction,
    TransactionKind,
};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::rc::Rc;

/// Sync adapter that records every call as `"{op} {table} {id}"` and can be
/// told to fail on one exact call signature.
pub struct RecordingAdapter {
    calls: Rc<RefCell<Vec<String>>>,
    fail_on: Option<String>,
}

impl RecordingAdapter {
    pub fn new() -> (Self, Rc<RefCell<Vec<String>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                calls: Rc::clone(&calls),
                fail_on: None,
            },
            calls,
        )
    }

    pub fn failing_on(signature: &str) -> (Self, Rc<RefCell<Vec<String>>>) {
        let (mut adapter, calls) = Self::new();
        adapter.fail_on = Some(signature.to_string());
        (adapter, calls)
    }

    fn record(&mut self, op: SyncOp, signature: String, table: &str) -> SyncResult<()> {
        self.calls.borrow_mut().push(signature.clone());
        if self.fail_on.as_deref() == Some(signature.as_str()) {
            return Err(SyncError::new(
                op,
                table,
                "remote_unavailable",
                "injected failure",
            ));
        }
        Ok(())
    }
}

impl SyncAdapter for RecordingAdapter {
    fn insert(&mut self, table: &str, item: &Item) -> SyncResult<()> {
        self.record(SyncOp::Insert, format!("insert {table} {}", item.id()), table)
    }

    fn update(&mut self, table: &str, id: &str, _item: &Item) -> SyncResult<()> {
        self.record(SyncOp::Update, format!("update {table} {id}"), table)
    }

    fn delete(&mut self, table: &str, id: &str) -> SyncResult<()> {
        self.record(SyncOp::Delete, format!("delete {table} {id}"), table)
    }
}

pub fn bird(id: &str, species: &str) -> Item {
    let mut bird = Bird::new(species);
    bird.id = id.to_string();
    Item::Bird(bird)
}

pub fn cage(id: &str, name: &str, bird_ids: &[&str]) -> Item {
    let mut cage = Cage::new(name);
    cage.id = id.to_string();
    cage.bird_ids = bird_ids.iter().map(|id| id.to_string()).collect();
    Item::Cage(cage)
}

pub fn pair(id: &str, male_id: &str, female_id: &str) -> Item {
    let mut pair = Pair::new(male_id, female_id);
    pair.id = id.to_string();
    Item::Pair(pair)
}

pub fn permit(id: &str, permit_number: &str) -> Item {
    Item::Permit(Permit {
        id: id.to_string(),
        permit_number: permit_number.to_string(),
        issuing_authority: "State Wildlife Dept".to_string(),
        issue_date: date(2025, 3, 1),
        expiry_date: None,
    })
}

pub fn transaction(id: &str, amount: f64) -> Item {
    Item::Transaction(Transaction {
        id: id.to_string(),
        kind: TransactionKind::Expense,
        date: date(2026, 1, 15),
        description: "seed mix".to_string(),
        amount,
        related_bird_id: None,
    })
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}
