//! Sync adapter contract and the no-remote fallback implementation.
//!
//! # Responsibility
//! - Define keyed insert/update/delete over named remote collections.
//! - Carry structured failure envelopes back to the mutation engine.
//!
//! # Invariants
//! - Adapters never mutate local state; rollback is the engine's job.
//! - One row per entity, keyed by the entity id, one table per category.

use crate::model::item::Item;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SyncResult<T> = Result<T, SyncError>;

/// Which keyed operation a failure envelope belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOp {
    Insert,
    Update,
    Delete,
}

impl Display for SyncOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Insert => f.write_str("insert"),
            Self::Update => f.write_str("update"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// Structured failure envelope from a remote persistence attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncError {
    pub op: SyncOp,
    pub table: String,
    pub code: String,
    pub message: String,
}

impl SyncError {
    pub fn new(
        op: SyncOp,
        table: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            op,
            table: table.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "remote {} on `{}` failed ({}): {}",
            self.op, self.table, self.code, self.message
        )
    }
}

impl Error for SyncError {}

/// Remote store adapter consumed by the mutation engine.
///
/// Implementations persist one row per entity into the collection named by
/// the entity's category tag. Calls are made after the local transition has
/// already been applied; a returned error triggers local rollback.
pub trait SyncAdapter {
    fn insert(&mut self, table: &str, item: &Item) -> SyncResult<()>;
    fn update(&mut self, table: &str, id: &str, item: &Item) -> SyncResult<()>;
    fn delete(&mut self, table: &str, id: &str) -> SyncResult<()>;
}

/// Adapter used when no remote store is configured.
///
/// Every call succeeds; durability then comes from the local snapshot cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSyncAdapter;

impl SyncAdapter for NullSyncAdapter {
    fn insert(&mut self, _table: &str, _item: &Item) -> SyncResult<()> {
        Ok(())
    }

    fn update(&mut self, _table: &str, _id: &str, _item: &Item) -> SyncResult<()> {
        Ok(())
    }

    fn delete(&mut self, _table: &str, _id: &str) -> SyncResult<()> {
        Ok(())
    }
}
