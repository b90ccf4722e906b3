//! Core domain logic for the aviary manager.
//! This crate is the single source of truth for entity-graph invariants.

pub mod assist;
pub mod cache;
pub mod db;
pub mod logging;
pub mod model;
pub mod store;
pub mod sync;

pub use assist::endpoint::{
    AssistEndpoint, AssistError, AssistProposal, AssistResult, DocumentTextEndpoint,
    ProposedAction,
};
pub use assist::replay::apply_proposal;
pub use cache::{load_snapshot, save_snapshot, CacheError, CacheResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{
    generate_id, Bird, BirdStatus, BreedingRecord, Cage, CustomMutation, CustomSpecies, Egg,
    EggStatus, Inheritance, Item, ItemCategory, ItemId, ItemValidationError, MedicalRecord,
    NoteReminder, Pair, Permit, RecurrencePattern, SaleDetails, Sex, SubTask, Transaction,
    TransactionKind,
};
pub use store::aviary_store::{AviaryStore, FieldUpdate, StoreError, StoreResult};
pub use sync::adapter::{NullSyncAdapter, SyncAdapter, SyncError, SyncOp, SyncResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
