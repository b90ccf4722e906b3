//! Mutation engine layer.
//!
//! # Responsibility
//! - Own the single in-memory item collection and its only mutation surface.
//! - Record every transition as revertible commands for optimistic rollback.
//!
//! # Invariants
//! - Readers never mutate the collection; they borrow or clone snapshots.
//! - Rollback is a pure function of the recorded change set.

pub mod aviary_store;
mod changeset;
