//! Remote persistence boundary.
//!
//! # Responsibility
//! - Define the adapter contract the mutation engine persists through.
//! - Keep transport/store details outside the core.
//!
//! # Invariants
//! - The core only ever addresses rows by `(table, id)`; owner scoping is the
//!   remote store's responsibility.

pub mod adapter;
