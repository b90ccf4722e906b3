//! Assistant boundary: structured proposals in, ordinary mutations out.
//!
//! # Responsibility
//! - Define the inference/extraction endpoint contracts.
//! - Replay human-confirmed proposals through the mutation engine.
//!
//! # Invariants
//! - Endpoints never mutate the collection directly.
//! - Every replayed action goes through the ordinary store operations and
//!   inherits their validation and rollback behavior.

pub mod endpoint;
pub mod replay;
