//! Unified domain model for all aviary entities.
//!
//! # Responsibility
//! - Define the canonical tagged-union record and its category tag.
//! - Keep one flat item-centric shape for every consumer surface.
//!
//! # Invariants
//! - Every entity is identified by an opaque string `ItemId`.
//! - Cross-entity references are weak ids, never live object references.

pub mod item;
