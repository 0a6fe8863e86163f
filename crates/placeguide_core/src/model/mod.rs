//! Domain model for the place catalog.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every persisted place is identified by a storage-assigned `PlaceId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod place;
