//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes enforce `NewPlace::validate()` before persistence.
//! - "Not found" is a value (`None`/`false`), not an error.

pub mod place_repo;
