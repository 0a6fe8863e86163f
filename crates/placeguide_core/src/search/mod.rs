//! Place search entry points.
//!
//! # Responsibility
//! - Expose free-text lookup over place title and location.
//! - Keep result shaping inside core.

pub mod substring;
