//! Flutter-facing bindings for the place catalog.

pub mod api;
