//! Core domain logic for PlaceGuide.
//! This crate is the single source of truth for place catalog invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{AppConfig, ConfigError, ConfigOverrides};
pub use db::{DbError, PlaceStore};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::place::{
    clamp_rating, CategoryFilter, NewPlace, Place, PlaceId, PlaceValidationError, CATEGORY_ALL,
    CATEGORY_UNCATEGORIZED, MAX_RATING, MIN_RATING,
};
pub use repo::place_repo::{
    PlaceListQuery, PlaceRepository, RepoError, RepoResult, SqlitePlaceRepository,
};
pub use search::substring::PlaceSearchQuery;
pub use service::list_view::{
    favorite_message, DetailView, ListRow, ListScreen, PlaceListView, NOTE_PLACEHOLDER,
    NOT_FOUND_MESSAGE,
};
pub use service::place_service::PlaceService;

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
