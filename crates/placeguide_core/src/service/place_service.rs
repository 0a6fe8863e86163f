//! Place use-case service.
//!
//! # Responsibility
//! - Provide the catalog operations screens call (list, filter, search,
//!   detail, favorite/rating/note updates).
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::place::{CategoryFilter, NewPlace, Place, PlaceId};
use crate::repo::place_repo::{PlaceListQuery, PlaceRepository, RepoResult};
use crate::search::substring::PlaceSearchQuery;
use log::info;

/// Use-case service wrapper for the place catalog.
pub struct PlaceService<R: PlaceRepository> {
    repo: R,
}

impl<R: PlaceRepository> PlaceService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// All places ordered by title.
    pub fn all_places(&self) -> RepoResult<Vec<Place>> {
        self.repo.list_places(&PlaceListQuery::default())
    }

    /// Places matching a picker value (`All` and `Uncategorized` included).
    pub fn places_by_category(&self, category: &str) -> RepoResult<Vec<Place>> {
        self.repo
            .list_places(&PlaceListQuery::by_category(category))
    }

    pub fn favorites(&self) -> RepoResult<Vec<Place>> {
        self.repo
            .list_places(&PlaceListQuery::favorites(CategoryFilter::All))
    }

    pub fn favorites_by_category(&self, category: &str) -> RepoResult<Vec<Place>> {
        self.repo.list_places(&PlaceListQuery::favorites(category))
    }

    /// Places whose title or location contains `text`, ignoring case.
    pub fn search(&self, text: &str) -> RepoResult<Vec<Place>> {
        self.repo.search_places(&PlaceSearchQuery::new(text))
    }

    pub fn search_favorites(&self, text: &str) -> RepoResult<Vec<Place>> {
        self.repo.search_places(&PlaceSearchQuery::favorites(text))
    }

    pub fn place(&self, id: PlaceId) -> RepoResult<Option<Place>> {
        self.repo.get_place(id)
    }

    /// Persists a new place and returns its id.
    pub fn add_place(&self, place: &NewPlace) -> RepoResult<PlaceId> {
        self.repo.create_place(place)
    }

    /// Imports a batch; a failure on any entry stores nothing.
    pub fn add_places(&self, places: &[NewPlace]) -> RepoResult<Vec<PlaceId>> {
        let ids = self.repo.create_places(places)?;
        info!(
            "event=places_import module=service status=ok count={}",
            ids.len()
        );
        Ok(ids)
    }

    /// Returns whether a place was actually removed.
    pub fn remove_place(&self, id: PlaceId) -> RepoResult<bool> {
        self.repo.delete_place(id)
    }

    /// Category picker values: `All`, stored categories, `Uncategorized`.
    pub fn categories(&self) -> RepoResult<Vec<String>> {
        self.repo.list_categories()
    }

    pub fn category_of(&self, id: PlaceId) -> RepoResult<Option<String>> {
        self.repo.get_category(id)
    }

    pub fn is_favorite(&self, id: PlaceId) -> RepoResult<bool> {
        self.repo.is_favorite(id)
    }

    pub fn set_favorite(&self, id: PlaceId, is_favorite: bool) -> RepoResult<bool> {
        self.repo.set_favorite(id, is_favorite)
    }

    /// Flips the favorite flag and returns the new value.
    ///
    /// Returns `None` when the place does not exist.
    pub fn toggle_favorite(&self, id: PlaceId) -> RepoResult<Option<bool>> {
        let next = !self.repo.is_favorite(id)?;
        if !self.repo.set_favorite(id, next)? {
            return Ok(None);
        }
        info!("event=favorite_toggle module=service status=ok place_id={id} is_favorite={next}");
        Ok(Some(next))
    }

    /// Writes the rating clamped to `[0, 5]`.
    pub fn set_rating(&self, id: PlaceId, rating: f64) -> RepoResult<bool> {
        self.repo.set_rating(id, rating)
    }

    pub fn note(&self, id: PlaceId) -> RepoResult<Option<String>> {
        self.repo.get_note(id)
    }

    /// Replaces the note; an empty string clears it.
    pub fn set_note(&self, id: PlaceId, note: &str) -> RepoResult<bool> {
        self.repo.set_note(id, note)
    }
}
