//! Screen presentation models for place lists and place detail.
//!
//! # Responsibility
//! - Hold per-screen list state (screen, category filter, search text).
//! - Re-fetch the full result set on every refresh; no incremental diffing.
//! - Produce user-facing status messages for favorite/note actions.
//!
//! # Invariants
//! - Non-empty search text takes precedence over the category filter.
//! - Rows un-favorited on the favorites screen stay visible, struck through,
//!   until the next refresh.
//! - Status messages carry place titles only; they are never logged.

use crate::model::place::{clamp_rating, CategoryFilter, Place, PlaceId};
use crate::repo::place_repo::{PlaceRepository, RepoResult};
use crate::service::place_service::PlaceService;

/// Detail/heading text for a missing place.
pub const NOT_FOUND_MESSAGE: &str = "Item not found";
/// Note line shown when a place has no note.
pub const NOTE_PLACEHOLDER: &str = "Click to add a note";

/// Which list screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScreen {
    Main,
    Favorites,
}

impl ListScreen {
    pub fn title(self) -> &'static str {
        match self {
            Self::Main => "Neighborhood Guide",
            Self::Favorites => "Favorites",
        }
    }
}

/// One card in a list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: PlaceId,
    pub title: String,
    pub location: String,
    pub is_favorite: bool,
    pub struck_through: bool,
}

impl From<&Place> for ListRow {
    fn from(place: &Place) -> Self {
        Self {
            id: place.id,
            title: place.title.clone(),
            location: place.location.clone(),
            is_favorite: place.is_favorite,
            struck_through: false,
        }
    }
}

/// List screen state bound to query results.
#[derive(Debug, Clone)]
pub struct PlaceListView {
    screen: ListScreen,
    category: CategoryFilter,
    search_text: String,
    rows: Vec<ListRow>,
}

impl PlaceListView {
    /// Creates an empty view; call [`PlaceListView::refresh`] to populate it.
    pub fn new(screen: ListScreen) -> Self {
        Self {
            screen,
            category: CategoryFilter::All,
            search_text: String::new(),
            rows: Vec::new(),
        }
    }

    pub fn screen(&self) -> ListScreen {
        self.screen
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    /// Switches screens, clearing the category filter and search text.
    pub fn switch_screen(&mut self, screen: ListScreen) {
        self.screen = screen;
        self.category = CategoryFilter::All;
        self.search_text.clear();
    }

    /// Applies a category picker value.
    pub fn set_category(&mut self, label: &str) {
        self.category = CategoryFilter::parse(label);
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Re-runs the screen's query and replaces every row.
    pub fn refresh<R: PlaceRepository>(
        &mut self,
        service: &PlaceService<R>,
    ) -> RepoResult<&[ListRow]> {
        let places = match (self.screen, self.search_text.is_empty()) {
            (ListScreen::Main, false) => service.search(&self.search_text)?,
            (ListScreen::Main, true) => service.places_by_category(self.category.label())?,
            (ListScreen::Favorites, false) => service.search_favorites(&self.search_text)?,
            (ListScreen::Favorites, true) => {
                service.favorites_by_category(self.category.label())?
            }
        };

        self.rows = places.iter().map(ListRow::from).collect();
        Ok(&self.rows)
    }

    /// Toggles one row's favorite flag and returns the status message.
    ///
    /// Returns `None` when the place no longer exists.
    pub fn toggle_favorite<R: PlaceRepository>(
        &mut self,
        service: &PlaceService<R>,
        id: PlaceId,
    ) -> RepoResult<Option<String>> {
        let Some(is_favorite) = service.toggle_favorite(id)? else {
            return Ok(None);
        };

        let struck_through = self.screen == ListScreen::Favorites && !is_favorite;
        let title = match self.rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.is_favorite = is_favorite;
                row.struck_through = struck_through;
                row.title.clone()
            }
            None => service
                .place(id)?
                .map(|place| place.title)
                .unwrap_or_default(),
        };

        Ok(Some(favorite_message(&title, is_favorite)))
    }
}

/// Detail screen state for one place.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    place: Option<Place>,
}

impl DetailView {
    /// Loads the place; a missing id yields a not-found view, not an error.
    pub fn load<R: PlaceRepository>(service: &PlaceService<R>, id: PlaceId) -> RepoResult<Self> {
        Ok(Self {
            place: service.place(id)?,
        })
    }

    pub fn place(&self) -> Option<&Place> {
        self.place.as_ref()
    }

    /// Place title, or the not-found message.
    pub fn heading(&self) -> &str {
        self.place
            .as_ref()
            .map_or(NOT_FOUND_MESSAGE, |place| place.title.as_str())
    }

    /// Note line for display.
    pub fn note_line(&self) -> Option<String> {
        let place = self.place.as_ref()?;
        Some(match place.note_text() {
            Some(note) => format!("Your note: {note}"),
            None => NOTE_PLACEHOLDER.to_string(),
        })
    }

    pub fn toggle_favorite<R: PlaceRepository>(
        &mut self,
        service: &PlaceService<R>,
    ) -> RepoResult<Option<String>> {
        let Some(place) = self.place.as_mut() else {
            return Ok(None);
        };
        let Some(is_favorite) = service.toggle_favorite(place.id)? else {
            return Ok(None);
        };
        place.is_favorite = is_favorite;
        Ok(Some(favorite_message(&place.title, is_favorite)))
    }

    /// Writes the rating, mirrors the clamped value locally and returns the
    /// confirmation message.
    pub fn rate<R: PlaceRepository>(
        &mut self,
        service: &PlaceService<R>,
        rating: f64,
    ) -> RepoResult<Option<String>> {
        let Some(place) = self.place.as_mut() else {
            return Ok(None);
        };
        if !service.set_rating(place.id, rating)? {
            return Ok(None);
        }
        place.rating = clamp_rating(rating);
        Ok(Some(format!(
            "Your rating of {} stars was saved for {}",
            format_stars(place.rating),
            place.title
        )))
    }

    /// Saves the note and returns the confirmation message.
    pub fn save_note<R: PlaceRepository>(
        &mut self,
        service: &PlaceService<R>,
        note: &str,
    ) -> RepoResult<Option<String>> {
        let Some(place) = self.place.as_mut() else {
            return Ok(None);
        };
        if !service.set_note(place.id, note)? {
            return Ok(None);
        }
        place.note = Some(note.to_string());
        Ok(Some(format!("Your note was saved to {}", place.title)))
    }
}

/// Status line shown after a favorite toggle.
pub fn favorite_message(title: &str, is_favorite: bool) -> String {
    if is_favorite {
        format!("{title} favorited")
    } else {
        format!("{title} unfavorited")
    }
}

/// Whole ratings keep one decimal (`4.0`); halves print as-is (`3.5`).
fn format_stars(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{rating:.1}")
    } else {
        format!("{rating}")
    }
}

#[cfg(test)]
mod tests {
    use super::{favorite_message, format_stars, ListScreen};

    #[test]
    fn stars_keep_one_decimal_for_whole_ratings() {
        assert_eq!(format_stars(4.0), "4.0");
        assert_eq!(format_stars(3.5), "3.5");
        assert_eq!(format_stars(0.0), "0.0");
    }

    #[test]
    fn favorite_message_reflects_new_state() {
        assert_eq!(favorite_message("Katz's", true), "Katz's favorited");
        assert_eq!(favorite_message("Katz's", false), "Katz's unfavorited");
    }

    #[test]
    fn screen_titles_are_stable() {
        assert_eq!(ListScreen::Main.title(), "Neighborhood Guide");
        assert_eq!(ListScreen::Favorites.title(), "Favorites");
    }
}
