//! Place domain model.
//!
//! # Responsibility
//! - Define the canonical point-of-interest record and its insert shape.
//! - Own category sentinel parsing and rating clamping rules.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused for another place.
//! - `rating` is always within `[MIN_RATING, MAX_RATING]` after any write.
//! - `All` and `Uncategorized` are filter sentinels, never stored categories.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned place identifier.
pub type PlaceId = i64;

/// Lowest rating a place can hold.
pub const MIN_RATING: f64 = 0.0;
/// Highest rating a place can hold.
pub const MAX_RATING: f64 = 5.0;

/// Sentinel category meaning "no filtering".
pub const CATEGORY_ALL: &str = "All";
/// Sentinel category meaning "category is absent".
pub const CATEGORY_UNCATEGORIZED: &str = "Uncategorized";

/// Validation errors for place insert input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceValidationError {
    /// Category collides with a reserved filter sentinel.
    ReservedCategory(String),
    /// Title is blank.
    EmptyTitle,
}

impl Display for PlaceValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReservedCategory(value) => {
                write!(f, "category `{value}` is reserved for filtering")
            }
            Self::EmptyTitle => write!(f, "place title cannot be empty"),
        }
    }
}

impl Error for PlaceValidationError {}

/// One persisted point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub title: String,
    pub location: String,
    pub neighborhood: String,
    /// `None` means uncategorized.
    pub category: Option<String>,
    pub description: String,
    pub is_favorite: bool,
    pub rating: f64,
    /// Empty and `None` both mean "no note"; see [`Place::note_text`].
    pub note: Option<String>,
}

impl Place {
    /// Returns the note when one is actually set.
    pub fn note_text(&self) -> Option<&str> {
        self.note.as_deref().filter(|note| !note.is_empty())
    }

    /// Returns the category label used by filter pickers.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(CATEGORY_UNCATEGORIZED)
    }
}

/// Insert shape for a place that has no storage id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlace {
    pub title: String,
    pub location: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewPlace {
    /// Creates an uncategorized, unrated, non-favorite place.
    pub fn new(title: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
            neighborhood: String::new(),
            category: None,
            description: String::new(),
            is_favorite: false,
            rating: MIN_RATING,
            note: None,
        }
    }

    /// Builder-style category setter.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Builder-style neighborhood setter.
    pub fn with_neighborhood(mut self, neighborhood: impl Into<String>) -> Self {
        self.neighborhood = neighborhood.into();
        self
    }

    /// Builder-style description setter.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validates sentinel and title rules.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `ReservedCategory` when the category matches a sentinel, ignoring case.
    pub fn validate(&self) -> Result<(), PlaceValidationError> {
        if self.title.trim().is_empty() {
            return Err(PlaceValidationError::EmptyTitle);
        }

        if let Some(category) = self.category.as_deref() {
            if is_reserved_category(category) {
                return Err(PlaceValidationError::ReservedCategory(category.to_string()));
            }
        }

        Ok(())
    }

    /// Returns the category as it should be stored.
    ///
    /// Blank categories collapse to `None`.
    pub fn normalized_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Category filter derived from a picker value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No filtering.
    #[default]
    All,
    /// Only places with no category.
    Uncategorized,
    /// Exact category match.
    Named(String),
}

impl CategoryFilter {
    /// Parses a picker value, mapping sentinels to their filter variants.
    pub fn parse(value: &str) -> Self {
        match value {
            CATEGORY_ALL => Self::All,
            CATEGORY_UNCATEGORIZED => Self::Uncategorized,
            other => Self::Named(other.to_string()),
        }
    }

    /// Returns the picker label for this filter.
    pub fn label(&self) -> &str {
        match self {
            Self::All => CATEGORY_ALL,
            Self::Uncategorized => CATEGORY_UNCATEGORIZED,
            Self::Named(name) => name.as_str(),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// Clamps a rating into `[MIN_RATING, MAX_RATING]`.
///
/// NaN has no nearest bound and is stored as `MIN_RATING`.
pub fn clamp_rating(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_RATING;
    }
    value.clamp(MIN_RATING, MAX_RATING)
}

/// Returns whether `value` collides with a filter sentinel, ignoring case.
pub fn is_reserved_category(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.eq_ignore_ascii_case(CATEGORY_ALL)
        || trimmed.eq_ignore_ascii_case(CATEGORY_UNCATEGORIZED)
}
