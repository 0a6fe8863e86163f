//! Case-insensitive substring search over place title and location.
//!
//! # Responsibility
//! - Match user text literally (no wildcard or regex syntax leaks through).
//! - Return full place rows in list order.
//!
//! # Invariants
//! - Empty query text matches every place.
//! - Matching uses Unicode case folding, not SQLite's ASCII-only `LIKE`.
//! - Result ordering is `title COLLATE NOCASE ASC, _id ASC`.

use crate::model::place::Place;
use crate::repo::place_repo::{
    parse_place_row, RepoError, RepoResult, PLACE_ORDER_SQL, PLACE_SELECT_SQL,
};
use regex::{Regex, RegexBuilder};
use rusqlite::Connection;

/// Search options for place lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceSearchQuery {
    /// Literal text to look for in title or location.
    pub text: String,
    /// Restrict hits to favorites.
    pub favorites_only: bool,
}

impl PlaceSearchQuery {
    /// Searches every place.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            favorites_only: false,
        }
    }

    /// Searches favorites only.
    pub fn favorites(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            favorites_only: true,
        }
    }
}

/// Returns places whose title or location contains the query text.
pub fn search_places(conn: &Connection, query: &PlaceSearchQuery) -> RepoResult<Vec<Place>> {
    let matcher = build_matcher(&query.text)?;

    let mut sql = String::from(PLACE_SELECT_SQL);
    if query.favorites_only {
        sql.push_str(" WHERE is_favorite = 1");
    }
    sql.push_str(PLACE_ORDER_SQL);

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut hits = Vec::new();
    while let Some(row) = rows.next()? {
        let place = parse_place_row(row)?;
        let is_hit = match &matcher {
            Some(re) => re.is_match(&place.title) || re.is_match(&place.location),
            None => true,
        };
        if is_hit {
            hits.push(place);
        }
    }

    Ok(hits)
}

fn build_matcher(text: &str) -> RepoResult<Option<Regex>> {
    if text.is_empty() {
        return Ok(None);
    }

    RegexBuilder::new(&regex::escape(text))
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|err| RepoError::InvalidData(format!("search text rejected: {err}")))
}
