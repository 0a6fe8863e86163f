//! Place repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide every query and mutation over the single `places` table.
//! - Keep SQL details inside core persistence boundary.
//!
//! # Invariants
//! - Write paths call `NewPlace::validate()` before SQL mutations.
//! - Ratings are clamped before every write.
//! - A missing id is reported as `None`/`false`, never as an error.
//! - Read paths reject invalid persisted state instead of masking it.
//! - List ordering is `title COLLATE NOCASE ASC, _id ASC`.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::place::{
    clamp_rating, CategoryFilter, NewPlace, Place, PlaceId, PlaceValidationError, CATEGORY_ALL,
    CATEGORY_UNCATEGORIZED, MAX_RATING, MIN_RATING,
};
use crate::search::substring::{search_places, PlaceSearchQuery};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) const PLACE_SELECT_SQL: &str = "SELECT
    _id,
    title,
    location,
    neighborhood,
    category,
    description,
    is_favorite,
    rating,
    note
FROM places";

pub(crate) const PLACE_ORDER_SQL: &str = " ORDER BY title COLLATE NOCASE ASC, _id ASC";

const REQUIRED_COLUMNS: &[&str] = &[
    "_id",
    "title",
    "location",
    "neighborhood",
    "category",
    "description",
    "is_favorite",
    "rating",
    "note",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for place persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PlaceValidationError),
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "place repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "place repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "place repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted place data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PlaceValidationError> for RepoError {
    fn from(value: PlaceValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing places.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceListQuery {
    pub category: CategoryFilter,
    pub favorites_only: bool,
}

impl PlaceListQuery {
    /// Every place, optionally narrowed by a picker value.
    pub fn by_category(category: impl Into<CategoryFilter>) -> Self {
        Self {
            category: category.into(),
            favorites_only: false,
        }
    }

    /// Favorites only, optionally narrowed by a picker value.
    pub fn favorites(category: impl Into<CategoryFilter>) -> Self {
        Self {
            category: category.into(),
            favorites_only: true,
        }
    }
}

/// Repository interface for the place catalog.
pub trait PlaceRepository {
    /// Persists a new place and returns its storage-assigned id.
    fn create_place(&self, place: &NewPlace) -> RepoResult<PlaceId>;
    /// Persists a batch atomically: either every place is stored or none.
    fn create_places(&self, places: &[NewPlace]) -> RepoResult<Vec<PlaceId>>;
    /// Gets one place by id.
    fn get_place(&self, id: PlaceId) -> RepoResult<Option<Place>>;
    /// Lists places by category/favorite filter, ordered by title.
    fn list_places(&self, query: &PlaceListQuery) -> RepoResult<Vec<Place>>;
    /// Case-insensitive substring search over title and location.
    fn search_places(&self, query: &PlaceSearchQuery) -> RepoResult<Vec<Place>>;
    /// Hard-deletes one place. Returns whether a row was removed.
    fn delete_place(&self, id: PlaceId) -> RepoResult<bool>;
    /// Distinct stored categories wrapped in the `All`/`Uncategorized` sentinels.
    fn list_categories(&self) -> RepoResult<Vec<String>>;
    /// Returns whether a row was updated.
    fn set_favorite(&self, id: PlaceId, is_favorite: bool) -> RepoResult<bool>;
    /// Clamps then writes the rating. Returns whether a row was updated.
    fn set_rating(&self, id: PlaceId, rating: f64) -> RepoResult<bool>;
    /// Returns whether a row was updated.
    fn set_note(&self, id: PlaceId, note: &str) -> RepoResult<bool>;
    /// `false` when the id does not exist.
    fn is_favorite(&self, id: PlaceId) -> RepoResult<bool>;
    /// `None` when the id does not exist or the place is uncategorized.
    fn get_category(&self, id: PlaceId) -> RepoResult<Option<String>>;
    /// `None` when the id does not exist or no note is set.
    fn get_note(&self, id: PlaceId) -> RepoResult<Option<String>>;
}

/// SQLite-backed place repository.
pub struct SqlitePlaceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePlaceRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema is
    ///   not the one this binary writes.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PlaceRepository for SqlitePlaceRepository<'_> {
    fn create_place(&self, place: &NewPlace) -> RepoResult<PlaceId> {
        place.validate()?;
        let id = insert_place(self.conn, place)?;
        debug!("event=place_create module=repo status=ok place_id={id}");
        Ok(id)
    }

    fn create_places(&self, places: &[NewPlace]) -> RepoResult<Vec<PlaceId>> {
        for place in places {
            place.validate()?;
        }

        // Rolls back on drop if any insert fails.
        let tx = self.conn.unchecked_transaction()?;
        let mut ids = Vec::with_capacity(places.len());
        for place in places {
            ids.push(insert_place(&tx, place)?);
        }
        tx.commit()?;

        debug!(
            "event=place_create_batch module=repo status=ok count={}",
            ids.len()
        );
        Ok(ids)
    }

    fn get_place(&self, id: PlaceId) -> RepoResult<Option<Place>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PLACE_SELECT_SQL} WHERE _id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_place_row(row)?));
        }

        Ok(None)
    }

    fn list_places(&self, query: &PlaceListQuery) -> RepoResult<Vec<Place>> {
        let mut sql = format!("{PLACE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if query.favorites_only {
            sql.push_str(" AND is_favorite = 1");
        }

        match &query.category {
            CategoryFilter::All => {}
            CategoryFilter::Uncategorized => sql.push_str(" AND category IS NULL"),
            CategoryFilter::Named(name) => {
                sql.push_str(" AND category = ?");
                bind_values.push(Value::Text(name.clone()));
            }
        }

        sql.push_str(PLACE_ORDER_SQL);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut places = Vec::new();
        while let Some(row) = rows.next()? {
            places.push(parse_place_row(row)?);
        }

        Ok(places)
    }

    fn search_places(&self, query: &PlaceSearchQuery) -> RepoResult<Vec<Place>> {
        search_places(self.conn, query)
    }

    fn delete_place(&self, id: PlaceId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM places WHERE _id = ?1;", [id])?;
        debug!(
            "event=place_delete module=repo status=ok place_id={id} matched={}",
            changed > 0
        );
        Ok(changed > 0)
    }

    fn list_categories(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT category
             FROM places
             WHERE category IS NOT NULL;",
        )?;
        let mut rows = stmt.query([])?;
        let mut unique = BTreeSet::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            if !value.trim().is_empty() {
                unique.insert(value);
            }
        }

        let mut categories = Vec::with_capacity(unique.len() + 2);
        categories.push(CATEGORY_ALL.to_string());
        categories.extend(unique);
        categories.push(CATEGORY_UNCATEGORIZED.to_string());
        Ok(categories)
    }

    fn set_favorite(&self, id: PlaceId, is_favorite: bool) -> RepoResult<bool> {
        update_column(
            self.conn,
            id,
            "is_favorite",
            Value::Integer(bool_to_int(is_favorite)),
        )
    }

    fn set_rating(&self, id: PlaceId, rating: f64) -> RepoResult<bool> {
        update_column(self.conn, id, "rating", Value::Real(clamp_rating(rating)))
    }

    fn set_note(&self, id: PlaceId, note: &str) -> RepoResult<bool> {
        update_column(self.conn, id, "note", Value::Text(note.to_string()))
    }

    fn is_favorite(&self, id: PlaceId) -> RepoResult<bool> {
        let flag = self
            .conn
            .query_row(
                "SELECT is_favorite FROM places WHERE _id = ?1;",
                [id],
                |row| row.get::<_, Option<i64>>(0),
            )
            .optional()?;

        match flag {
            Some(value) => parse_favorite_flag(value),
            None => Ok(false),
        }
    }

    fn get_category(&self, id: PlaceId) -> RepoResult<Option<String>> {
        let category = self
            .conn
            .query_row("SELECT category FROM places WHERE _id = ?1;", [id], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()?;
        Ok(category.flatten())
    }

    fn get_note(&self, id: PlaceId) -> RepoResult<Option<String>> {
        let note = self
            .conn
            .query_row("SELECT note FROM places WHERE _id = ?1;", [id], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()?;
        Ok(note.flatten().filter(|value| !value.is_empty()))
    }
}

/// Decodes one `places` row selected with `PLACE_SELECT_SQL` columns.
///
/// NULL text columns decode as empty strings, NULL flags as `false` and NULL
/// ratings as `MIN_RATING`, since the on-device schema declared no NOT NULL
/// constraints.
pub(crate) fn parse_place_row(row: &Row<'_>) -> RepoResult<Place> {
    let id: PlaceId = row.get("_id")?;

    let is_favorite = parse_favorite_flag(row.get("is_favorite")?)?;

    let rating = row.get::<_, Option<f64>>("rating")?.unwrap_or(MIN_RATING);
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(RepoError::InvalidData(format!(
            "rating `{rating}` out of range in places.rating for _id {id}"
        )));
    }

    Ok(Place {
        id,
        title: text_or_empty(row, "title")?,
        location: text_or_empty(row, "location")?,
        neighborhood: text_or_empty(row, "neighborhood")?,
        category: row.get("category")?,
        description: text_or_empty(row, "description")?,
        is_favorite,
        rating,
        note: row.get("note")?,
    })
}

fn parse_favorite_flag(value: Option<i64>) -> RepoResult<bool> {
    match value {
        None | Some(0) => Ok(false),
        Some(1) => Ok(true),
        Some(other) => Err(RepoError::InvalidData(format!(
            "invalid is_favorite value `{other}` in places.is_favorite"
        ))),
    }
}

fn text_or_empty(row: &Row<'_>, column: &str) -> RepoResult<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

fn insert_place(conn: &Connection, place: &NewPlace) -> RepoResult<PlaceId> {
    conn.execute(
        "INSERT INTO places (
            title,
            location,
            neighborhood,
            category,
            description,
            is_favorite,
            rating,
            note
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
        params![
            place.title.as_str(),
            place.location.as_str(),
            place.neighborhood.as_str(),
            place.normalized_category(),
            place.description.as_str(),
            bool_to_int(place.is_favorite),
            clamp_rating(place.rating),
            place.note.as_deref(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn update_column(
    conn: &Connection,
    id: PlaceId,
    column: &'static str,
    value: Value,
) -> RepoResult<bool> {
    let changed = conn.execute(
        &format!("UPDATE places SET {column} = ?1 WHERE _id = ?2;"),
        params![value, id],
    )?;
    debug!(
        "event=place_update module=repo status=ok place_id={id} column={column} matched={}",
        changed > 0
    );
    Ok(changed > 0)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "places")? {
        return Err(RepoError::MissingRequiredTable("places"));
    }

    for &column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "places", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "places",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
