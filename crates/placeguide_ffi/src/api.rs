//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose list/detail/mutation screens of the place catalog to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` + `message`.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens its own `PlaceStore` and closes it before returning.
//! - A blank `db_path` falls back to `PLACEGUIDE_DB_PATH`, then the default.

use log::warn;
use placeguide_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppConfig, ConfigOverrides, DetailView, ListScreen, NewPlace, PlaceId, PlaceListView,
    PlaceService, PlaceStore, RepoResult, SqlitePlaceRepository,
};
use std::path::PathBuf;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One card in a list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceListItem {
    pub place_id: i64,
    pub title: String,
    pub location: String,
    pub is_favorite: bool,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceListResponse {
    pub ok: bool,
    /// Screen title for the app bar.
    pub screen_title: String,
    pub items: Vec<PlaceListItem>,
    pub message: String,
}

/// Category picker response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoriesResponse {
    pub ok: bool,
    /// `All`, stored categories, `Uncategorized`.
    pub items: Vec<String>,
    pub message: String,
}

/// Detail screen response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetailResponse {
    pub ok: bool,
    /// `false` when the id does not exist; `heading` then carries the
    /// not-found message.
    pub found: bool,
    pub heading: String,
    pub location: String,
    pub neighborhood: String,
    pub category: String,
    pub description: String,
    pub is_favorite: bool,
    pub rating: f64,
    pub note_line: String,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceActionResponse {
    pub ok: bool,
    /// Id of the created place, for create calls.
    pub place_id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl PlaceActionResponse {
    fn success(message: impl Into<String>, place_id: Option<PlaceId>) -> Self {
        Self {
            ok: true,
            place_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            place_id: None,
            message: message.into(),
        }
    }
}

/// Lists places for one screen.
///
/// Input semantics:
/// - `screen`: `main` or `favorites`.
/// - `category`: picker value; blank means `All`.
/// - `search`: free text; non-empty text overrides the category filter.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn places_list(
    db_path: String,
    screen: String,
    category: String,
    search: String,
) -> PlaceListResponse {
    let screen = match parse_screen(&screen) {
        Ok(screen) => screen,
        Err(message) => {
            return PlaceListResponse {
                ok: false,
                screen_title: String::new(),
                items: Vec::new(),
                message,
            }
        }
    };

    let mut view = PlaceListView::new(screen);
    if !category.trim().is_empty() {
        view.set_category(category.trim());
    }
    view.set_search_text(search.trim());

    match with_service(&db_path, |service| {
        view.refresh(service)?;
        Ok(())
    }) {
        Ok(()) => {
            let items = view
                .rows()
                .iter()
                .map(|row| PlaceListItem {
                    place_id: row.id,
                    title: row.title.clone(),
                    location: row.location.clone(),
                    is_favorite: row.is_favorite,
                })
                .collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No places.".to_string()
            } else {
                format!("Found {} place(s).", items.len())
            };
            PlaceListResponse {
                ok: true,
                screen_title: screen.title().to_string(),
                items,
                message,
            }
        }
        Err(err) => PlaceListResponse {
            ok: false,
            screen_title: screen.title().to_string(),
            items: Vec::new(),
            message: format!("places_list failed: {err}"),
        },
    }
}

/// Returns category picker values.
#[flutter_rust_bridge::frb(sync)]
pub fn places_categories(db_path: String) -> CategoriesResponse {
    match with_service(&db_path, |service| service.categories()) {
        Ok(items) => CategoriesResponse {
            ok: true,
            items,
            message: String::new(),
        },
        Err(err) => CategoriesResponse {
            ok: false,
            items: Vec::new(),
            message: format!("places_categories failed: {err}"),
        },
    }
}

/// Loads the detail screen for one place.
///
/// # FFI contract
/// - A missing id is `ok=true, found=false`, not a failure.
#[flutter_rust_bridge::frb(sync)]
pub fn place_detail(db_path: String, place_id: i64) -> PlaceDetailResponse {
    match with_service(&db_path, |service| DetailView::load(service, place_id)) {
        Ok(detail) => to_detail_response(&detail),
        Err(err) => PlaceDetailResponse {
            ok: false,
            found: false,
            heading: String::new(),
            location: String::new(),
            neighborhood: String::new(),
            category: String::new(),
            description: String::new(),
            is_favorite: false,
            rating: 0.0,
            note_line: String::new(),
            message: format!("place_detail failed: {err}"),
        },
    }
}

/// Flips the favorite flag of one place.
#[flutter_rust_bridge::frb(sync)]
pub fn place_toggle_favorite(db_path: String, place_id: i64) -> PlaceActionResponse {
    detail_action(&db_path, place_id, "place_toggle_favorite", |detail, service| {
        detail.toggle_favorite(service)
    })
}

/// Writes a rating; values outside `[0, 5]` are clamped.
#[flutter_rust_bridge::frb(sync)]
pub fn place_set_rating(db_path: String, place_id: i64, rating: f64) -> PlaceActionResponse {
    detail_action(&db_path, place_id, "place_set_rating", |detail, service| {
        detail.rate(service, rating)
    })
}

/// Replaces the note of one place; an empty note clears it.
#[flutter_rust_bridge::frb(sync)]
pub fn place_set_note(db_path: String, place_id: i64, note: String) -> PlaceActionResponse {
    detail_action(&db_path, place_id, "place_set_note", |detail, service| {
        detail.save_note(service, note.as_str())
    })
}

/// Creates a place and returns its id.
#[flutter_rust_bridge::frb(sync)]
pub fn place_create(
    db_path: String,
    title: String,
    location: String,
    neighborhood: String,
    category: Option<String>,
    description: String,
) -> PlaceActionResponse {
    let mut place = NewPlace::new(title.trim(), location.trim())
        .with_neighborhood(neighborhood.trim())
        .with_description(description.trim());
    place.category = category;

    match with_service(&db_path, |service| service.add_place(&place)) {
        Ok(place_id) => PlaceActionResponse::success("Place created.", Some(place_id)),
        Err(err) => PlaceActionResponse::failure(format!("place_create failed: {err}")),
    }
}

/// Deletes one place. Deleting a missing id still succeeds.
#[flutter_rust_bridge::frb(sync)]
pub fn place_delete(db_path: String, place_id: i64) -> PlaceActionResponse {
    match with_service(&db_path, |service| service.remove_place(place_id)) {
        Ok(true) => PlaceActionResponse::success("Place deleted.", None),
        Ok(false) => PlaceActionResponse::success("Item not found.", None),
        Err(err) => PlaceActionResponse::failure(format!("place_delete failed: {err}")),
    }
}

fn parse_screen(value: &str) -> Result<ListScreen, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "main" => Ok(ListScreen::Main),
        "favorites" | "favourites" => Ok(ListScreen::Favorites),
        other => Err(format!("unknown screen `{other}`; expected main|favorites")),
    }
}

fn resolve_db_path(db_path: &str) -> Result<PathBuf, String> {
    let overrides = ConfigOverrides {
        db_path: Some(PathBuf::from(db_path.trim())),
        ..ConfigOverrides::default()
    };
    AppConfig::resolve(overrides)
        .map(|config| config.db_path)
        .map_err(|err| format!("config resolve failed: {err}"))
}

fn with_service<T>(
    db_path: &str,
    f: impl FnOnce(&PlaceService<SqlitePlaceRepository<'_>>) -> RepoResult<T>,
) -> Result<T, String> {
    let path = resolve_db_path(db_path)?;
    let store = PlaceStore::open(&path).map_err(|err| format!("store open failed: {err}"))?;
    let result = {
        let repo = SqlitePlaceRepository::try_new(store.connection())
            .map_err(|err| format!("repo init failed: {err}"))?;
        let service = PlaceService::new(repo);
        f(&service).map_err(|err| err.to_string())
    };
    if let Err(err) = store.close() {
        warn!("event=store_close module=ffi status=error error={err}");
    }
    result
}

fn detail_action(
    db_path: &str,
    place_id: PlaceId,
    operation: &'static str,
    action: impl FnOnce(
        &mut DetailView,
        &PlaceService<SqlitePlaceRepository<'_>>,
    ) -> RepoResult<Option<String>>,
) -> PlaceActionResponse {
    let outcome = with_service(db_path, |service| {
        let mut detail = DetailView::load(service, place_id)?;
        action(&mut detail, service)
    });
    match outcome {
        Ok(Some(message)) => PlaceActionResponse::success(message, None),
        Ok(None) => PlaceActionResponse::failure("Item not found."),
        Err(err) => PlaceActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn to_detail_response(detail: &DetailView) -> PlaceDetailResponse {
    let heading = detail.heading().to_string();
    let note_line = detail.note_line().unwrap_or_default();
    match detail.place() {
        Some(place) => PlaceDetailResponse {
            ok: true,
            found: true,
            heading,
            location: place.location.clone(),
            neighborhood: place.neighborhood.clone(),
            category: place.category_label().to_string(),
            description: place.description.clone(),
            is_favorite: place.is_favorite,
            rating: place.rating,
            note_line,
            message: String::new(),
        },
        None => PlaceDetailResponse {
            ok: true,
            found: false,
            message: heading.clone(),
            heading,
            location: String::new(),
            neighborhood: String::new(),
            category: String::new(),
            description: String::new(),
            is_favorite: false,
            rating: 0.0,
            note_line,
        },
    }
}
