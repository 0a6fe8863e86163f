use placeguide_core::db::open_db_in_memory;
use placeguide_core::{
    CategoryFilter, DetailView, ListScreen, NewPlace, PlaceId, PlaceListView, PlaceRepository,
    PlaceService, SqlitePlaceRepository, NOTE_PLACEHOLDER, NOT_FOUND_MESSAGE,
};
use rusqlite::Connection;

fn seeded() -> (Connection, Vec<PlaceId>) {
    let conn = open_db_in_memory().unwrap();
    let ids = {
        let repo = SqlitePlaceRepository::try_new(&conn).unwrap();
        let mut katz = NewPlace::new("Katz's Delicatessen", "205 E Houston St").with_category("Food");
        katz.is_favorite = true;
        let veselka = NewPlace::new("Veselka", "144 2nd Ave").with_category("Food");
        let mut strand = NewPlace::new("Strand Book Store", "828 Broadway").with_category("Shopping");
        strand.is_favorite = true;
        vec![
            repo.create_place(&katz).unwrap(),
            repo.create_place(&veselka).unwrap(),
            repo.create_place(&strand).unwrap(),
        ]
    };
    (conn, ids)
}

fn row_titles(view: &PlaceListView) -> Vec<&str> {
    view.rows().iter().map(|row| row.title.as_str()).collect()
}

#[test]
fn main_screen_refresh_uses_category_then_search() {
    let (conn, _) = seeded();
    let service = PlaceService::new(SqlitePlaceRepository::try_new(&conn).unwrap());
    let mut view = PlaceListView::new(ListScreen::Main);

    view.refresh(&service).unwrap();
    assert_eq!(
        row_titles(&view),
        vec!["Katz's Delicatessen", "Strand Book Store", "Veselka"]
    );

    view.set_category("Food");
    assert_eq!(view.category(), &CategoryFilter::Named("Food".to_string()));
    view.refresh(&service).unwrap();
    assert_eq!(row_titles(&view), vec!["Katz's Delicatessen", "Veselka"]);

    view.set_search_text("broadway");
    view.refresh(&service).unwrap();
    assert_eq!(row_titles(&view), vec!["Strand Book Store"]);
}

#[test]
fn favorites_screen_strikes_through_until_refresh() {
    let (conn, ids) = seeded();
    let service = PlaceService::new(SqlitePlaceRepository::try_new(&conn).unwrap());
    let mut view = PlaceListView::new(ListScreen::Favorites);
    view.refresh(&service).unwrap();
    assert_eq!(
        row_titles(&view),
        vec!["Katz's Delicatessen", "Strand Book Store"]
    );

    let message = view.toggle_favorite(&service, ids[0]).unwrap();
    assert_eq!(message.as_deref(), Some("Katz's Delicatessen unfavorited"));
    let row = &view.rows()[0];
    assert!(!row.is_favorite);
    assert!(row.struck_through);

    view.refresh(&service).unwrap();
    assert_eq!(row_titles(&view), vec!["Strand Book Store"]);
    assert!(view.rows().iter().all(|row| !row.struck_through));
}

#[test]
fn main_screen_toggle_never_strikes_through() {
    let (conn, ids) = seeded();
    let service = PlaceService::new(SqlitePlaceRepository::try_new(&conn).unwrap());
    let mut view = PlaceListView::new(ListScreen::Main);
    view.refresh(&service).unwrap();

    let message = view.toggle_favorite(&service, ids[1]).unwrap();
    assert_eq!(message.as_deref(), Some("Veselka favorited"));
    let row = view.rows().iter().find(|row| row.id == ids[1]).unwrap();
    assert!(row.is_favorite);
    assert!(!row.struck_through);

    assert_eq!(view.toggle_favorite(&service, 9_999).unwrap(), None);
}

#[test]
fn switching_screens_clears_filters() {
    let mut view = PlaceListView::new(ListScreen::Main);
    view.set_category("Food");
    view.set_search_text("katz");

    view.switch_screen(ListScreen::Favorites);
    assert_eq!(view.screen(), ListScreen::Favorites);
    assert_eq!(view.category(), &CategoryFilter::All);
    assert_eq!(view.search_text(), "");
}

#[test]
fn detail_view_shows_note_placeholder_and_saves_note() {
    let (conn, ids) = seeded();
    let service = PlaceService::new(SqlitePlaceRepository::try_new(&conn).unwrap());

    let mut detail = DetailView::load(&service, ids[1]).unwrap();
    assert_eq!(detail.heading(), "Veselka");
    assert_eq!(detail.note_line().as_deref(), Some(NOTE_PLACEHOLDER));

    let saved = detail.save_note(&service, "get the borscht").unwrap();
    assert_eq!(saved.as_deref(), Some("Your note was saved to Veselka"));
    assert_eq!(
        detail.note_line().as_deref(),
        Some("Your note: get the borscht")
    );
    assert_eq!(
        service.note(ids[1]).unwrap().as_deref(),
        Some("get the borscht")
    );
}

#[test]
fn detail_view_rating_and_favorite_stay_in_sync_with_store() {
    let (conn, ids) = seeded();
    let service = PlaceService::new(SqlitePlaceRepository::try_new(&conn).unwrap());

    let mut detail = DetailView::load(&service, ids[2]).unwrap();
    let message = detail.rate(&service, 7.0).unwrap();
    assert_eq!(
        message.as_deref(),
        Some("Your rating of 5.0 stars was saved for Strand Book Store")
    );
    assert_eq!(detail.place().unwrap().rating, 5.0);
    assert_eq!(service.place(ids[2]).unwrap().unwrap().rating, 5.0);

    let message = detail.toggle_favorite(&service).unwrap();
    assert_eq!(message.as_deref(), Some("Strand Book Store unfavorited"));
    assert!(!detail.place().unwrap().is_favorite);
    assert!(!service.is_favorite(ids[2]).unwrap());
}

#[test]
fn detail_view_for_missing_place_reports_not_found() {
    let (conn, _) = seeded();
    let service = PlaceService::new(SqlitePlaceRepository::try_new(&conn).unwrap());

    let mut detail = DetailView::load(&service, 12_345).unwrap();
    assert!(detail.place().is_none());
    assert_eq!(detail.heading(), NOT_FOUND_MESSAGE);
    assert_eq!(detail.note_line(), None);
    assert_eq!(detail.rate(&service, 3.0).unwrap(), None);
    assert_eq!(detail.save_note(&service, "nope").unwrap(), None);
    assert_eq!(detail.toggle_favorite(&service).unwrap(), None);
}
