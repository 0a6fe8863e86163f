use placeguide_core::db::open_db_in_memory;
use placeguide_core::{
    CategoryFilter, NewPlace, Place, PlaceId, PlaceListQuery, PlaceRepository, PlaceSearchQuery,
    PlaceService, SqlitePlaceRepository,
};
use rusqlite::Connection;
use std::collections::BTreeSet;

struct Fixture {
    conn: Connection,
}

impl Fixture {
    fn new() -> Self {
        Self {
            conn: open_db_in_memory().unwrap(),
        }
    }

    fn repo(&self) -> SqlitePlaceRepository<'_> {
        SqlitePlaceRepository::try_new(&self.conn).unwrap()
    }

    fn add(
        &self,
        title: &str,
        location: &str,
        category: Option<&str>,
        favorite: bool,
    ) -> PlaceId {
        let mut place = NewPlace::new(title, location);
        place.category = category.map(str::to_string);
        place.is_favorite = favorite;
        self.repo().create_place(&place).unwrap()
    }

    fn seed(&self) {
        self.add("tompkins Square Park", "Avenue A & E 7th St", None, true);
        self.add("Katz's Delicatessen", "205 E Houston St", Some("Food"), true);
        self.add("Veselka", "144 2nd Ave", Some("Food"), false);
        self.add("Death & Co", "433 E 6th St", Some("Bars"), false);
        self.add("Strand Book Store", "828 Broadway", Some("Shopping"), true);
        self.add("Anthology Film Archives", "32 2nd Ave", Some("Culture"), false);
        self.add("La MaMa", "74A E 4th St", None, false);
    }
}

fn titles(places: &[Place]) -> Vec<&str> {
    places.iter().map(|place| place.title.as_str()).collect()
}

#[test]
fn get_all_is_ordered_by_title_ignoring_case() {
    let fixture = Fixture::new();
    fixture.seed();

    let all = fixture.repo().list_places(&PlaceListQuery::default()).unwrap();
    assert_eq!(
        titles(&all),
        vec![
            "Anthology Film Archives",
            "Death & Co",
            "Katz's Delicatessen",
            "La MaMa",
            "Strand Book Store",
            "tompkins Square Park",
            "Veselka",
        ]
    );
}

#[test]
fn category_filter_matches_named_all_and_uncategorized() {
    let fixture = Fixture::new();
    fixture.seed();
    let repo = fixture.repo();

    let food = repo.list_places(&PlaceListQuery::by_category("Food")).unwrap();
    assert_eq!(titles(&food), vec!["Katz's Delicatessen", "Veselka"]);

    let all = repo.list_places(&PlaceListQuery::by_category("All")).unwrap();
    assert_eq!(all.len(), 7);

    let uncategorized = repo
        .list_places(&PlaceListQuery::by_category("Uncategorized"))
        .unwrap();
    assert_eq!(titles(&uncategorized), vec!["La MaMa", "tompkins Square Park"]);
    assert!(uncategorized.iter().all(|place| place.category.is_none()));

    let unknown = repo.list_places(&PlaceListQuery::by_category("Museums")).unwrap();
    assert!(unknown.is_empty());
}

#[test]
fn favorites_respect_category_filter() {
    let fixture = Fixture::new();
    fixture.seed();
    let repo = fixture.repo();

    let favorites = repo
        .list_places(&PlaceListQuery::favorites(CategoryFilter::All))
        .unwrap();
    assert_eq!(
        titles(&favorites),
        vec!["Katz's Delicatessen", "Strand Book Store", "tompkins Square Park"]
    );

    let food = repo.list_places(&PlaceListQuery::favorites("Food")).unwrap();
    assert_eq!(titles(&food), vec!["Katz's Delicatessen"]);

    let uncategorized = repo
        .list_places(&PlaceListQuery::favorites("Uncategorized"))
        .unwrap();
    assert_eq!(titles(&uncategorized), vec!["tompkins Square Park"]);
}

#[test]
fn list_categories_is_sorted_unique_and_wrapped_in_sentinels() {
    let fixture = Fixture::new();
    fixture.seed();
    fixture.add("Mudspot", "307 E 9th St", Some("Food"), false);
    fixture.add("B&H Dairy", "127 2nd Ave", Some("Cafe"), false);

    let categories = fixture.repo().list_categories().unwrap();
    assert_eq!(
        categories,
        vec!["All", "Bars", "Cafe", "Culture", "Food", "Shopping", "Uncategorized"]
    );

    let middle = &categories[1..categories.len() - 1];
    let unique: BTreeSet<_> = middle.iter().collect();
    assert_eq!(unique.len(), middle.len());
    assert!(middle.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn list_categories_on_empty_store_is_just_sentinels() {
    let fixture = Fixture::new();
    assert_eq!(
        fixture.repo().list_categories().unwrap(),
        vec!["All", "Uncategorized"]
    );
}

#[test]
fn search_matches_title_or_location_ignoring_case() {
    let fixture = Fixture::new();
    fixture.seed();
    let repo = fixture.repo();

    let by_title = repo.search_places(&PlaceSearchQuery::new("KATZ")).unwrap();
    assert_eq!(titles(&by_title), vec!["Katz's Delicatessen"]);

    let by_location = repo.search_places(&PlaceSearchQuery::new("2nd ave")).unwrap();
    assert_eq!(titles(&by_location), vec!["Anthology Film Archives", "Veselka"]);

    let nothing = repo.search_places(&PlaceSearchQuery::new("brooklyn")).unwrap();
    assert!(nothing.is_empty());
}

#[test]
fn search_result_is_exactly_the_matching_subset() {
    let fixture = Fixture::new();
    fixture.seed();
    let repo = fixture.repo();
    let all = repo.list_places(&PlaceListQuery::default()).unwrap();

    for query in ["a", "E ", "st", "&", "%", "_", "zz", "ö"] {
        let needle = query.to_lowercase();
        let expected: Vec<PlaceId> = all
            .iter()
            .filter(|place| {
                place.title.to_lowercase().contains(&needle)
                    || place.location.to_lowercase().contains(&needle)
            })
            .map(|place| place.id)
            .collect();
        let actual: Vec<PlaceId> = repo
            .search_places(&PlaceSearchQuery::new(query))
            .unwrap()
            .iter()
            .map(|place| place.id)
            .collect();
        assert_eq!(actual, expected, "query `{query}`");
    }
}

#[test]
fn empty_search_returns_all_places() {
    let fixture = Fixture::new();
    fixture.seed();
    let repo = fixture.repo();

    let all = repo.list_places(&PlaceListQuery::default()).unwrap();
    let searched = repo.search_places(&PlaceSearchQuery::new("")).unwrap();
    assert_eq!(searched, all);
}

#[test]
fn search_treats_wildcards_literally() {
    let fixture = Fixture::new();
    fixture.add("100% Juice", "1 Ave", None, false);
    fixture.add("Plain Juice", "2 Ave", None, false);

    let hits = fixture
        .repo()
        .search_places(&PlaceSearchQuery::new("100%"))
        .unwrap();
    assert_eq!(titles(&hits), vec!["100% Juice"]);

    let underscore = fixture
        .repo()
        .search_places(&PlaceSearchQuery::new("_"))
        .unwrap();
    assert!(underscore.is_empty());
}

#[test]
fn search_favorites_only_returns_favorites() {
    let fixture = Fixture::new();
    fixture.seed();

    let service = PlaceService::new(fixture.repo());
    let hits = service.search_favorites("st").unwrap();
    assert_eq!(
        titles(&hits),
        vec!["Katz's Delicatessen", "Strand Book Store", "tompkins Square Park"]
    );
    assert!(hits.iter().all(|place| place.is_favorite));
}

#[test]
fn service_category_helpers_delegate_to_repository() {
    let fixture = Fixture::new();
    fixture.seed();
    let service = PlaceService::new(fixture.repo());

    assert_eq!(service.all_places().unwrap().len(), 7);
    assert_eq!(service.places_by_category("Bars").unwrap().len(), 1);
    assert_eq!(service.favorites().unwrap().len(), 3);
    assert_eq!(service.favorites_by_category("Shopping").unwrap().len(), 1);
    assert_eq!(service.search("veselka").unwrap().len(), 1);
    assert_eq!(service.categories().unwrap().first().map(String::as_str), Some("All"));
}
