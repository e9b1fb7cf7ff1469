use std::collections::BTreeSet;

use super::common::*;
use crate::marketplace::domain::{Property, PropertyId, PropertyStatus, UserId};
use crate::marketplace::search::{
    PriceRange, PropertyBrowser, PropertyQuery, SortKey, Threshold, DEFAULT_PAGE_SIZE,
};

fn ids(properties: &[Property]) -> Vec<u64> {
    properties.iter().map(|property| property.id.0).collect()
}

fn id_set(properties: &[Property]) -> BTreeSet<u64> {
    properties.iter().map(|property| property.id.0).collect()
}

fn query_with(configure: impl FnOnce(&mut PropertyQuery)) -> PropertyQuery {
    let mut query = PropertyQuery::default();
    configure(&mut query);
    query
}

#[test]
fn price_band_is_inclusive_on_both_ends() {
    let listings = listing_collection();
    let query = query_with(|q| q.price = PriceRange::parse("200000-400000"));

    let matched = query.apply(&listings);
    assert_eq!(id_set(&matched), BTreeSet::from([2, 3, 4, 5, 6]));
    assert!(matched
        .iter()
        .all(|property| (200_000..=400_000).contains(&property.price)));
}

#[test]
fn bedroom_threshold_admits_equal_and_larger_counts() {
    let listings = listing_collection();
    let query = query_with(|q| q.bedrooms = Threshold::parse("3+"));

    let matched = query.apply(&listings);
    assert_eq!(id_set(&matched), BTreeSet::from([2, 3, 4, 6, 7, 8, 9, 10]));
    assert!(matched.iter().all(|property| property.bedrooms >= 3));
}

#[test]
fn combined_filters_return_the_intersection() {
    let listings = listing_collection();
    let by_price = query_with(|q| q.price = PriceRange::parse("200000-400000"));
    let by_beds = query_with(|q| q.bedrooms = Threshold::parse("3+"));
    let both = query_with(|q| {
        q.price = PriceRange::parse("200000-400000");
        q.bedrooms = Threshold::parse("3+");
    });

    let expected: BTreeSet<u64> = id_set(&by_price.apply(&listings))
        .intersection(&id_set(&by_beds.apply(&listings)))
        .copied()
        .collect();
    assert_eq!(id_set(&both.apply(&listings)), expected);
    assert_eq!(expected, BTreeSet::from([2, 3, 4, 6]));
}

#[test]
fn price_orderings_are_reverses_of_each_other() {
    let listings = listing_collection();
    let low = query_with(|q| q.sort = SortKey::PriceLow).apply(&listings);
    let high = query_with(|q| q.sort = SortKey::PriceHigh).apply(&listings);

    assert!(low.windows(2).all(|pair| pair[0].price <= pair[1].price));
    let mut reversed = ids(&high);
    reversed.reverse();
    assert_eq!(ids(&low), reversed);
}

#[test]
fn newest_first_is_the_default_and_the_fallback() {
    let listings = listing_collection();
    let newest = PropertyQuery::default().apply(&listings);
    assert_eq!(ids(&newest), vec![10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);

    let unknown = query_with(|q| q.sort = SortKey::parse("most-bedrooms"));
    assert_eq!(unknown.sort, SortKey::Newest);
    assert_eq!(ids(&unknown.apply(&listings)), ids(&newest));
}

#[test]
fn equal_prices_keep_collection_order() {
    let mut listings = listing_collection();
    for property in listings.iter_mut().take(3) {
        property.price = 500_000;
    }

    let sorted = query_with(|q| q.sort = SortKey::PriceLow).apply(&listings);
    let tied: Vec<u64> = sorted
        .iter()
        .filter(|property| property.price == 500_000)
        .map(|property| property.id.0)
        .collect();
    assert_eq!(tied, vec![1, 2, 3]);
}

#[test]
fn text_search_looks_at_address_city_and_zip() {
    let listings = listing_collection();

    let by_city = query_with(|q| q.search = "des moines".to_string()).apply(&listings);
    assert_eq!(id_set(&by_city), BTreeSet::from([3, 4, 8]));

    let by_zip = query_with(|q| q.search = " 6810 ".to_string()).apply(&listings);
    assert_eq!(id_set(&by_zip), BTreeSet::from([5]));

    let by_address = query_with(|q| q.search = "WALNUT".to_string()).apply(&listings);
    assert_eq!(ids(&by_address), vec![4]);
}

#[test]
fn status_type_location_and_feature_filters_narrow_results() {
    let listings = listing_collection();

    let exclusive = query_with(|q| q.status = Some(PropertyStatus::Exclusive));
    assert_eq!(id_set(&exclusive.apply(&listings)), BTreeSet::from([2, 4, 6, 9]));

    let condos = query_with(|q| q.property_type = Some("condo".to_string()));
    assert_eq!(
        id_set(&condos.apply(&listings)),
        BTreeSet::from([2, 4, 6, 8, 10])
    );

    let omaha = query_with(|q| q.location = Some("Omaha".to_string()));
    assert_eq!(id_set(&omaha.apply(&listings)), BTreeSet::from([5, 6]));

    let pool = query_with(|q| {
        q.feature = Some("POOL".to_string());
        q.location = Some("any".to_string());
    });
    assert_eq!(
        id_set(&pool.apply(&listings)),
        BTreeSet::from([2, 4, 6, 8, 10])
    );
}

#[test]
fn unreadable_tokens_match_nothing() {
    let listings = listing_collection();

    let price = query_with(|q| q.price = PriceRange::parse("cheap"));
    assert_eq!(price.price, PriceRange::Unreadable);
    assert!(price.apply(&listings).is_empty());

    let baths = query_with(|q| q.bathrooms = Threshold::parse("lots"));
    assert!(baths.apply(&listings).is_empty());
}

#[test]
fn applying_the_same_query_twice_is_stable() {
    let listings = listing_collection();
    let query = query_with(|q| {
        q.price = PriceRange::parse("200000+");
        q.sort = SortKey::PriceHigh;
    });

    assert_eq!(query.apply(&listings), query.apply(&listings));
}

#[test]
fn fourteen_listings_split_into_three_pages() {
    let listings: Vec<Property> = (1..=14)
        .map(|id| property_fixture(id, UserId(1), 100_000 + id * 1_000))
        .collect();
    let mut browser = PropertyBrowser::new(DEFAULT_PAGE_SIZE);

    let first = browser.view(&listings);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.items.len(), 6);
    assert_eq!(first.items[0].id, PropertyId(14));

    browser.go_to(3);
    let last = browser.view(&listings);
    assert_eq!(last.page, 3);
    assert_eq!(ids(&last.items), vec![2, 1]);
}

#[test]
fn changing_the_search_term_returns_to_the_first_page() {
    let listings: Vec<Property> = (1..=14)
        .map(|id| property_fixture(id, UserId(1), 100_000 + id * 1_000))
        .collect();
    let mut browser = PropertyBrowser::default();

    browser.go_to(3);
    assert_eq!(browser.view(&listings).page, 3);

    browser.set_search("grand");
    assert_eq!(browser.page(), 1);
    assert_eq!(browser.view(&listings).page, 1);

    browser.go_to(2);
    browser.set_search("grand");
    assert_eq!(browser.page(), 2, "unchanged query keeps the page");
}

#[test]
fn stored_page_is_clamped_when_results_shrink() {
    let listings = listing_collection();
    let mut browser = PropertyBrowser::new(3);

    browser.go_to(4);
    assert_eq!(browser.view(&listings).page, 4);

    let mut query = browser.query().clone();
    query.location = Some("Omaha".to_string());
    browser.set_query(query);
    browser.go_to(5);

    let page = browser.view(&listings);
    assert_eq!(page.page, 1);
    assert_eq!(page.total_pages, 1);
    assert_eq!(browser.page(), 1);
}
