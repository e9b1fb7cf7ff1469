//! Narrowing, ordering and paging of a property collection.
//!
//! Everything here is pure and deterministic for a given collection and query,
//! so it can be re-run on every keystroke. Unreadable filter tokens never
//! error; they simply match nothing.

mod criteria;
mod pagination;

pub use criteria::{PriceRange, SortKey, Threshold};
pub(crate) use criteria::is_unset;
pub use pagination::{page_count, paginate, Page, PropertyBrowser, DEFAULT_PAGE_SIZE};

use super::domain::{Property, PropertyStatus};

/// Filter and sort settings; every clause is AND-combined and an unset
/// clause always passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyQuery {
    /// Case-insensitive substring of address, city, or zip code.
    pub search: String,
    pub price: PriceRange,
    pub bedrooms: Threshold,
    pub bathrooms: Threshold,
    pub status: Option<PropertyStatus>,
    /// Case-insensitive exact property type, e.g. "Single Family".
    pub property_type: Option<String>,
    /// Case-insensitive substring of city or state.
    pub location: Option<String>,
    /// Case-insensitive substring of any listed feature.
    pub feature: Option<String>,
    pub sort: SortKey,
}

impl PropertyQuery {
    pub fn matches(&self, property: &Property) -> bool {
        self.matches_search(property)
            && self.price.contains(property.price)
            && self.bedrooms.admits(f64::from(property.bedrooms))
            && self.bathrooms.admits(property.bathrooms)
            && self.status.map_or(true, |status| status == property.status)
            && self.matches_type(property)
            && self.matches_location(property)
            && self.matches_feature(property)
    }

    /// Filters then sorts. The sort is stable, so equal keys keep the
    /// collection's order.
    pub fn apply(&self, properties: &[Property]) -> Vec<Property> {
        let mut matched: Vec<Property> = properties
            .iter()
            .filter(|property| self.matches(property))
            .cloned()
            .collect();

        match self.sort {
            SortKey::Newest => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortKey::PriceLow => matched.sort_by_key(|property| property.price),
            SortKey::PriceHigh => matched.sort_by(|a, b| b.price.cmp(&a.price)),
        }

        matched
    }

    fn matches_search(&self, property: &Property) -> bool {
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        [&property.address, &property.city, &property.zip_code]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    fn matches_type(&self, property: &Property) -> bool {
        match non_blank(&self.property_type) {
            Some(wanted) => property.property_type.trim().eq_ignore_ascii_case(wanted),
            None => true,
        }
    }

    fn matches_location(&self, property: &Property) -> bool {
        match non_blank(&self.location) {
            Some(wanted) => {
                let wanted = wanted.to_lowercase();
                property.city.to_lowercase().contains(&wanted)
                    || property.state.to_lowercase().contains(&wanted)
            }
            None => true,
        }
    }

    fn matches_feature(&self, property: &Property) -> bool {
        match non_blank(&self.feature) {
            Some(wanted) => {
                let wanted = wanted.to_lowercase();
                property
                    .features
                    .iter()
                    .any(|feature| feature.to_lowercase().contains(&wanted))
            }
            None => true,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("any"))
}
