use serde::Serialize;

use super::PropertyQuery;
use crate::marketplace::domain::Property;

/// Page size used by the listing grid.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// One page of results plus the numbers needed to render navigation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

pub fn page_count(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1))
}

/// Slices `items` into the requested page. Out-of-range requests are clamped
/// into `1..=max(total_pages, 1)`.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = page_count(total_items, page_size);
    let page = page.clamp(1, total_pages.max(1));

    let start = (page - 1) * page_size;
    let items = items
        .iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect();

    Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    }
}

/// Browse state for a listing grid: the active query and the current page.
///
/// Changing the search term, any filter, or the sort key puts the grid back on
/// page 1.
#[derive(Debug, Clone)]
pub struct PropertyBrowser {
    query: PropertyQuery,
    page: usize,
    page_size: usize,
}

impl PropertyBrowser {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: PropertyQuery::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn query(&self) -> &PropertyQuery {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_query(&mut self, query: PropertyQuery) {
        if query != self.query {
            self.query = query;
            self.page = 1;
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let mut query = self.query.clone();
        query.search = term.into();
        self.set_query(query);
    }

    pub fn go_to(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Renders the current page, clamping the stored page to what exists.
    pub fn view(&mut self, properties: &[Property]) -> Page<Property> {
        let matched = self.query.apply(properties);
        let page = paginate(&matched, self.page, self.page_size);
        self.page = page.page;
        page
    }
}

impl Default for PropertyBrowser {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
