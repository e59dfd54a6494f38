//! Listing state machine.
//!
//! [`ListingState`] owns the criteria (category, sort, filters) and the
//! accumulated product list. It performs no I/O: each transition that needs
//! data hands back a [`FetchTicket`], and the caller feeds the outcome back
//! through [`ListingState::apply_page`] or [`ListingState::apply_error`].
//!
//! Every criteria change bumps the generation. Outcomes carrying an older
//! generation, or a page offset that no longer matches the accumulated list,
//! are discarded.

use serde::Serialize;
use sphere_commerce::catalog::{Category, CategoryDirectory, Product};
use sphere_commerce::search::{FilterState, PriceRange, ProductPage, ProductQuery, SortOption};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

/// Where the product list is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Error,
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoadStatus::Idle => "idle",
            LoadStatus::Loading => "loading",
            LoadStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// The browsing context the listing is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryContext {
    /// No slug: every category.
    All,
    /// A slug waiting for the category directory.
    Resolving(String),
    Resolved(Category),
    /// Terminal until the next navigation.
    NotFound(String),
}

impl CategoryContext {
    /// Category name to filter on, when products can be fetched at all.
    fn fetch_scope(&self) -> Option<Option<&str>> {
        match self {
            CategoryContext::All => Some(None),
            CategoryContext::Resolved(category) => Some(Some(category.name.as_str())),
            CategoryContext::Resolving(_) | CategoryContext::NotFound(_) => None,
        }
    }
}

/// A product fetch the state machine is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: ProductQuery,
}

/// What happened to a fetch outcome fed back into the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Accepted,
    /// Superseded by a newer criteria change or a different page.
    Discarded,
}

/// Criteria plus the accumulated page state of one product listing.
#[derive(Debug, Clone)]
pub struct ListingState {
    page_size: usize,
    context: CategoryContext,
    filters: FilterState,
    sort: Option<SortOption>,
    products: Vec<Product>,
    total: usize,
    status: LoadStatus,
    generation: u64,
    last_error: Option<String>,
}

impl ListingState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            context: CategoryContext::All,
            filters: FilterState::default(),
            sort: None,
            products: Vec::new(),
            total: 0,
            status: LoadStatus::Idle,
            generation: 0,
            last_error: None,
        }
    }

    pub fn context(&self) -> &CategoryContext {
        &self.context
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> Option<SortOption> {
        self.sort
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whether another page exists beyond the accumulated list.
    pub fn has_more(&self) -> bool {
        self.products.len() < self.total
    }

    /// Enter a listing. Filters, sort, and the page are reset.
    ///
    /// Without a slug the first page can be fetched straight away. With one,
    /// the slug must first be resolved through [`ListingState::resolve`].
    pub fn begin_navigate(&mut self, slug: Option<&str>) -> Option<FetchTicket> {
        self.begin_navigate_with(slug, None, FilterState::default())
    }

    /// Enter a listing with initial sort and filters instead of clean ones,
    /// so the first fetch already carries them.
    pub fn begin_navigate_with(
        &mut self,
        slug: Option<&str>,
        sort: Option<SortOption>,
        filters: FilterState,
    ) -> Option<FetchTicket> {
        self.filters = filters;
        self.sort = sort;
        self.context = match slug.filter(|s| !s.is_empty()) {
            Some(slug) => CategoryContext::Resolving(slug.to_string()),
            None => CategoryContext::All,
        };
        debug!(context = ?self.context, "navigate");

        let ticket = self.restart();
        if matches!(self.context, CategoryContext::Resolving(_)) {
            // Spinner while the directory loads.
            self.status = LoadStatus::Loading;
        }
        ticket
    }

    /// Resolve a pending slug against a loaded directory.
    ///
    /// Returns the first-page ticket when the slug is known. An unknown slug
    /// moves the listing to [`CategoryContext::NotFound`] and nothing is
    /// fetched.
    pub fn resolve(&mut self, directory: &CategoryDirectory) -> Option<FetchTicket> {
        let CategoryContext::Resolving(slug) = &self.context else {
            return None;
        };
        if !directory.is_loaded() {
            return None;
        }

        let slug = slug.clone();
        self.context = match directory.find_by_slug(&slug) {
            Some(category) => CategoryContext::Resolved(category.clone()),
            None => {
                debug!(slug = %slug, "unknown category slug");
                CategoryContext::NotFound(slug)
            }
        };
        self.restart()
    }

    /// Record that the category directory could not be loaded.
    pub fn fail_resolve(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(error = %message, "category directory unavailable");
        self.status = LoadStatus::Error;
        self.last_error = Some(message);
    }

    /// Leave the listing: filters reset and the page is cleared.
    pub fn leave(&mut self) {
        self.filters.reset();
        self.sort = None;
        self.context = CategoryContext::All;
        self.clear_page();
        self.generation += 1;
        self.status = LoadStatus::Idle;
    }

    pub fn set_sort(&mut self, sort: Option<SortOption>) -> Option<FetchTicket> {
        self.sort = sort;
        self.restart()
    }

    pub fn set_price_range(&mut self, range: PriceRange) -> Option<FetchTicket> {
        self.filters.set_price_range(range);
        self.restart()
    }

    pub fn toggle_size(&mut self, size: impl Into<String>) -> Option<FetchTicket> {
        self.filters.toggle_size(size);
        self.restart()
    }

    pub fn set_sizes(&mut self, sizes: BTreeSet<String>) -> Option<FetchTicket> {
        self.filters.set_sizes(sizes);
        self.restart()
    }

    pub fn set_filters(&mut self, filters: FilterState) -> Option<FetchTicket> {
        self.filters = filters;
        self.restart()
    }

    pub fn reset_filters(&mut self) -> Option<FetchTicket> {
        self.filters.reset();
        self.restart()
    }

    /// Ticket for the next page.
    ///
    /// Only issued while idle with more products to load, or after a failed
    /// fetch, in which case the failed page is requested again.
    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        let scope = self.context.fetch_scope()?;
        let allowed = match self.status {
            LoadStatus::Idle => self.has_more(),
            LoadStatus::Error => true,
            LoadStatus::Loading => false,
        };
        if !allowed {
            return None;
        }

        let query = self.query_for(scope.map(str::to_string), self.products.len());
        self.status = LoadStatus::Loading;
        self.last_error = None;
        debug!(offset = query.offset, generation = self.generation, "load more");

        Some(FetchTicket {
            generation: self.generation,
            query,
        })
    }

    /// Append a fetched page.
    pub fn apply_page(&mut self, ticket: &FetchTicket, page: ProductPage) -> Applied {
        if !self.is_current(ticket) {
            return Applied::Discarded;
        }

        let ProductPage { products, total } = page;
        let received = products.len();
        self.products.extend(products);
        self.total = total;

        if self.products.len() > self.total {
            warn!(
                accumulated = self.products.len(),
                total = self.total,
                "server returned more products than its total, truncating"
            );
            self.products.truncate(self.total);
        } else if received == 0 && self.has_more() {
            warn!(
                accumulated = self.products.len(),
                total = self.total,
                "empty page before the reported total, treating list as complete"
            );
            self.total = self.products.len();
        }

        self.status = LoadStatus::Idle;
        self.last_error = None;
        debug!(
            received,
            accumulated = self.products.len(),
            total = self.total,
            "page applied"
        );
        Applied::Accepted
    }

    /// Record a failed fetch.
    pub fn apply_error(&mut self, ticket: &FetchTicket, message: impl Into<String>) -> Applied {
        if !self.is_current(ticket) {
            return Applied::Discarded;
        }

        let message = message.into();
        warn!(offset = ticket.query.offset, error = %message, "product fetch failed");
        self.status = LoadStatus::Error;
        self.last_error = Some(message);
        Applied::Accepted
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        if ticket.generation != self.generation {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding response from superseded criteria"
            );
            return false;
        }
        if ticket.query.offset != self.products.len() {
            warn!(
                offset = ticket.query.offset,
                accumulated = self.products.len(),
                "discarding page that no longer lines up with the list"
            );
            return false;
        }
        true
    }

    /// Clear the page and issue a first-page ticket under the current criteria.
    fn restart(&mut self) -> Option<FetchTicket> {
        self.generation += 1;
        self.clear_page();

        let Some(scope) = self.context.fetch_scope() else {
            self.status = LoadStatus::Idle;
            return None;
        };

        let query = self.query_for(scope.map(str::to_string), 0);
        self.status = LoadStatus::Loading;
        debug!(generation = self.generation, query = ?query, "criteria changed");

        Some(FetchTicket {
            generation: self.generation,
            query,
        })
    }

    fn clear_page(&mut self) {
        self.products.clear();
        self.total = 0;
        self.last_error = None;
    }

    fn query_for(&self, category: Option<String>, offset: usize) -> ProductQuery {
        ProductQuery::new(self.page_size)
            .with_category(category)
            .with_sort(self.sort)
            .with_filters(&self.filters)
            .with_offset(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sphere_commerce::price::Price;

    fn products(start: i64, count: usize) -> Vec<Product> {
        (0..count as i64)
            .map(|i| Product::new(start + i, format!("Item {}", start + i), "Shoes", Price::from_cents(1000)))
            .collect()
    }

    fn directory() -> CategoryDirectory {
        CategoryDirectory::from_categories(vec![
            Category::new(1, "Shoes", "shoes"),
            Category::new(2, "Shirts", "shirts"),
        ])
    }

    #[test]
    fn test_navigate_without_slug_fetches_everything() {
        let mut state = ListingState::new(12);
        let ticket = state.begin_navigate(None).unwrap();
        assert_eq!(ticket.query.category, None);
        assert_eq!(ticket.query.offset, 0);
        assert_eq!(ticket.query.limit, 12);
        assert_eq!(state.status(), LoadStatus::Loading);
    }

    #[test]
    fn test_slug_waits_for_directory() {
        let mut state = ListingState::new(12);
        assert!(state.begin_navigate(Some("shoes")).is_none());
        assert_eq!(state.status(), LoadStatus::Loading);

        assert!(state.resolve(&CategoryDirectory::new()).is_none());
        assert!(matches!(state.context(), CategoryContext::Resolving(_)));

        let ticket = state.resolve(&directory()).unwrap();
        assert_eq!(ticket.query.category.as_deref(), Some("Shoes"));
    }

    #[test]
    fn test_unknown_slug_is_not_found_without_fetch() {
        let mut state = ListingState::new(12);
        state.begin_navigate(Some("hats"));
        assert!(state.resolve(&directory()).is_none());
        assert_eq!(state.context(), &CategoryContext::NotFound("hats".to_string()));
        assert_eq!(state.status(), LoadStatus::Idle);

        assert!(state.set_sort(Some(SortOption::WHATS_NEW)).is_none());
        assert!(state.begin_load_more().is_none());
    }

    #[test]
    fn test_pages_accumulate_up_to_total() {
        let mut state = ListingState::new(12);
        let ticket = state.begin_navigate(None).unwrap();
        assert_eq!(state.apply_page(&ticket, ProductPage::new(products(0, 12), 30)), Applied::Accepted);
        assert!(state.has_more());

        let ticket = state.begin_load_more().unwrap();
        assert_eq!(ticket.query.offset, 12);
        state.apply_page(&ticket, ProductPage::new(products(12, 12), 30));

        let ticket = state.begin_load_more().unwrap();
        state.apply_page(&ticket, ProductPage::new(products(24, 6), 30));
        assert_eq!(state.products().len(), 30);
        assert!(!state.has_more());
        assert!(state.begin_load_more().is_none());
    }

    #[test]
    fn test_load_more_ignored_while_loading() {
        let mut state = ListingState::new(12);
        state.begin_navigate(None).unwrap();
        assert!(state.begin_load_more().is_none());
    }

    #[test]
    fn test_criteria_change_discards_in_flight_page() {
        let mut state = ListingState::new(12);
        let first = state.begin_navigate(None).unwrap();
        let second = state.set_sort(Some(SortOption::PRICE_LOW_HIGH)).unwrap();
        assert!(second.generation > first.generation);

        assert_eq!(state.apply_page(&first, ProductPage::new(products(0, 12), 40)), Applied::Discarded);
        assert!(state.products().is_empty());
        assert_eq!(state.status(), LoadStatus::Loading);

        assert_eq!(state.apply_page(&second, ProductPage::new(products(100, 12), 40)), Applied::Accepted);
        assert_eq!(state.products()[0].id.get(), 100);
    }

    #[test]
    fn test_misaligned_offset_is_discarded() {
        let mut state = ListingState::new(12);
        let ticket = state.begin_navigate(None).unwrap();
        state.apply_page(&ticket, ProductPage::new(products(0, 12), 40));
        let more = state.begin_load_more().unwrap();
        state.apply_page(&more, ProductPage::new(products(12, 12), 40));

        // Same page delivered twice.
        assert_eq!(state.apply_page(&more, ProductPage::new(products(12, 12), 40)), Applied::Discarded);
        assert_eq!(state.products().len(), 24);
    }

    #[test]
    fn test_overlong_page_is_truncated() {
        let mut state = ListingState::new(12);
        let ticket = state.begin_navigate(None).unwrap();
        state.apply_page(&ticket, ProductPage::new(products(0, 12), 5));
        assert_eq!(state.products().len(), 5);
        assert_eq!(state.total(), 5);
    }

    #[test]
    fn test_empty_page_before_total_stops_paging() {
        let mut state = ListingState::new(12);
        let ticket = state.begin_navigate(None).unwrap();
        state.apply_page(&ticket, ProductPage::new(products(0, 12), 40));
        let more = state.begin_load_more().unwrap();
        state.apply_page(&more, ProductPage::new(Vec::new(), 40));
        assert_eq!(state.total(), 12);
        assert!(!state.has_more());
    }

    #[test]
    fn test_error_then_retry_same_offset() {
        let mut state = ListingState::new(12);
        let ticket = state.begin_navigate(None).unwrap();
        state.apply_page(&ticket, ProductPage::new(products(0, 12), 40));

        let more = state.begin_load_more().unwrap();
        state.apply_error(&more, "HTTP 502: bad gateway");
        assert_eq!(state.status(), LoadStatus::Error);
        assert_eq!(state.last_error(), Some("HTTP 502: bad gateway"));
        assert_eq!(state.products().len(), 12);

        let retry = state.begin_load_more().unwrap();
        assert_eq!(retry.query.offset, 12);
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_filter_changes_restart_from_zero() {
        let mut state = ListingState::new(12);
        let ticket = state.begin_navigate(None).unwrap();
        state.apply_page(&ticket, ProductPage::new(products(0, 12), 40));

        let ticket = state.toggle_size("M").unwrap();
        assert_eq!(ticket.query.offset, 0);
        assert!(ticket.query.sizes.contains("M"));
        assert!(state.products().is_empty());
        assert_eq!(state.total(), 0);

        let range = PriceRange::between(Price::from_cents(1000), Price::from_cents(5000)).unwrap();
        let ticket = state.set_price_range(range).unwrap();
        assert_eq!(ticket.query.price_range, range);
        assert!(ticket.query.sizes.contains("M"));

        let ticket = state.reset_filters().unwrap();
        assert!(ticket.query.sizes.is_empty());
        assert!(ticket.query.price_range.is_unbounded());
    }

    #[test]
    fn test_navigate_resets_criteria() {
        let mut state = ListingState::new(12);
        state.begin_navigate(None);
        state.toggle_size("L");
        state.set_sort(Some(SortOption::PRICE_HIGH_LOW));

        let ticket = state.begin_navigate(None).unwrap();
        assert!(ticket.query.sizes.is_empty());
        assert_eq!(ticket.query.sort, None);
    }

    #[test]
    fn test_navigate_with_criteria_carries_them_into_first_fetch() {
        let mut state = ListingState::new(12);
        let mut filters = FilterState::new();
        filters.toggle_size("M");

        assert!(state
            .begin_navigate_with(Some("shoes"), Some(SortOption::PRICE_LOW_HIGH), filters)
            .is_none());
        let ticket = state.resolve(&directory()).unwrap();
        assert_eq!(ticket.query.offset, 0);
        assert_eq!(ticket.query.sort, Some(SortOption::PRICE_LOW_HIGH));
        assert_eq!(ticket.query.sizes.len(), 1);
        assert_eq!(state.sort(), Some(SortOption::PRICE_LOW_HIGH));
    }

    #[test]
    fn test_leave_clears_everything() {
        let mut state = ListingState::new(12);
        let ticket = state.begin_navigate(None).unwrap();
        state.toggle_size("S");
        let ticket2 = state.set_sort(Some(SortOption::WHATS_NEW)).unwrap();
        state.apply_page(&ticket2, ProductPage::new(products(0, 3), 3));

        state.leave();
        assert!(state.filters().is_empty());
        assert_eq!(state.sort(), None);
        assert!(state.products().is_empty());
        assert_eq!(state.apply_page(&ticket, ProductPage::new(products(0, 3), 3)), Applied::Discarded);
    }
}
