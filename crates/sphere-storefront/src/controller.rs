//! Listing controller: drives [`ListingState`] against a [`CatalogApi`].

use crate::api::CatalogApi;
use crate::error::ListingError;
use crate::state::{FetchTicket, ListingState};
use crate::view::ListingView;
use sphere_commerce::catalog::CategoryDirectory;
use sphere_commerce::search::{FilterState, PriceRange, SortOption, DEFAULT_PAGE_SIZE};
use std::collections::BTreeSet;
use tracing::debug;

/// Store name used in document titles.
pub const DEFAULT_STORE_NAME: &str = "ShopSphere";

/// Listing behaviour knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingConfig {
    /// Products requested per fetch.
    pub page_size: usize,
    pub store_name: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            store_name: DEFAULT_STORE_NAME.to_string(),
        }
    }
}

impl ListingConfig {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_store_name(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = store_name.into();
        self
    }
}

/// One shopper's product listing.
///
/// Each operation changes the criteria, fetches what the new state needs, and
/// records the outcome. Fetch failures are recorded in the state (see
/// [`ListingView`]) and also returned to the caller.
///
/// # Example
///
/// ```rust,ignore
/// let api = HttpCatalogApi::new(FetchClient::new(ClientConfig::default())?);
/// let mut listing = ListingController::new(api, ListingConfig::default());
///
/// listing.navigate(Some("shoes")).await?;
/// listing.select_sort_by_name("Price: Low - High").await?;
/// while listing.state().has_more() {
///     listing.load_more().await?;
/// }
/// ```
pub struct ListingController<A> {
    api: A,
    config: ListingConfig,
    directory: CategoryDirectory,
    state: ListingState,
}

impl<A: CatalogApi> ListingController<A> {
    pub fn new(api: A, config: ListingConfig) -> Self {
        let state = ListingState::new(config.page_size);
        Self {
            api,
            config,
            directory: CategoryDirectory::new(),
            state,
        }
    }

    /// Start with an already-loaded category directory.
    pub fn with_directory(mut self, directory: CategoryDirectory) -> Self {
        self.directory = directory;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    pub fn directory(&self) -> &CategoryDirectory {
        &self.directory
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    /// Enter the listing for `slug`, or for every category.
    ///
    /// Filters and sort start over. A slug is resolved against the category
    /// directory, which is fetched first if it has not been loaded yet.
    pub async fn navigate(&mut self, slug: Option<&str>) -> Result<(), ListingError> {
        self.navigate_with(slug, None, FilterState::default()).await
    }

    /// Enter a listing with initial sort and filters.
    ///
    /// Same as [`navigate`](Self::navigate) followed by sort and filter
    /// changes, but only the first page under the final criteria is fetched.
    pub async fn navigate_with(
        &mut self,
        slug: Option<&str>,
        sort: Option<SortOption>,
        filters: FilterState,
    ) -> Result<(), ListingError> {
        if let Some(ticket) = self.state.begin_navigate_with(slug, sort, filters) {
            return self.fetch(ticket).await;
        }

        if !self.directory.is_loaded() {
            match self.api.fetch_categories().await {
                Ok(categories) => self.directory.load(categories),
                Err(e) => {
                    self.state.fail_resolve(e.to_string());
                    return Err(ListingError::CategoriesUnavailable(e));
                }
            }
        }

        match self.state.resolve(&self.directory) {
            Some(ticket) => self.fetch(ticket).await,
            None => Ok(()),
        }
    }

    /// Fetch the category list again, replacing the directory.
    pub async fn refresh_categories(&mut self) -> Result<(), ListingError> {
        let categories = self
            .api
            .fetch_categories()
            .await
            .map_err(ListingError::CategoriesUnavailable)?;
        self.directory.load(categories);
        Ok(())
    }

    pub async fn set_sort(&mut self, sort: Option<SortOption>) -> Result<(), ListingError> {
        let ticket = self.state.set_sort(sort);
        self.fetch_opt(ticket).await
    }

    /// Select a sort preset by its label. Unknown labels clear the sort.
    pub async fn select_sort_by_name(&mut self, name: &str) -> Result<(), ListingError> {
        self.set_sort(SortOption::find_by_name(name)).await
    }

    pub async fn set_price_range(&mut self, range: PriceRange) -> Result<(), ListingError> {
        let ticket = self.state.set_price_range(range);
        self.fetch_opt(ticket).await
    }

    pub async fn toggle_size(&mut self, size: impl Into<String>) -> Result<(), ListingError> {
        let ticket = self.state.toggle_size(size);
        self.fetch_opt(ticket).await
    }

    pub async fn set_sizes(&mut self, sizes: BTreeSet<String>) -> Result<(), ListingError> {
        let ticket = self.state.set_sizes(sizes);
        self.fetch_opt(ticket).await
    }

    /// Replace all filters at once, with a single refetch.
    pub async fn set_filters(&mut self, filters: FilterState) -> Result<(), ListingError> {
        let ticket = self.state.set_filters(filters);
        self.fetch_opt(ticket).await
    }

    pub async fn reset_filters(&mut self) -> Result<(), ListingError> {
        let ticket = self.state.reset_filters();
        self.fetch_opt(ticket).await
    }

    /// Append the next page. Does nothing once every product is loaded.
    pub async fn load_more(&mut self) -> Result<(), ListingError> {
        let ticket = self.state.begin_load_more();
        if ticket.is_none() {
            debug!(
                accumulated = self.state.products().len(),
                total = self.state.total(),
                "load more ignored"
            );
        }
        self.fetch_opt(ticket).await
    }

    /// Navigate away: filters reset and the page is cleared.
    pub fn leave(&mut self) {
        self.state.leave();
    }

    pub fn view(&self) -> ListingView {
        ListingView::from_state(&self.state, &self.config.store_name)
    }

    async fn fetch_opt(&mut self, ticket: Option<FetchTicket>) -> Result<(), ListingError> {
        match ticket {
            Some(ticket) => self.fetch(ticket).await,
            None => Ok(()),
        }
    }

    async fn fetch(&mut self, ticket: FetchTicket) -> Result<(), ListingError> {
        match self.api.search_products(&ticket.query).await {
            Ok(page) => {
                self.state.apply_page(&ticket, page);
                Ok(())
            }
            Err(e) => {
                self.state.apply_error(&ticket, e.to_string());
                Err(ListingError::Fetch(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LoadStatus;
    use async_trait::async_trait;
    use sphere_commerce::catalog::{Category, Product};
    use sphere_commerce::price::Price;
    use sphere_commerce::search::{ProductPage, ProductQuery};
    use sphere_data::FetchError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeCatalog {
        category_calls: AtomicUsize,
        product_calls: AtomicUsize,
        fail_products: bool,
    }

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
            self.category_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Category::new(1, "Shoes", "shoes")])
        }

        async fn search_products(&self, query: &ProductQuery) -> Result<ProductPage, FetchError> {
            self.product_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_products {
                return Err(FetchError::Timeout);
            }
            let end = (query.offset + query.limit).min(20);
            let products = (query.offset..end)
                .map(|i| Product::new(i as i64, format!("P{}", i), "Shoes", Price::from_cents(100)))
                .collect();
            Ok(ProductPage::new(products, 20))
        }
    }

    #[tokio::test]
    async fn test_directory_fetched_once() {
        let api = Arc::new(FakeCatalog::default());
        let mut listing = ListingController::new(api.clone(), ListingConfig::default());

        listing.navigate(Some("shoes")).await.unwrap();
        listing.navigate(Some("shoes")).await.unwrap();

        assert_eq!(api.category_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.product_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_preloaded_directory_skips_fetch() {
        let api = Arc::new(FakeCatalog::default());
        let directory = CategoryDirectory::from_categories(vec![Category::new(9, "Bags", "bags")]);
        let mut listing =
            ListingController::new(api.clone(), ListingConfig::default()).with_directory(directory);

        listing.navigate(Some("shoes")).await.unwrap();
        assert_eq!(api.category_calls.load(Ordering::SeqCst), 0);
        assert!(listing.view().is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_recorded_and_returned() {
        let api = Arc::new(FakeCatalog {
            fail_products: true,
            ..FakeCatalog::default()
        });
        let mut listing = ListingController::new(api, ListingConfig::default());

        let err = listing.navigate(None).await.unwrap_err();
        assert!(matches!(err, ListingError::Fetch(FetchError::Timeout)));
        assert_eq!(listing.state().status(), LoadStatus::Error);
        assert_eq!(listing.state().last_error(), Some("Request timed out"));
    }

    #[tokio::test]
    async fn test_page_size_from_config() {
        let api = Arc::new(FakeCatalog::default());
        let mut listing =
            ListingController::new(api, ListingConfig::default().with_page_size(8));

        listing.navigate(None).await.unwrap();
        listing.load_more().await.unwrap();
        listing.load_more().await.unwrap();
        listing.load_more().await.unwrap();

        assert_eq!(listing.state().products().len(), 20);
        assert!(!listing.view().listing().unwrap().show_load_more);
    }

    #[tokio::test]
    async fn test_navigate_with_criteria_fetches_once() {
        let api = Arc::new(FakeCatalog::default());
        let mut listing = ListingController::new(api.clone(), ListingConfig::default());
        let mut filters = FilterState::new();
        filters.toggle_size("M");

        listing
            .navigate_with(Some("shoes"), Some(SortOption::PRICE_HIGH_LOW), filters)
            .await
            .unwrap();

        assert_eq!(api.product_calls.load(Ordering::SeqCst), 1);
        assert_eq!(listing.state().sort(), Some(SortOption::PRICE_HIGH_LOW));
        assert!(listing.state().filters().sizes.contains("M"));
        assert_eq!(listing.state().products().len(), 12);
    }

    #[tokio::test]
    async fn test_unknown_sort_label_clears_sort() {
        let api = Arc::new(FakeCatalog::default());
        let mut listing = ListingController::new(api, ListingConfig::default());
        listing.navigate(None).await.unwrap();

        listing.select_sort_by_name("What's new").await.unwrap();
        assert_eq!(listing.state().sort(), Some(SortOption::WHATS_NEW));

        listing.select_sort_by_name("Sort By").await.unwrap();
        assert_eq!(listing.state().sort(), None);
    }
}
