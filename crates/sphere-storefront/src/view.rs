//! What the listing page shows for a given state.

use crate::state::{CategoryContext, ListingState, LoadStatus};
use serde::Serialize;
use sphere_commerce::catalog::Product;

/// Heading used when no category is selected.
pub const ALL_CATEGORIES_TITLE: &str = "All Categories";

/// Shown once a search settles with no matches.
pub const EMPTY_MESSAGE: &str = "No Products Found!";

/// The listing page, projected from [`ListingState`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ListingView {
    /// Resolving the slug, or the first page is on its way.
    Loading,
    /// The slug does not name a category.
    NotFound { slug: String },
    Listing(ListingPage),
}

/// A rendered product listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub title: String,
    /// Document title, set only inside a category.
    pub page_title: Option<String>,
    pub products: Vec<Product>,
    pub shown: usize,
    pub total: usize,
    /// "Showing N of M results", when there is anything to show.
    pub summary: Option<String>,
    pub empty_message: Option<&'static str>,
    pub show_load_more: bool,
    /// Selected sort preset label.
    pub sort: Option<&'static str>,
    pub status: LoadStatus,
    pub error: Option<String>,
}

impl ListingView {
    pub fn from_state(state: &ListingState, store_name: &str) -> Self {
        let status = state.status();
        let products = state.products();

        let category = match state.context() {
            CategoryContext::NotFound(slug) => {
                return ListingView::NotFound { slug: slug.clone() };
            }
            CategoryContext::Resolving(_) if status != LoadStatus::Error => {
                return ListingView::Loading;
            }
            _ if status == LoadStatus::Loading && products.is_empty() => {
                return ListingView::Loading;
            }
            CategoryContext::Resolved(category) => Some(category),
            CategoryContext::All | CategoryContext::Resolving(_) => None,
        };

        let shown = products.len();
        let total = state.total();

        ListingView::Listing(ListingPage {
            title: category
                .map(|c| c.name.clone())
                .unwrap_or_else(|| ALL_CATEGORIES_TITLE.to_string()),
            page_title: category.map(|c| format!("{} | {}", c.name, store_name)),
            products: products.to_vec(),
            shown,
            total,
            summary: (total > 0).then(|| format!("Showing {} of {} results", shown, total)),
            empty_message: (status != LoadStatus::Loading && total == 0).then_some(EMPTY_MESSAGE),
            show_load_more: shown < total,
            sort: state.sort().map(|s| s.name),
            status,
            error: state.last_error().map(str::to_string),
        })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListingView::Loading)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ListingView::NotFound { .. })
    }

    /// The listing, if one is being shown.
    pub fn listing(&self) -> Option<&ListingPage> {
        match self {
            ListingView::Listing(page) => Some(page),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sphere_commerce::catalog::{Category, CategoryDirectory};
    use sphere_commerce::price::Price;
    use sphere_commerce::search::{ProductPage, SortOption};

    fn page(count: usize, total: usize) -> ProductPage {
        let products = (0..count)
            .map(|i| Product::new(i as i64, format!("Shoe {}", i), "Shoes", Price::from_cents(4999)))
            .collect();
        ProductPage::new(products, total)
    }

    fn shoes_state() -> ListingState {
        let mut state = ListingState::new(12);
        state.begin_navigate(Some("shoes"));
        let directory = CategoryDirectory::from_categories(vec![Category::new(1, "Shoes", "shoes")]);
        let ticket = state.resolve(&directory).unwrap();
        state.apply_page(&ticket, page(12, 40));
        state
    }

    #[test]
    fn test_loading_until_first_page() {
        let mut state = ListingState::new(12);
        state.begin_navigate(Some("shoes"));
        assert!(ListingView::from_state(&state, "ShopSphere").is_loading());

        let mut state = ListingState::new(12);
        state.begin_navigate(None);
        assert!(ListingView::from_state(&state, "ShopSphere").is_loading());
    }

    #[test]
    fn test_category_listing() {
        let state = shoes_state();
        let view = ListingView::from_state(&state, "ShopSphere");
        let listing = view.listing().unwrap();

        assert_eq!(listing.title, "Shoes");
        assert_eq!(listing.page_title.as_deref(), Some("Shoes | ShopSphere"));
        assert_eq!(listing.summary.as_deref(), Some("Showing 12 of 40 results"));
        assert!(listing.show_load_more);
        assert_eq!(listing.empty_message, None);
        assert_eq!(listing.sort, None);
    }

    #[test]
    fn test_loading_more_keeps_listing_visible() {
        let mut state = shoes_state();
        state.begin_load_more().unwrap();
        let view = ListingView::from_state(&state, "ShopSphere");
        let listing = view.listing().unwrap();
        assert_eq!(listing.status, LoadStatus::Loading);
        assert_eq!(listing.shown, 12);
    }

    #[test]
    fn test_empty_all_categories() {
        let mut state = ListingState::new(12);
        let ticket = state.begin_navigate(None).unwrap();
        state.apply_page(&ticket, page(0, 0));

        let view = ListingView::from_state(&state, "ShopSphere");
        let listing = view.listing().unwrap();
        assert_eq!(listing.title, ALL_CATEGORIES_TITLE);
        assert_eq!(listing.page_title, None);
        assert_eq!(listing.empty_message, Some(EMPTY_MESSAGE));
        assert_eq!(listing.summary, None);
        assert!(!listing.show_load_more);
    }

    #[test]
    fn test_sort_label_and_error_flag() {
        let mut state = ListingState::new(12);
        state.begin_navigate(None);
        let ticket = state.set_sort(Some(SortOption::PRICE_HIGH_LOW)).unwrap();
        state.apply_error(&ticket, "Request timed out");

        let view = ListingView::from_state(&state, "ShopSphere");
        let listing = view.listing().unwrap();
        assert_eq!(listing.sort, Some("Price: High - Low"));
        assert_eq!(listing.error.as_deref(), Some("Request timed out"));
        assert_eq!(listing.status, LoadStatus::Error);
    }

    #[test]
    fn test_not_found() {
        let mut state = ListingState::new(12);
        state.begin_navigate(Some("hats"));
        state.resolve(&CategoryDirectory::from_categories(Vec::new()));
        let view = ListingView::from_state(&state, "ShopSphere");
        assert_eq!(view, ListingView::NotFound { slug: "hats".to_string() });

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["state"], "notFound");
    }
}
