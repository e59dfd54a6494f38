//! Product search query.

use crate::error::CommerceError;
use crate::search::{FilterState, PriceRange, SortOption};
use std::collections::BTreeSet;

/// Default number of products per page.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Upper bound on a single page.
pub const MAX_PAGE_SIZE: usize = 100;

/// One request to the product search endpoint.
///
/// The criteria (category, sort, price range, sizes) select the product set;
/// `offset` and `limit` select a page of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// Category name, or `None` for all categories.
    pub category: Option<String>,
    pub sort: Option<SortOption>,
    pub price_range: PriceRange,
    pub sizes: BTreeSet<String>,
    pub offset: usize,
    pub limit: usize,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ProductQuery {
    /// Create a query for the first page of all products.
    pub fn new(limit: usize) -> Self {
        Self {
            category: None,
            sort: None,
            price_range: PriceRange::unbounded(),
            sizes: BTreeSet::new(),
            offset: 0,
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Restrict to a category. Empty names mean all categories.
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category.filter(|c| !c.is_empty());
        self
    }

    pub fn with_sort(mut self, sort: Option<SortOption>) -> Self {
        self.sort = sort;
        self
    }

    /// Copy the price range and sizes from the listing filters.
    pub fn with_filters(mut self, filters: &FilterState) -> Self {
        self.price_range = filters.price_range;
        self.sizes = filters.sizes.clone();
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Query parameters for `GET /api/products`. Empty values are omitted.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sortBy", sort.field.as_str().to_string()));
            pairs.push(("orderBy", sort.direction.as_str().to_string()));
        }
        if let Some(range) = self.price_range.to_wire() {
            pairs.push(("priceRange", range));
        }
        if !self.sizes.is_empty() {
            let sizes: Vec<&str> = self.sizes.iter().map(String::as_str).collect();
            pairs.push(("sizes", sizes.join(",")));
        }
        pairs.push(("offset", self.offset.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }

    /// Rebuild a query from request parameters, as the catalog API receives them.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Result<Self, CommerceError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = Self::default();
        let mut sort_by = "";
        let mut order_by = "";

        for (key, value) in pairs {
            match key {
                "category" => query.category = Some(value.to_string()).filter(|c| !c.is_empty()),
                "sortBy" => sort_by = value,
                "orderBy" => order_by = value,
                "priceRange" => query.price_range = PriceRange::from_wire(value)?,
                "sizes" => {
                    query.sizes = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                }
                "offset" => query.offset = parse_count(key, value)?,
                "limit" => query.limit = parse_count(key, value)?.clamp(1, MAX_PAGE_SIZE),
                _ => {}
            }
        }

        query.sort = SortOption::from_wire(sort_by, order_by)?;
        Ok(query)
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize, CommerceError> {
    value
        .trim()
        .parse()
        .map_err(|_| CommerceError::ValidationError(format!("{} must be a count: {:?}", key, value)))
}
