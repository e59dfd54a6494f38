//! Catalog API seam.
//!
//! The listing controller talks to the catalog through [`CatalogApi`], so it
//! can run against the HTTP endpoint or an in-memory catalog in tests.

use async_trait::async_trait;
use sphere_commerce::catalog::Category;
use sphere_commerce::search::{ProductPage, ProductQuery};
use sphere_data::{FetchClient, FetchError};
use std::sync::Arc;
use tracing::debug;

/// Path of the category list endpoint.
pub const CATEGORIES_PATH: &str = "/api/categories";

/// Path of the product search endpoint.
pub const PRODUCTS_PATH: &str = "/api/products";

/// Remote catalog operations the storefront depends on.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Every category, for slug resolution.
    async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError>;

    /// One page of products matching the query, plus the total match count.
    async fn search_products(&self, query: &ProductQuery) -> Result<ProductPage, FetchError>;
}

#[async_trait]
impl<T: CatalogApi + ?Sized> CatalogApi for Arc<T> {
    async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
        (**self).fetch_categories().await
    }

    async fn search_products(&self, query: &ProductQuery) -> Result<ProductPage, FetchError> {
        (**self).search_products(query).await
    }
}

/// [`CatalogApi`] over the ShopSphere HTTP API.
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    client: FetchClient,
}

impl HttpCatalogApi {
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
        let categories: Vec<Category> = self
            .client
            .get(CATEGORIES_PATH)
            .send()
            .await?
            .error_for_status()?
            .json()?;

        debug!(count = categories.len(), "fetched categories");
        Ok(categories)
    }

    async fn search_products(&self, query: &ProductQuery) -> Result<ProductPage, FetchError> {
        let page: ProductPage = self
            .client
            .get(PRODUCTS_PATH)
            .query(query.to_query_pairs())
            .send()
            .await?
            .error_for_status()?
            .json()?;

        debug!(
            offset = query.offset,
            received = page.len(),
            total = page.total,
            "fetched products"
        );
        Ok(page)
    }
}
