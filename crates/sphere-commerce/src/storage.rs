//! PostgreSQL-backed catalog repository.
//!
//! Answers the product search the storefront issues. Expects a `categories`
//! table (`id`, `name`, `slug`) and a `products` table (`id`, `name`,
//! `category_id`, `price_cents`, `sizes TEXT[]`, `image_url`, `created_at`).

use crate::catalog::{Category, Product};
use crate::error::CommerceError;
use crate::ids::{CategoryId, ProductId};
use crate::price::Price;
use crate::search::{ProductPage, ProductQuery};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sphere_db::{params, Db, Value};
use tracing::debug;

const PRODUCT_COLUMNS: &str = "p.id, p.name, c.name AS category, p.price_cents, p.sizes, \
     p.image_url, p.created_at";

const PRODUCT_FROM: &str = "products p JOIN categories c ON c.id = p.category_id";

#[derive(Debug, Deserialize)]
struct ProductRow {
    id: i64,
    name: String,
    category: String,
    price_cents: i64,
    sizes: Option<Vec<String>>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId::new(row.id),
            name: row.name,
            category: row.category,
            price: Price::from_cents(row.price_cents),
            sizes: row.sizes.unwrap_or_default().into_iter().collect(),
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: i64,
}

/// Catalog queries over a borrowed database connection.
pub struct CatalogRepository<'a> {
    db: &'a Db,
}

impl<'a> CatalogRepository<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// All categories, ordered by name.
    pub async fn list_categories(&self) -> Result<Vec<Category>, CommerceError> {
        let categories = self
            .db
            .query_as("SELECT id, name, slug FROM categories ORDER BY name, id", params![])
            .await?;
        Ok(categories)
    }

    /// Look up a category by slug.
    pub async fn find_category_by_slug(&self, slug: &str) -> Result<Category, CommerceError> {
        self.db
            .query_optional("SELECT id, name, slug FROM categories WHERE slug = $1", params![slug])
            .await?
            .ok_or_else(|| CommerceError::CategoryNotFound(slug.to_string()))
    }

    /// Count products per category, including empty categories.
    pub async fn count_by_category(&self) -> Result<Vec<(CategoryId, String, i64)>, CommerceError> {
        #[derive(Deserialize)]
        struct Row {
            id: i64,
            name: String,
            total: i64,
        }

        let rows: Vec<Row> = self
            .db
            .query_as(
                "SELECT c.id, c.name, COUNT(p.id) AS total \
                 FROM categories c LEFT JOIN products p ON p.category_id = c.id \
                 GROUP BY c.id, c.name ORDER BY c.name",
                params![],
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| (CategoryId::new(r.id), r.name, r.total))
            .collect())
    }

    /// Run a product search: one page plus the total under the same criteria.
    pub async fn search_products(&self, query: &ProductQuery) -> Result<ProductPage, CommerceError> {
        let sql = SearchSql::build(query);
        debug!(sql = %sql.select, offset = query.offset, limit = query.limit, "product search");

        let rows: Vec<ProductRow> = self.db.query_as(&sql.select, &sql.select_params).await?;
        let count: CountRow = self.db.query_one(&sql.count, &sql.count_params).await?;

        let total = usize::try_from(count.total)
            .map_err(|_| CommerceError::DatabaseError(format!("negative count {}", count.total)))?;

        Ok(ProductPage::new(
            rows.into_iter().map(Product::from).collect(),
            total,
        ))
    }
}

/// SQL for one product search.
#[derive(Debug)]
struct SearchSql {
    select: String,
    select_params: Vec<Value>,
    count: String,
    count_params: Vec<Value>,
}

impl SearchSql {
    fn build(query: &ProductQuery) -> Self {
        let (where_clause, params) = where_clause(query);

        let order_by = match &query.sort {
            Some(sort) => format!("p.{}, p.id", sort.to_sql()),
            None => "p.created_at DESC, p.id".to_string(),
        };

        let mut select_params = params.clone();
        let limit_idx = select_params.len() + 1;
        select_params.push(Value::from(query.limit));
        select_params.push(Value::from(query.offset));

        let select = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY {} LIMIT ${} OFFSET ${}",
            PRODUCT_COLUMNS,
            PRODUCT_FROM,
            where_clause,
            order_by,
            limit_idx,
            limit_idx + 1
        );
        let count = format!(
            "SELECT COUNT(*) AS total FROM {} WHERE {}",
            PRODUCT_FROM, where_clause
        );

        Self {
            select,
            select_params,
            count,
            count_params: params,
        }
    }
}

/// Build the WHERE clause shared by the page and count queries.
fn where_clause(query: &ProductQuery) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    let mut push = |clause: &str, value: Value, values: &mut Vec<Value>| {
        values.push(value);
        clauses.push(clause.replace('?', &format!("${}", values.len())));
    };

    if let Some(category) = &query.category {
        push("c.name = ?", Value::from(category), &mut values);
    }
    if let Some(min) = query.price_range.min {
        push("p.price_cents >= ?", Value::from(min.cents()), &mut values);
    }
    if let Some(max) = query.price_range.max {
        push("p.price_cents <= ?", Value::from(max.cents()), &mut values);
    }
    if !query.sizes.is_empty() {
        let sizes: Vec<String> = query.sizes.iter().cloned().collect();
        push("p.sizes && ?::text[]", Value::from(sizes), &mut values);
    }

    if clauses.is_empty() {
        ("TRUE".to_string(), values)
    } else {
        (clauses.join(" AND "), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{FilterState, PriceRange, SortOption};

    #[test]
    fn test_unfiltered_search_sql() {
        let sql = SearchSql::build(&ProductQuery::new(12));
        assert!(sql.select.contains("WHERE TRUE"));
        assert!(sql.select.contains("ORDER BY p.created_at DESC, p.id"));
        assert!(sql.select.ends_with("LIMIT $1 OFFSET $2"));
        assert_eq!(sql.select_params, vec![Value::Integer(12), Value::Integer(0)]);
        assert!(sql.count_params.is_empty());
    }

    #[test]
    fn test_filtered_search_sql() {
        let mut filters = FilterState::new();
        filters.toggle_size("M");
        filters.set_price_range(
            PriceRange::between(Price::from_major(10.0), Price::from_major(50.0)).unwrap(),
        );
        let query = ProductQuery::new(12)
            .with_category(Some("Shirts".to_string()))
            .with_sort(Some(SortOption::PRICE_LOW_HIGH))
            .with_filters(&filters)
            .with_offset(24);

        let sql = SearchSql::build(&query);
        assert!(sql.select.contains(
            "c.name = $1 AND p.price_cents >= $2 AND p.price_cents <= $3 AND p.sizes && $4::text[]"
        ));
        assert!(sql.select.contains("ORDER BY p.price_cents ASC, p.id"));
        assert!(sql.select.ends_with("LIMIT $5 OFFSET $6"));
        assert_eq!(sql.select_params.len(), 6);
        assert_eq!(sql.select_params[4], Value::Integer(12));
        assert_eq!(sql.select_params[5], Value::Integer(24));

        assert!(sql.count.starts_with("SELECT COUNT(*) AS total"));
        assert_eq!(sql.count_params.len(), 4);
        assert_eq!(sql.count_params[0], Value::Text("Shirts".to_string()));
        assert_eq!(sql.count_params[1], Value::Integer(1000));
    }

    #[test]
    fn test_product_row_conversion() {
        let row = ProductRow {
            id: 3,
            name: "Loafer".to_string(),
            category: "Shoes".to_string(),
            price_cents: 7450,
            sizes: None,
            image_url: None,
            created_at: Utc::now(),
        };
        let product = Product::from(row);
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.price.to_string(), "$74.50");
        assert!(product.sizes.is_empty());
    }
}
