//! Database commands.

use anyhow::{Context as _, Result};
use serde::Serialize;
use sphere_commerce::search::{ProductPage, ProductQuery};
use sphere_commerce::storage::CatalogRepository;
use sphere_db::Db;
use url::form_urlencoded;

use super::{DbArgs, DbCommand, FilterArgs};
use crate::context::Context;

/// Run the db command.
pub async fn run(args: DbArgs, ctx: &Context) -> Result<()> {
    let config = ctx.config.db_config()?;
    ctx.output.debug(&format!("TLS: {}", if config.ssl { "on" } else { "off" }));
    let spinner = ctx.output.spinner("Connecting to database...");
    let db = Db::connect(&config).await;
    spinner.finish_and_clear();
    let db = db.context("Failed to connect to the database")?;

    let result = execute(args.command, &db, ctx).await;
    db.close().await?;
    result
}

async fn execute(command: DbCommand, db: &Db, ctx: &Context) -> Result<()> {
    match command {
        DbCommand::Check => check(db, ctx).await,
        DbCommand::Search {
            slug,
            filters,
            offset,
            raw,
        } => {
            let query = match raw {
                Some(raw) => parse_raw_query(&raw)?,
                None => build_query(db, slug.as_deref(), &filters, offset, ctx).await?,
            };
            search(db, &query, ctx).await
        }
    }
}

#[derive(Serialize)]
struct CategoryCount {
    id: i64,
    name: String,
    products: i64,
}

async fn check(db: &Db, ctx: &Context) -> Result<()> {
    let counts: Vec<CategoryCount> = CatalogRepository::new(db)
        .count_by_category()
        .await?
        .into_iter()
        .map(|(id, name, products)| CategoryCount {
            id: id.get(),
            name,
            products,
        })
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "connected": true, "categories": counts }));
        return Ok(());
    }

    ctx.output.success("Database connection OK");
    ctx.output.header("Products per category");
    if counts.is_empty() {
        ctx.output.info("No categories found.");
    }
    for count in &counts {
        ctx.output.kv(&count.name, &count.products.to_string());
    }
    Ok(())
}

async fn build_query(
    db: &Db,
    slug: Option<&str>,
    filters: &FilterArgs,
    offset: usize,
    ctx: &Context,
) -> Result<ProductQuery> {
    let category = match slug {
        Some(slug) => Some(CatalogRepository::new(db).find_category_by_slug(slug).await?.name),
        None => None,
    };

    Ok(ProductQuery::new(ctx.config.listing.page_size)
        .with_category(category)
        .with_sort(filters.sort_option()?)
        .with_filters(&filters.filter_state()?)
        .with_offset(offset))
}

/// Parse an API query string the way the catalog endpoint receives it.
fn parse_raw_query(raw: &str) -> Result<ProductQuery> {
    let pairs: Vec<(String, String)> = form_urlencoded::parse(raw.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect();
    ProductQuery::from_query_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .with_context(|| format!("Invalid query string: {}", raw))
}

async fn search(db: &Db, query: &ProductQuery, ctx: &Context) -> Result<()> {
    let page: ProductPage = CatalogRepository::new(db).search_products(query).await?;

    if ctx.output.is_json() {
        ctx.output.json(&page);
        return Ok(());
    }

    ctx.output.header(query.category.as_deref().unwrap_or("All Categories"));
    for product in &page.products {
        ctx.output
            .list_item(&format!("{} ({}) {}", product.name, product.id, product.price));
    }
    ctx.output.info(&format!(
        "Rows {}-{} of {}",
        query.offset + usize::from(!page.is_empty()),
        query.offset + page.len(),
        page.total
    ));
    Ok(())
}
