//! Category listing command.

use anyhow::{Context as _, Result};
use sphere_commerce::catalog::Category;
use sphere_commerce::storage::CatalogRepository;
use sphere_db::Db;
use sphere_storefront::CatalogApi;

use super::CategoriesArgs;
use crate::context::Context;

/// Run the categories command.
pub async fn run(args: CategoriesArgs, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Fetching categories...");
    let categories = if args.from_db {
        from_database(ctx).await
    } else {
        from_api(ctx).await
    };
    spinner.finish_and_clear();
    let categories = categories?;

    if ctx.output.is_json() {
        ctx.output.json(&categories);
        return Ok(());
    }

    ctx.output.header("Categories");
    if categories.is_empty() {
        ctx.output.info("No categories found.");
        return Ok(());
    }

    let widths = [6, 24, 24];
    ctx.output.table_row(&["ID", "NAME", "SLUG"], &widths);
    for category in &categories {
        ctx.output.table_row(
            &[&category.id.to_string(), &category.name, &category.slug],
            &widths,
        );
    }

    Ok(())
}

async fn from_api(ctx: &Context) -> Result<Vec<Category>> {
    let api = ctx.catalog_api()?;
    api.fetch_categories()
        .await
        .with_context(|| format!("Failed to fetch categories from {}", ctx.config.api.base_url))
}

async fn from_database(ctx: &Context) -> Result<Vec<Category>> {
    let db = Db::connect(&ctx.config.db_config()?)
        .await
        .context("Failed to connect to the database")?;
    let categories = CatalogRepository::new(&db).list_categories().await;
    db.close().await?;
    Ok(categories?)
}
