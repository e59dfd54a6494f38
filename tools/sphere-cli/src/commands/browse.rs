//! Product listing command.

use anyhow::{bail, Result};
use sphere_commerce::catalog::Product;
use sphere_commerce::search::{FilterState, SortOption};
use sphere_storefront::{CatalogApi, ListingController, ListingError, ListingPage, ListingView};
use tracing::debug;

use super::BrowseArgs;
use crate::context::Context;
use crate::output::status_badge;

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let sort = args.filters.sort_option()?;
    let filters = args.filters.filter_state()?;

    ctx.output.debug(&format!("API: {}", ctx.config.api.base_url));
    let api = ctx.catalog_api()?;
    let mut listing = ListingController::new(api, ctx.config.listing_config());

    let spinner = ctx.output.spinner("Loading products...");
    let result = load(&mut listing, &args, sort, filters).await;
    spinner.finish_and_clear();

    let view = listing.view();
    if ctx.output.is_json() {
        ctx.output.json(&view);
    } else {
        render(&view, ctx);
    }

    match (result, &view) {
        (_, ListingView::NotFound { slug }) => bail!("No category with slug {:?}", slug),
        (Err(e), _) => Err(e.into()),
        (Ok(()), _) => Ok(()),
    }
}

async fn load<A: CatalogApi>(
    listing: &mut ListingController<A>,
    args: &BrowseArgs,
    sort: Option<SortOption>,
    filters: FilterState,
) -> Result<(), ListingError> {
    listing.navigate_with(args.slug.as_deref(), sort, filters).await?;
    if listing.view().is_not_found() {
        return Ok(());
    }

    let mut loaded = 1;
    while listing.state().has_more() && (args.all || loaded < args.pages) {
        listing.load_more().await?;
        loaded += 1;
    }
    debug!(pages = loaded, "listing loaded");
    Ok(())
}

fn render(view: &ListingView, ctx: &Context) {
    match view {
        ListingView::Loading => ctx.output.info("Still loading."),
        ListingView::NotFound { slug } => ctx.output.warn(&format!("Page not found: {}", slug)),
        ListingView::Listing(page) => render_listing(page, ctx),
    }
}

fn render_listing(page: &ListingPage, ctx: &Context) {
    ctx.output.header(page.page_title.as_deref().unwrap_or(&page.title));
    if let Some(sort) = page.sort {
        ctx.output.kv("sort", sort);
    }
    ctx.output.kv("status", &status_badge(page.status));
    if let Some(error) = &page.error {
        ctx.output.warn(error);
    }

    if let Some(message) = page.empty_message {
        ctx.output.info(message);
    }

    let widths = [6, 32, 10, 12];
    if !page.products.is_empty() {
        ctx.output.table_row(&["ID", "NAME", "PRICE", "SIZES"], &widths);
    }
    for product in &page.products {
        ctx.output.table_row(
            &[
                &product.id.to_string(),
                &product.name,
                &product.price.display(),
                &sizes(product),
            ],
            &widths,
        );
    }

    if let Some(summary) = &page.summary {
        ctx.output.info(summary);
    }
    if page.show_load_more {
        ctx.output.info("More available: rerun with --pages or --all.");
    }
}

fn sizes(product: &Product) -> String {
    product.sizes.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}
