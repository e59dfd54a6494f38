//! CLI command implementations.

pub mod browse;
pub mod categories;
pub mod config;
pub mod db;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use sphere_commerce::price::Price;
use sphere_commerce::search::{FilterState, PriceRange, SortOption};

/// Arguments for the categories command.
#[derive(Args)]
pub struct CategoriesArgs {
    /// Read categories from the database instead of the API.
    #[arg(long)]
    pub from_db: bool,
}

/// Sort and filter flags shared by listing commands.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Sort preset, e.g. "Price: Low - High".
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Only products offered in this size (repeatable).
    #[arg(long = "size")]
    pub sizes: Vec<String>,

    /// Lowest price, in major units.
    #[arg(long)]
    pub min: Option<f64>,

    /// Highest price, in major units.
    #[arg(long)]
    pub max: Option<f64>,
}

impl FilterArgs {
    /// The selected sort preset. Unknown names are rejected.
    pub fn sort_option(&self) -> Result<Option<SortOption>> {
        match self.sort.as_deref() {
            None | Some("") => Ok(None),
            Some(name) => match SortOption::find_by_name(name) {
                Some(option) => Ok(Some(option)),
                None => {
                    let names: Vec<&str> = SortOption::ALL.iter().map(|o| o.name).collect();
                    bail!("Unknown sort {:?}. Choose one of: {}", name, names.join(", "))
                }
            },
        }
    }

    pub fn filter_state(&self) -> Result<FilterState> {
        let mut filters = FilterState::new();
        filters.set_sizes(self.sizes.iter().cloned());
        let min = self.min.map(Price::try_from_major).transpose()?;
        let max = self.max.map(Price::try_from_major).transpose()?;
        filters.set_price_range(PriceRange::new(min, max)?);
        Ok(filters)
    }
}

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Category slug; all categories when omitted.
    pub slug: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Number of pages to load.
    #[arg(short, long, default_value = "1")]
    pub pages: usize,

    /// Keep loading until every product is shown.
    #[arg(long, conflicts_with = "pages")]
    pub all: bool,
}

/// Arguments for the db command.
#[derive(Args)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand)]
pub enum DbCommand {
    /// Connect and count products per category.
    Check,
    /// Run a product search directly against the database.
    Search {
        /// Category slug; all categories when omitted.
        slug: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Products to skip.
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Raw API query string, e.g. "category=Shoes&sortBy=price&orderBy=asc".
        /// Replaces the other search flags.
        #[arg(long, conflicts_with_all = ["slug", "offset"])]
        raw: Option<String>,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Write a default sphere.toml in the current directory.
    Init {
        /// Overwrite an existing file without asking.
        #[arg(short, long)]
        force: bool,

        /// API endpoint to write into the file.
        #[arg(long, default_value = sphere_data::DEFAULT_BASE_URL)]
        base_url: String,
    },
}
