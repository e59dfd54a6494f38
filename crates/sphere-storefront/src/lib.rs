//! Paged product listing for the ShopSphere storefront.
//!
//! - [`api`]: the [`CatalogApi`] seam and its HTTP implementation
//! - [`state`]: the listing state machine, free of I/O
//! - [`controller`]: [`ListingController`], which runs the state machine
//!   against a catalog
//! - [`view`]: the page a state renders to
//!
//! # Example
//!
//! ```rust,ignore
//! use sphere_storefront::prelude::*;
//!
//! let api = HttpCatalogApi::new(FetchClient::new(ClientConfig::default())?);
//! let mut listing = ListingController::new(api, ListingConfig::default());
//!
//! listing.navigate(Some("shoes")).await?;
//! if let ListingView::Listing(page) = listing.view() {
//!     println!("{}", page.summary.unwrap_or_default());
//! }
//! ```

pub mod api;
pub mod controller;
pub mod error;
pub mod state;
pub mod view;

pub use api::{CatalogApi, HttpCatalogApi};
pub use controller::{ListingConfig, ListingController, DEFAULT_STORE_NAME};
pub use error::ListingError;
pub use state::{Applied, CategoryContext, FetchTicket, ListingState, LoadStatus};
pub use view::{ListingPage, ListingView};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::api::{CatalogApi, HttpCatalogApi};
    pub use crate::controller::{ListingConfig, ListingController};
    pub use crate::error::ListingError;
    pub use crate::state::{ListingState, LoadStatus};
    pub use crate::view::{ListingPage, ListingView};
    pub use sphere_data::{ClientConfig, FetchClient};
}
