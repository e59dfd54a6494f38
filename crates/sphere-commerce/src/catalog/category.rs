//! Category types for product organization.

use crate::error::CommerceError;
use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A product category, addressed externally by its slug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Display name; also the value products carry in their `category` field.
    #[serde(alias = "category")]
    pub name: String,
    /// URL-friendly slug.
    pub slug: String,
}

impl Category {
    /// Create a new category.
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
        }
    }

    /// Derive a slug from a display name ("Summer Dresses" -> "summer-dresses").
    pub fn slugify(name: &str) -> String {
        let mut slug = String::with_capacity(name.len());
        let mut pending_dash = false;
        for c in name.chars() {
            if c.is_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.extend(c.to_lowercase());
            } else {
                pending_dash = true;
            }
        }
        slug
    }
}

/// The set of categories known to the storefront.
///
/// The directory starts out unloaded. A slug can only be resolved once the
/// directory has been loaded; a loaded directory that lacks the slug means the
/// browsing context does not exist.
#[derive(Debug, Clone, Default)]
pub struct CategoryDirectory {
    categories: Vec<Category>,
    loaded: bool,
}

impl CategoryDirectory {
    /// Create an empty, unloaded directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory that is already loaded with the given categories.
    pub fn from_categories(categories: Vec<Category>) -> Self {
        Self {
            categories,
            loaded: true,
        }
    }

    /// Replace the contents with a freshly fetched category list.
    pub fn load(&mut self, categories: Vec<Category>) {
        debug!(count = categories.len(), "category directory loaded");
        self.categories = categories;
        self.loaded = true;
    }

    /// Whether the directory has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Look up a category by slug.
    pub fn find_by_slug(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    /// Resolve a slug to its category, failing if it is unknown.
    pub fn resolve(&self, slug: &str) -> Result<&Category, CommerceError> {
        self.find_by_slug(slug)
            .ok_or_else(|| CommerceError::CategoryNotFound(slug.to_string()))
    }

    /// Iterate over the categories.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
