//! Canonical product view.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// Category assigned to products that arrive without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// A product as shown in the catalog and stored inside lists.
///
/// This is the canonical shape; upstream payloads use several spellings for
/// each field and are normalized before a `Product` is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Price (zero when the backend has none).
    pub price: Price,
    /// Image URL, if any.
    pub image_url: Option<String>,
    /// Link to the external marketplace listing, if any.
    pub external_link: Option<String>,
    /// Category name.
    pub category: String,
    /// Whether the product is highlighted in the catalog.
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// Create a product with only the required fields set.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image_url: None,
            external_link: None,
            category: DEFAULT_CATEGORY.to_string(),
            featured: false,
        }
    }

    /// The external link as an absolute URL.
    ///
    /// Marketplace links are often stored without a scheme
    /// (`articulo.mercadolibre.cl/...`); those get `https://` prepended.
    #[must_use]
    pub fn external_url(&self) -> Option<String> {
        let link = self.external_link.as_deref()?.trim();
        if link.is_empty() {
            return None;
        }
        if link.starts_with("http://") || link.starts_with("https://") {
            Some(link.to_string())
        } else {
            Some(format!("https://{link}"))
        }
    }
}
