//! User-created product lists (wishlists).

use serde::{Deserialize, Serialize};

use super::{ListId, Product, ProductId, UserId};

/// A named collection of products kept by a user.
///
/// Product membership is unique by product ID: [`List::insert_product`]
/// refuses duplicates, so a list never holds two entries for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    /// Server-assigned list ID.
    pub id: ListId,
    /// List name (never empty once created).
    pub name: String,
    /// Free-form description, possibly empty.
    pub description: String,
    /// Member products in insertion order.
    pub products: Vec<Product>,
    /// Owner, when the backend reports it.
    pub created_by: Option<UserId>,
}

impl List {
    /// Create an empty list.
    #[must_use]
    pub fn new(id: ListId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            products: Vec::new(),
            created_by: None,
        }
    }

    /// Whether the list contains a product with the given ID.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.products.iter().any(|p| p.id == product_id)
    }

    /// Number of member products.
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Append a product unless one with the same ID is already present.
    ///
    /// Returns `true` if the product was appended.
    pub fn insert_product(&mut self, product: Product) -> bool {
        if self.contains(product.id) {
            return false;
        }
        self.products.push(product);
        true
    }

    /// Remove every entry with the given product ID.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove_product(&mut self, product_id: ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != product_id);
        self.products.len() != before
    }
}
