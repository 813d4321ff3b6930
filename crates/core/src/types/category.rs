//! Catalog categories.

use serde::{Deserialize, Serialize};

use super::CategoryId;

/// A product category, as managed from the admin console.
///
/// Products only carry the category name; this is the backend entity
/// behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    #[must_use]
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
