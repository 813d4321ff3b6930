//! Product catalog: fetching and client-side filtering.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, instrument};

use queledoy_core::{Product, ProductId};

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::normalize;

/// Read-only access to the product catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: HttpClient,
}

impl CatalogClient {
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// `GET /products`: every product, in server order.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error, or a malformed-payload error if the
    /// response is not an array of products.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        let value = self.http.get("/products").await?;
        let products = normalize::products(&value)?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// `GET /products/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        let value = self.http.get(&format!("/products/{id}")).await?;
        normalize::product(&value)
    }
}

/// Catalog ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Featured products first, otherwise server order.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortOrder {
    /// Wire/CLI spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "featured" => Ok(Self::Featured),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "name-asc" => Ok(Self::NameAsc),
            "name-desc" => Ok(Self::NameDesc),
            other => Err(format!(
                "unknown sort order '{other}' (expected featured, price-asc, price-desc, name-asc or name-desc)"
            )),
        }
    }
}

/// Filters applied to the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Case-insensitive substring matched against name and category.
    pub search: Option<String>,
    /// Exact category name; `None` keeps every category.
    pub category: Option<String>,
    /// Upper price bound; ignored unless positive.
    pub max_price: Option<Decimal>,
    pub sort: SortOrder,
}

impl CatalogQuery {
    fn matches(&self, product: &Product, needle: Option<&str>) -> bool {
        if let Some(needle) = needle
            && !product.name.to_lowercase().contains(needle)
            && !product.category.to_lowercase().contains(needle)
        {
            return false;
        }

        if let Some(category) = &self.category
            && product.category != *category
        {
            return false;
        }

        match self.max_price {
            Some(max) if max > Decimal::ZERO => product.price.amount <= max,
            _ => true,
        }
    }
}

/// Apply a query to a product list. Sorting is stable.
#[must_use]
pub fn filter_products(products: &[Product], query: &CatalogQuery) -> Vec<Product> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut matched: Vec<Product> = products
        .iter()
        .filter(|p| query.matches(p, needle.as_deref()))
        .cloned()
        .collect();

    match query.sort {
        SortOrder::Featured => matched.sort_by_key(|p| !p.featured),
        SortOrder::PriceAsc => matched.sort_by(|a, b| a.price.amount.cmp(&b.price.amount)),
        SortOrder::PriceDesc => matched.sort_by(|a, b| b.price.amount.cmp(&a.price.amount)),
        SortOrder::NameAsc => matched.sort_by_cached_key(|p| p.name.to_lowercase()),
        SortOrder::NameDesc => {
            matched.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()));
        }
    }

    matched
}

/// Distinct categories in first-seen order.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !seen.contains(&product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use queledoy_core::Price;

    use super::*;

    fn product(id: i64, name: &str, price: i64, category: &str, featured: bool) -> Product {
        let mut p = Product::new(
            ProductId::new(id),
            name,
            Price::from_amount(Decimal::new(price, 0)),
        );
        p.category = category.to_string();
        p.featured = featured;
        p
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Taza cerámica", 5000, "Cocina", false),
            product(2, "Audífonos", 25000, "Tecnología", true),
            product(3, "Cuaderno", 3000, "Papelería", false),
            product(4, "Parlante", 40000, "Tecnología", true),
        ]
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id.as_i64()).collect()
    }

    #[test]
    fn test_default_query_puts_featured_first_stably() {
        let result = filter_products(&catalog(), &CatalogQuery::default());
        assert_eq!(ids(&result), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_search_matches_name_and_category_case_insensitively() {
        let query = CatalogQuery {
            search: Some("TECNO".to_string()),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_products(&catalog(), &query)), vec![2, 4]);

        let query = CatalogQuery {
            search: Some("taza".to_string()),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_products(&catalog(), &query)), vec![1]);
    }

    #[test]
    fn test_blank_search_keeps_everything() {
        let query = CatalogQuery {
            search: Some("   ".to_string()),
            ..CatalogQuery::default()
        };
        assert_eq!(filter_products(&catalog(), &query).len(), 4);
    }

    #[test]
    fn test_max_price_only_applies_when_positive() {
        let query = CatalogQuery {
            max_price: Some(Decimal::new(5000, 0)),
            sort: SortOrder::PriceAsc,
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_products(&catalog(), &query)), vec![3, 1]);

        let query = CatalogQuery {
            max_price: Some(Decimal::ZERO),
            ..CatalogQuery::default()
        };
        assert_eq!(filter_products(&catalog(), &query).len(), 4);
    }

    #[test]
    fn test_category_is_exact() {
        let query = CatalogQuery {
            category: Some("Cocina".to_string()),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&filter_products(&catalog(), &query)), vec![1]);

        let query = CatalogQuery {
            category: Some("cocina".to_string()),
            ..CatalogQuery::default()
        };
        assert!(filter_products(&catalog(), &query).is_empty());
    }

    #[test]
    fn test_sort_orders() {
        let sorted = |sort: SortOrder| {
            ids(&filter_products(
                &catalog(),
                &CatalogQuery {
                    sort,
                    ..CatalogQuery::default()
                },
            ))
        };
        assert_eq!(sorted(SortOrder::PriceDesc), vec![4, 2, 1, 3]);
        assert_eq!(sorted(SortOrder::NameAsc), vec![2, 3, 4, 1]);
        assert_eq!(sorted(SortOrder::NameDesc), vec![1, 4, 3, 2]);
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("price-asc".parse::<SortOrder>().unwrap(), SortOrder::PriceAsc);
        assert_eq!(" Name-Desc ".parse::<SortOrder>().unwrap(), SortOrder::NameDesc);
        assert!("cheapest".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::PriceDesc.to_string(), "price-desc");
    }

    #[test]
    fn test_categories_first_seen_order() {
        assert_eq!(
            categories(&catalog()),
            vec!["Cocina", "Tecnología", "Papelería"]
        );
    }
}
