//! Catalog commands.
//!
//! # Usage
//!
//! ```bash
//! # Cheapest kitchen products under $10000
//! queledoy products --category Cocina --max-price 10000 --sort price-asc
//!
//! # Every category in the catalog
//! queledoy categories
//! ```

use queledoy_client::{CatalogQuery, Storefront, categories, filter_products};
use queledoy_core::Product;

use super::CommandError;

/// Print the products matching the query.
pub async fn products(storefront: &Storefront, query: &CatalogQuery) -> Result<(), CommandError> {
    let all = storefront.catalog.products().await?;
    let matched = filter_products(&all, query);
    tracing::debug!(total = all.len(), matched = matched.len(), "Filtered catalog");

    print_products(&matched);
    Ok(())
}

/// Print the distinct catalog categories.
pub async fn list_categories(storefront: &Storefront) -> Result<(), CommandError> {
    let all = storefront.catalog.products().await?;
    print_lines(categories(&all));
    Ok(())
}

/// One product per line: ID, name, price, category.
#[allow(clippy::print_stdout)]
pub fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found.");
        return;
    }
    for product in products {
        let marker = if product.featured { " *" } else { "" };
        println!(
            "{:>6}  {}{marker}  {}  [{}]",
            product.id.as_i64(),
            product.name,
            product.price,
            product.category
        );
        if let Some(url) = product.external_url() {
            println!("        {url}");
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}
