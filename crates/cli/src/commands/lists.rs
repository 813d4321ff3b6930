//! Wishlist commands.
//!
//! Every command signs in, loads the user's lists and then runs against the
//! lists manager, so the output reflects exactly what a front end would show.
//!
//! # Usage
//!
//! ```bash
//! export QUELEDOY_EMAIL=ana@example.com QUELEDOY_PASSWORD=...
//!
//! queledoy lists
//! queledoy create "Birthday" --description "Ideas for Ana"
//! queledoy add 7 42
//! queledoy containing 42
//! ```

use secrecy::SecretString;

use queledoy_client::{LoadState, Storefront};
use queledoy_core::{List, ListId, ProductId};

use super::CommandError;
use super::catalog::print_products;

/// Account used by list commands.
#[derive(Debug, Default)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

/// Sign in and load the user's lists.
///
/// # Errors
///
/// Fails if credentials are missing, login fails, or the lists cannot be
/// loaded.
pub async fn sign_in(storefront: &Storefront, credentials: &Credentials) -> Result<(), CommandError> {
    let (Some(email), Some(password)) = (&credentials.email, &credentials.password) else {
        return Err(CommandError::MissingCredentials);
    };

    let user = storefront.auth.login(email, password).await?;
    tracing::debug!(user_id = %user.id, "Signed in");

    storefront.lists.load().await;
    if storefront.lists.state() == LoadState::Error {
        let message = storefront
            .lists
            .error()
            .unwrap_or_else(|| "Could not load your lists".to_string());
        return Err(CommandError::LoadFailed(message));
    }
    Ok(())
}

/// Print every list with its product count.
#[allow(clippy::print_stdout)]
pub fn list_all(storefront: &Storefront) {
    let lists = storefront.lists.lists();
    if lists.is_empty() {
        println!("You have no lists yet.");
        return;
    }
    for list in &lists {
        print_summary(list);
    }
}

/// Print one list and its products.
pub async fn show(storefront: &Storefront, id: ListId) -> Result<(), CommandError> {
    if storefront.lists.get(id).is_none() {
        return Err(CommandError::ListNotFound(id));
    }
    let list = storefront.lists.fetch(id).await?;
    print_detail(&list);
    Ok(())
}

pub async fn create(
    storefront: &Storefront,
    name: &str,
    description: &str,
) -> Result<(), CommandError> {
    let list = storefront.lists.create(name, description).await?;
    print_summary(&list);
    Ok(())
}

pub async fn rename(
    storefront: &Storefront,
    id: ListId,
    name: &str,
    description: Option<&str>,
) -> Result<(), CommandError> {
    let current = storefront
        .lists
        .get(id)
        .ok_or(CommandError::ListNotFound(id))?;
    // Keep the description unless a new one was given
    let description = description.unwrap_or(&current.description);

    storefront.lists.update(id, name, description).await?;
    if let Some(list) = storefront.lists.get(id) {
        print_summary(&list);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn delete(storefront: &Storefront, id: ListId) -> Result<(), CommandError> {
    storefront.lists.delete(id).await?;
    println!("Deleted list {id}.");
    Ok(())
}

/// Add a catalog product to a list.
#[allow(clippy::print_stdout)]
pub async fn add(
    storefront: &Storefront,
    list_id: ListId,
    product_id: ProductId,
) -> Result<(), CommandError> {
    let product = match storefront.catalog.product(product_id).await {
        Ok(product) => product,
        Err(queledoy_client::ApiError::NotFound(_)) => {
            return Err(CommandError::ProductNotFound(product_id));
        }
        Err(err) => return Err(err.into()),
    };
    let name = product.name.clone();

    storefront.lists.add_product_to_list(list_id, product).await?;
    println!("Added {name} to list {list_id}.");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn remove(
    storefront: &Storefront,
    list_id: ListId,
    product_id: ProductId,
) -> Result<(), CommandError> {
    storefront
        .lists
        .remove_product_from_list(list_id, product_id)
        .await?;
    println!("Removed product {product_id} from list {list_id}.");
    Ok(())
}

/// Print the lists holding a product.
#[allow(clippy::print_stdout)]
pub fn containing(storefront: &Storefront, product_id: ProductId) {
    let lists = storefront.lists.lists_containing(product_id);
    if lists.is_empty() {
        println!("Product {product_id} is not in any of your lists.");
        return;
    }
    for list in &lists {
        print_summary(list);
    }
}

#[allow(clippy::print_stdout)]
fn print_summary(list: &List) {
    let count = list.product_count();
    let noun = if count == 1 { "product" } else { "products" };
    println!("{:>6}  {} ({count} {noun})", list.id.as_i64(), list.name);
}

#[allow(clippy::print_stdout)]
fn print_detail(list: &List) {
    println!("{} (list {})", list.name, list.id);
    if !list.description.is_empty() {
        println!("{}", list.description);
    }
    println!();
    print_products(&list.products);
}
