//! Admin console: product, category and user management.
//!
//! Every operation checks the session first. Without a signed-in user it
//! fails with [`ApiError::NotAuthenticated`]; with a non-admin user it fails
//! with [`ApiError::Forbidden`]. Neither case sends a request.
//!
//! Product listing is shared with shoppers and lives on
//! [`CatalogClient`](crate::CatalogClient).

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use queledoy_core::{Category, CategoryId, Email, Product, ProductId, User, UserId};

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::normalize;

/// Product fields an admin can set, in the backend's field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    /// Marketplace link shown as "buy here".
    #[serde(rename = "url", skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "descripcion")]
    pub description: String,
    pub stock: u32,
    #[serde(rename = "activo")]
    pub active: bool,
    #[serde(rename = "destacado")]
    pub featured: bool,
}

impl ProductDraft {
    /// An active, non-featured product with no stock or description.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            external_link: None,
            price,
            description: String::new(),
            stock: 0,
            active: true,
            featured: false,
        }
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("product name cannot be empty".to_string()));
        }
        if self.price.is_sign_negative() {
            return Err(ApiError::Validation("price cannot be negative".to_string()));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct CategoryRequest<'a> {
    #[serde(rename = "nombre")]
    name: &'a str,
}

/// Account fields an admin can set.
///
/// The password is required when creating a user. On update, `None` keeps
/// the current password.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub name: String,
    pub email: Email,
    pub password: Option<SecretString>,
    pub active: bool,
}

impl UserDraft {
    /// An active account with no password change.
    #[must_use]
    pub fn new(name: impl Into<String>, email: Email) -> Self {
        Self {
            name: name.into(),
            email,
            password: None,
            active: true,
        }
    }

    #[must_use]
    pub fn with_password(mut self, password: SecretString) -> Self {
        self.password = Some(password);
        self
    }

    fn request(&self) -> Result<UserRequest<'_>, ApiError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("name cannot be empty".to_string()));
        }
        let password = self
            .password
            .as_ref()
            .map(|p| p.expose_secret())
            .filter(|p| !p.is_empty());

        Ok(UserRequest {
            name,
            email: self.email.as_str(),
            password,
            active: self.active,
        })
    }
}

#[derive(Serialize)]
struct UserRequest<'a> {
    #[serde(rename = "nombre")]
    name: &'a str,
    #[serde(rename = "correo")]
    email: &'a str,
    #[serde(rename = "contrasena", skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(rename = "activo")]
    active: bool,
}

/// Catalog and account management for admin users.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: HttpClient,
}

impl AdminClient {
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// The signed-in admin, or the reason the session cannot act as one.
    fn require_admin(&self) -> Result<User, ApiError> {
        let user = self
            .http
            .session()
            .current_user()
            .ok_or(ApiError::NotAuthenticated)?;
        if !user.is_admin() {
            warn!(user_id = %user.id, role = %user.role, "Refused admin operation");
            return Err(ApiError::Forbidden);
        }
        Ok(user)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// `POST /products`.
    ///
    /// # Errors
    ///
    /// Fails without a request if the session is not an admin's or the
    /// draft has an empty name or a negative price. Otherwise returns the
    /// adapter's error or a malformed-payload error.
    #[instrument(skip(self, draft))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        self.require_admin()?;
        draft.validate()?;

        let value = self.http.post("/products", draft).await?;
        let product = normalize::product(&value)?;
        info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    /// `PUT /products/{id}`. Returns `None` when the backend answers with
    /// an empty body.
    ///
    /// # Errors
    ///
    /// Same as [`AdminClient::create_product`]; `ApiError::NotFound` if the
    /// product does not exist.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, ApiError> {
        self.require_admin()?;
        draft.validate()?;

        let value = self.http.put(&format!("/products/{id}"), draft).await?;
        info!("Updated product");
        echoed(&value, normalize::product)
    }

    /// `DELETE /products/{id}`.
    ///
    /// # Errors
    ///
    /// Fails without a request if the session is not an admin's;
    /// `ApiError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.require_admin()?;
        self.http.delete(&format!("/products/{id}")).await?;
        info!("Deleted product");
        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// `GET /categories`.
    ///
    /// # Errors
    ///
    /// Fails without a request if the session is not an admin's. Otherwise
    /// returns the adapter's error or a malformed-payload error.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.require_admin()?;
        let value = self.http.get("/categories").await?;
        normalize::categories(&value)
    }

    /// `POST /categories`.
    ///
    /// # Errors
    ///
    /// An empty name is rejected before any request is sent.
    #[instrument(skip(self))]
    pub async fn create_category(&self, name: &str) -> Result<Category, ApiError> {
        self.require_admin()?;
        let name = category_name(name)?;

        let value = self
            .http
            .post("/categories", &CategoryRequest { name })
            .await?;
        let category = normalize::category(&value)?;
        info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    /// `PUT /categories/{id}`.
    ///
    /// # Errors
    ///
    /// Same as [`AdminClient::create_category`]; `ApiError::NotFound` if the
    /// category does not exist.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: CategoryId,
        name: &str,
    ) -> Result<Option<Category>, ApiError> {
        self.require_admin()?;
        let name = category_name(name)?;

        let value = self
            .http
            .put(&format!("/categories/{id}"), &CategoryRequest { name })
            .await?;
        info!("Updated category");
        echoed(&value, normalize::category)
    }

    /// `DELETE /categories/{id}`.
    ///
    /// # Errors
    ///
    /// Fails without a request if the session is not an admin's.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError> {
        self.require_admin()?;
        self.http.delete(&format!("/categories/{id}")).await?;
        info!("Deleted category");
        Ok(())
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// `GET /users`.
    ///
    /// # Errors
    ///
    /// Fails without a request if the session is not an admin's. Otherwise
    /// returns the adapter's error or a malformed-payload error.
    #[instrument(skip(self))]
    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.require_admin()?;
        let value = self.http.get("/users").await?;
        normalize::users(&value)
    }

    /// `POST /users`. Does not touch the admin's own session.
    ///
    /// # Errors
    ///
    /// An empty name or a missing password is rejected before any request
    /// is sent.
    #[instrument(skip(self, draft))]
    pub async fn create_user(&self, draft: &UserDraft) -> Result<User, ApiError> {
        self.require_admin()?;
        let request = draft.request()?;
        if request.password.is_none() {
            return Err(ApiError::Validation(
                "a password is required for new users".to_string(),
            ));
        }

        let value = self.http.post("/users", &request).await?;
        let user = normalize::user(&value)?;
        info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    /// `PUT /users/{id}`. The password is only sent when the draft has one.
    ///
    /// # Errors
    ///
    /// An empty name is rejected before any request is sent;
    /// `ApiError::NotFound` if the user does not exist.
    #[instrument(skip(self, draft), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        id: UserId,
        draft: &UserDraft,
    ) -> Result<Option<User>, ApiError> {
        self.require_admin()?;
        let request = draft.request()?;

        let value = self.http.put(&format!("/users/{id}"), &request).await?;
        info!("Updated user");
        echoed(&value, normalize::user)
    }

    /// `DELETE /users/{id}`. An admin cannot delete their own account.
    ///
    /// # Errors
    ///
    /// Fails without a request if the session is not an admin's or `id` is
    /// the admin's own.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        let admin = self.require_admin()?;
        if admin.id == id {
            return Err(ApiError::Validation(
                "you cannot delete your own account".to_string(),
            ));
        }

        self.http.delete(&format!("/users/{id}")).await?;
        info!("Deleted user");
        Ok(())
    }
}

fn category_name(name: &str) -> Result<&str, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("category name cannot be empty".to_string()));
    }
    Ok(name)
}

/// Normalize an update response, treating an empty body as "not echoed".
fn echoed<T>(
    value: &Value,
    parse: impl FnOnce(&Value) -> Result<T, ApiError>,
) -> Result<Option<T>, ApiError> {
    if value.is_null() {
        return Ok(None);
    }
    parse(value).map(Some)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_draft_wire_shape() {
        let mut draft = ProductDraft::new("Taza", Decimal::new(499_000, 2));
        draft.external_link = Some("https://example.com/taza".to_string());
        draft.stock = 3;

        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({
                "nombre": "Taza",
                "url": "https://example.com/taza",
                "precio": 4990.0,
                "descripcion": "",
                "stock": 3,
                "activo": true,
                "destacado": false,
            })
        );
    }

    #[test]
    fn test_product_draft_validation() {
        assert!(ProductDraft::new("Taza", Decimal::ZERO).validate().is_ok());
        assert!(ProductDraft::new("  ", Decimal::ONE).validate().is_err());
        assert!(
            ProductDraft::new("Taza", Decimal::NEGATIVE_ONE)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_user_request_omits_missing_password() {
        let draft = UserDraft::new(" Ana ", Email::parse("ana@example.com").unwrap());
        let request = serde_json::to_value(draft.request().unwrap()).unwrap();
        assert_eq!(
            request,
            json!({ "nombre": "Ana", "correo": "ana@example.com", "activo": true })
        );

        let draft = draft.with_password(SecretString::from("hunter2"));
        let request = serde_json::to_value(draft.request().unwrap()).unwrap();
        assert_eq!(request["contrasena"], "hunter2");
    }

    #[test]
    fn test_blank_password_counts_as_none() {
        let draft = UserDraft::new("Ana", Email::parse("ana@example.com").unwrap())
            .with_password(SecretString::from(""));
        assert!(draft.request().unwrap().password.is_none());
    }

    #[test]
    fn test_category_name_is_trimmed_and_required() {
        assert_eq!(category_name(" Cocina ").unwrap(), "Cocina");
        assert!(category_name("   ").is_err());
    }
}
