//! REST endpoints for lists.

use serde::Serialize;
use tracing::{debug, instrument};

use queledoy_core::{List, ListId, ProductId};

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::normalize;

/// Mutable fields of a list, as sent on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListDraft {
    pub name: String,
    pub description: String,
}

impl ListDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddProductRequest {
    product_id: ProductId,
}

/// Pass-through mapping of list operations to the backend.
///
/// Errors from the HTTP adapter are returned unchanged; responses are
/// normalized before they leave this type.
#[derive(Debug, Clone)]
pub struct ListsRepository {
    http: HttpClient,
}

impl ListsRepository {
    /// Create a repository on top of an HTTP client.
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// `GET /lists`: every list of the signed-in user, in server order.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error, or a malformed-payload error if the
    /// response is not an array of lists.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<List>, ApiError> {
        let value = self.http.get("/lists").await?;
        let lists = normalize::lists(&value)?;
        debug!(count = lists.len(), "Fetched lists");
        Ok(lists)
    }

    /// `GET /lists/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the list does not exist.
    #[instrument(skip(self), fields(list_id = %id))]
    pub async fn fetch_one(&self, id: ListId) -> Result<List, ApiError> {
        let value = self.http.get(&format!("/lists/{id}")).await?;
        normalize::list(&value)
    }

    /// `POST /lists`: returns the created list with its server-assigned ID.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error, or a malformed-payload error if the
    /// response is not a list.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: &ListDraft) -> Result<List, ApiError> {
        let value = self.http.post("/lists", draft).await?;
        normalize::list(&value)
    }

    /// `PUT /lists/{id}`: replaces name and description.
    ///
    /// Returns the updated list when the backend echoes it back, `None`
    /// when it answers with an empty body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the list does not exist.
    #[instrument(skip(self, draft), fields(list_id = %id))]
    pub async fn update(&self, id: ListId, draft: &ListDraft) -> Result<Option<List>, ApiError> {
        let value = self.http.put(&format!("/lists/{id}"), draft).await?;
        if value.is_null() {
            return Ok(None);
        }
        normalize::list(&value).map(Some)
    }

    /// `DELETE /lists/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the list was already deleted.
    #[instrument(skip(self), fields(list_id = %id))]
    pub async fn delete(&self, id: ListId) -> Result<(), ApiError> {
        self.http.delete(&format!("/lists/{id}")).await?;
        Ok(())
    }

    /// `POST /lists/{id}/products`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the list does not exist.
    #[instrument(skip(self), fields(list_id = %list_id, product_id = %product_id))]
    pub async fn add_product(&self, list_id: ListId, product_id: ProductId) -> Result<(), ApiError> {
        self.http
            .post(
                &format!("/lists/{list_id}/products"),
                &AddProductRequest { product_id },
            )
            .await?;
        Ok(())
    }

    /// `DELETE /lists/{id}/products/{productId}`.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error unchanged.
    #[instrument(skip(self), fields(list_id = %list_id, product_id = %product_id))]
    pub async fn remove_product(
        &self,
        list_id: ListId,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        self.http
            .delete(&format!("/lists/{list_id}/products/{product_id}"))
            .await?;
        Ok(())
    }
}
