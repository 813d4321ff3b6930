//! HTTP client adapter for the storefront REST backend.
//!
//! Sends JSON requests to the configured base URL, attaches the session's
//! bearer token when there is one, and classifies every failure into an
//! [`ApiError`]. Nothing is retried and nothing is cached.

use std::sync::Arc;

use reqwest::{Method, StatusCode, header};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::Session;

/// Longest server message (in characters) carried into an error.
const MAX_MESSAGE_CHARS: usize = 200;

/// Client for the storefront REST API.
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

#[derive(Debug)]
struct HttpClientInner {
    client: reqwest::Client,
    base_url: String,
    session: Session,
}

impl HttpClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the underlying HTTP client cannot be
    /// built (e.g. the TLS backend fails to initialize).
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Transport {
                status: None,
                message: format!("could not initialize the HTTP client: {e}"),
            })?;

        Ok(Self {
            inner: Arc::new(HttpClientInner {
                client,
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
                session,
            }),
        })
    }

    /// The session whose token this client sends.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request::<()>(Method::GET, path, None).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn put<B>(&self, path: &str, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request::<()>(Method::DELETE, path, None).await
    }

    /// Send a request and return the decoded JSON body.
    ///
    /// An empty 2xx body decodes to `Value::Null`.
    ///
    /// # Errors
    ///
    /// - `ApiError::Transport` with no status for network failures and timeouts
    /// - `ApiError::NotFound` for 404
    /// - `ApiError::Server` for 5xx and for 2xx bodies that are not JSON
    /// - `ApiError::Transport` with the status for any other non-2xx answer
    #[instrument(skip(self, body), fields(method = %method, path = %path))]
    pub async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{path}", self.inner.base_url);

        let mut request = self
            .inner
            .client
            .request(method, &url)
            .header(header::ACCEPT, "application/json");

        if let Some(token) = self.inner.session.current_token() {
            request = request.bearer_auth(token.expose_secret());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            let err = classify_transport_error(&e);
            warn!(error = %e, "Request did not reach the server");
            err
        })?;

        let status = response.status();

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await.map_err(|e| {
            let err = classify_transport_error(&e);
            warn!(error = %e, status = %status, "Failed to read response body");
            err
        })?;

        if !status.is_success() {
            let err = classify_status(status, &response_text);
            if status.is_server_error() {
                error!(
                    status = %status,
                    body = %truncate(&response_text, 500),
                    "Backend returned a server error"
                );
            } else {
                warn!(status = %status, error = %err, "Backend rejected the request");
            }
            return Err(err);
        }

        if response_text.trim().is_empty() {
            debug!(status = %status, "Request succeeded with empty body");
            return Ok(Value::Null);
        }

        let value = serde_json::from_str(&response_text).map_err(|e| {
            error!(
                error = %e,
                body = %truncate(&response_text, 500),
                "Failed to parse backend response"
            );
            ApiError::malformed(e)
        })?;

        debug!(status = %status, "Request succeeded");
        Ok(value)
    }
}

/// Map a `reqwest` failure (no usable response) to a generic transport error.
fn classify_transport_error(err: &reqwest::Error) -> ApiError {
    let message = if err.is_timeout() {
        "the server took too long to respond"
    } else if err.is_body() || err.is_decode() {
        "the connection was interrupted"
    } else {
        "could not reach the server"
    };

    ApiError::Transport {
        status: None,
        message: message.to_string(),
    }
}

/// Map a non-2xx answer to the error taxonomy.
fn classify_status(status: StatusCode, body: &str) -> ApiError {
    let message = server_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });

    if status == StatusCode::NOT_FOUND {
        ApiError::NotFound(message)
    } else if status.is_server_error() {
        ApiError::Server {
            status: Some(status.as_u16()),
            message,
        }
    } else {
        ApiError::Transport {
            status: Some(status.as_u16()),
            message,
        }
    }
}

/// Extract a human-readable message from an error body.
///
/// Prefers the JSON `message`, `error` or `mensaje` field; falls back to a
/// truncated plain-text body.
fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        return ["message", "error", "mensaje"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(|s| truncate(s, MAX_MESSAGE_CHARS));
    }

    if body.starts_with('<') {
        // HTML error pages carry nothing worth showing
        return None;
    }

    Some(truncate(body, MAX_MESSAGE_CHARS))
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_not_found() {
        let err = classify_status(StatusCode::NOT_FOUND, r#"{"message":"Lista no encontrada"}"#);
        assert_eq!(err, ApiError::NotFound("Lista no encontrada".to_string()));
    }

    #[test]
    fn test_classify_server_error() {
        let err = classify_status(StatusCode::BAD_GATEWAY, "");
        assert_eq!(
            err,
            ApiError::Server {
                status: Some(502),
                message: "Bad Gateway".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_client_error_keeps_status() {
        let err = classify_status(StatusCode::UNAUTHORIZED, r#"{"error":"token expired"}"#);
        assert_eq!(
            err,
            ApiError::Transport {
                status: Some(401),
                message: "token expired".to_string(),
            }
        );
    }

    #[test]
    fn test_server_message_prefers_message_field() {
        let body = r#"{"error":"Bad Request","message":"nombre is required"}"#;
        assert_eq!(server_message(body).as_deref(), Some("nombre is required"));
    }

    #[test]
    fn test_server_message_spanish_field() {
        let body = r#"{"mensaje":"Producto no existe"}"#;
        assert_eq!(server_message(body).as_deref(), Some("Producto no existe"));
    }

    #[test]
    fn test_server_message_json_without_message() {
        assert!(server_message(r#"{"status":500}"#).is_none());
    }

    #[test]
    fn test_server_message_plain_text_is_truncated() {
        let body = "x".repeat(1000);
        assert_eq!(server_message(&body).map(|m| m.len()), Some(MAX_MESSAGE_CHARS));
    }

    #[test]
    fn test_server_message_ignores_html() {
        assert!(server_message("<html><body>502</body></html>").is_none());
        assert!(server_message("   ").is_none());
    }
}
