//! Login and registration against the REST backend.
//!
//! A successful call signs the shared [`Session`] in, which is what every
//! other component (and the lists manager's `follow_session` task) reacts to.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use queledoy_core::{Email, User};

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::normalize;
use crate::session::Session;

/// `POST /auth/login` body, in the backend's field names.
#[derive(Serialize)]
struct LoginRequest<'a> {
    #[serde(rename = "correo")]
    email: &'a str,
    #[serde(rename = "contrasena")]
    password: &'a str,
}

/// `POST /auth/register` body. New accounts start active.
#[derive(Serialize)]
struct RegisterRequest<'a> {
    #[serde(rename = "nombre_usuario")]
    name: &'a str,
    #[serde(rename = "correo_usuario")]
    email: &'a str,
    #[serde(rename = "contrasena_usuario")]
    password: &'a str,
    #[serde(rename = "usuario_activo")]
    active: bool,
}

/// Signs users in and out.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: HttpClient,
}

impl AuthClient {
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// The session this client signs in and out.
    #[must_use]
    pub fn session(&self) -> &Session {
        self.http.session()
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid email or an empty
    /// password (nothing is sent), the adapter's error if the backend
    /// rejects the credentials, or a malformed-payload error if the response
    /// carries no user or no token.
    #[instrument(skip(self, email, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, ApiError> {
        let email = parse_email(email)?;
        require_password(password)?;

        let value = self
            .http
            .post(
                "/auth/login",
                &LoginRequest {
                    email: email.as_str(),
                    password: password.expose_secret(),
                },
            )
            .await?;

        self.start_session(&value)
    }

    /// Create an account and sign in as the new user.
    ///
    /// # Errors
    ///
    /// Same as [`AuthClient::login`], plus `ApiError::Validation` for an
    /// empty name.
    #[instrument(skip(self, name, email, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<User, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("name cannot be empty".to_string()));
        }
        let email = parse_email(email)?;
        require_password(password)?;

        let value = self
            .http
            .post(
                "/auth/register",
                &RegisterRequest {
                    name,
                    email: email.as_str(),
                    password: password.expose_secret(),
                    active: true,
                },
            )
            .await?;

        self.start_session(&value)
    }

    /// Sign out. Subscribers clear their per-user state.
    pub fn logout(&self) {
        self.session().sign_out();
    }

    fn start_session(&self, value: &Value) -> Result<User, ApiError> {
        let user = normalize::user(value)?;
        let Some(token) = normalize::token(value) else {
            warn!(user_id = %user.id, "Auth response carried no token");
            return Err(ApiError::malformed("auth response is missing a token"));
        };

        self.session().sign_in(user.clone(), token);
        info!(user_id = %user.id, role = %user.role, "Authenticated");
        Ok(user)
    }
}

fn parse_email(email: &str) -> Result<Email, ApiError> {
    Email::parse(email).map_err(|e| ApiError::Validation(e.to_string()))
}

fn require_password(password: &SecretString) -> Result<(), ApiError> {
    if password.expose_secret().is_empty() {
        return Err(ApiError::Validation("password cannot be empty".to_string()));
    }
    Ok(())
}
