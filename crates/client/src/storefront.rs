//! One-stop wiring of every client component around a shared session.

use crate::admin::AdminClient;
use crate::auth::AuthClient;
use crate::catalog::CatalogClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpClient;
use crate::lists::ListsManager;
use crate::session::Session;

/// Everything a front end needs, sharing one session and connection pool.
#[derive(Debug, Clone)]
pub struct Storefront {
    pub session: Session,
    pub http: HttpClient,
    pub auth: AuthClient,
    pub catalog: CatalogClient,
    pub lists: ListsManager,
    pub admin: AdminClient,
}

impl Storefront {
    /// Build the client stack for the configured backend with a fresh,
    /// signed-out session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let session = Session::new();
        let http = HttpClient::new(config, session.clone())?;

        Ok(Self {
            auth: AuthClient::new(http.clone()),
            catalog: CatalogClient::new(http.clone()),
            lists: ListsManager::from_http(http.clone()),
            admin: AdminClient::new(http.clone()),
            session,
            http,
        })
    }
}
