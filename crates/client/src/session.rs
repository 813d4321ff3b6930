//! Authenticated session shared by every client component.
//!
//! Holds the current user and bearer token for the lifetime of a login.
//! Components never read ambient storage: they are handed a [`Session`] and
//! subscribe to it to learn about logins and logouts.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use queledoy_core::User;

/// Identifies one login.
///
/// Every sign-in gets a fresh ID, so responses started under a previous
/// login can be recognised and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of the session as seen by subscribers.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone, Default)]
pub struct SessionState {
    /// Current login, `None` when signed out.
    pub id: Option<SessionId>,
    /// Signed-in user.
    pub user: Option<User>,
    /// Bearer token sent with every request.
    pub token: Option<SecretString>,
}

impl SessionState {
    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.id.is_some()
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("id", &self.id)
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Shared handle to the current session.
///
/// Cloning is cheap; all clones observe the same state.
#[derive(Clone)]
pub struct Session {
    state: Arc<watch::Sender<SessionState>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a signed-out session.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            state: Arc::new(state),
        }
    }

    /// Start a new login, replacing any previous one.
    pub fn sign_in(&self, user: User, token: SecretString) -> SessionId {
        let id = SessionId::generate();
        info!(user_id = %user.id, session_id = %id, "Signed in");
        self.state.send_replace(SessionState {
            id: Some(id),
            user: Some(user),
            token: Some(token),
        });
        id
    }

    /// End the current login. Does nothing (and notifies nobody) when
    /// already signed out.
    pub fn sign_out(&self) {
        let changed = self.state.send_if_modified(|state| {
            if state.id.is_none() {
                return false;
            }
            *state = SessionState::default();
            true
        });
        if changed {
            info!("Signed out");
        }
    }

    /// Bearer token of the current login.
    #[must_use]
    pub fn current_token(&self) -> Option<SecretString> {
        self.state.borrow().token.clone()
    }

    /// Signed-in user.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// ID of the current login.
    #[must_use]
    pub fn current_id(&self) -> Option<SessionId> {
        self.state.borrow().id
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Receive a notification on every login and logout.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}
