//! Error types shared by every client layer.
//!
//! The HTTP adapter classifies raw outcomes into [`ApiError`]; repositories
//! pass them through unchanged; the lists state manager wraps them in an
//! [`OperationError`] that names the failed operation and renders a message
//! suitable for showing to the user.

use thiserror::Error;

/// Broad failure category, used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected locally before any network call.
    Validation,
    /// No usable response: network failure, timeout, or a non-2xx status
    /// that is neither 404 nor 5xx. The user may retry.
    Transport,
    /// The entity no longer exists on the server.
    NotFound,
    /// 5xx or a malformed payload.
    Server,
    /// No session, a session without the needed role, or the session
    /// changed while the request was in flight.
    Session,
}

/// Errors produced by the REST client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Input rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// The request did not produce a usable response.
    #[error("request failed{}: {message}", status_suffix(.status))]
    Transport {
        /// HTTP status, when the server did answer.
        status: Option<u16>,
        /// Server-supplied or generic message.
        message: String,
    },

    /// The server answered 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server failed (5xx) or sent a payload we cannot read.
    #[error("server error{}: {message}", status_suffix(.status))]
    Server {
        /// HTTP status, absent for malformed payloads.
        status: Option<u16>,
        /// Server-supplied or parse error message.
        message: String,
    },

    /// The operation requires a signed-in user.
    #[error("you need to sign in first")]
    NotAuthenticated,

    /// Signed in, but the account lacks the role the operation needs.
    #[error("this action requires an admin account")]
    Forbidden,

    /// The session ended or changed before the response arrived.
    #[error("the session changed before the request completed")]
    SessionChanged,
}

impl ApiError {
    /// Build the error used for responses that cannot be understood.
    pub fn malformed(detail: impl std::fmt::Display) -> Self {
        Self::Server {
            status: None,
            message: format!("malformed response: {detail}"),
        }
    }

    /// The taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Server { .. } => ErrorKind::Server,
            Self::NotAuthenticated | Self::Forbidden | Self::SessionChanged => ErrorKind::Session,
        }
    }

    /// Whether the user can reasonably try again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::Server)
    }

    /// HTTP status attached to the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } | Self::Server { status, .. } => *status,
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Lists operations, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Load,
    Fetch,
    Create,
    Update,
    Delete,
    AddProduct,
    RemoveProduct,
}

impl Operation {
    /// Human-readable prefix for a failure of this operation.
    #[must_use]
    pub const fn failure_message(&self) -> &'static str {
        match self {
            Self::Load => "Could not load your lists",
            Self::Fetch => "Could not load the list",
            Self::Create => "Could not create the list",
            Self::Update => "Could not update the list",
            Self::Delete => "Could not delete the list",
            Self::AddProduct => "Could not add the product to the list",
            Self::RemoveProduct => "Could not remove the product from the list",
        }
    }
}

/// A failed lists operation.
///
/// `Display` gives the message presentation layers show to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}: {source}", .operation.failure_message())]
pub struct OperationError {
    /// The operation that failed.
    pub operation: Operation,
    /// Why it failed.
    pub source: ApiError,
}

impl OperationError {
    /// Wrap an [`ApiError`] for the given operation.
    #[must_use]
    pub const fn new(operation: Operation, source: ApiError) -> Self {
        Self { operation, source }
    }

    /// The taxonomy kind of the underlying error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}
