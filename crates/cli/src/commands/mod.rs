//! Command implementations.
//!
//! Each command prints its result to stdout and returns a [`CommandError`]
//! on failure; `main` logs it and exits with status 1.

pub mod catalog;
pub mod lists;

use queledoy_client::{ApiError, ConfigError, OperationError};
use queledoy_core::{ListId, ProductId};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A direct backend call failed (login, catalog).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A lists operation failed.
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// List commands need an account.
    #[error(
        "missing credentials: pass --email and --password or set QUELEDOY_EMAIL and QUELEDOY_PASSWORD"
    )]
    MissingCredentials,

    /// `load()` ended in the error state.
    #[error("{0}")]
    LoadFailed(String),

    /// The list is not among the user's lists.
    #[error("list {0} not found")]
    ListNotFound(ListId),

    /// The product is not in the catalog.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),
}
