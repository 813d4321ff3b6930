//! Queledoy Client - REST client and wishlist state for the storefront.
//!
//! Layers, bottom-up:
//!
//! - [`http`] - Sends JSON requests with the session's bearer token and
//!   classifies every failure into an [`ApiError`]
//! - [`normalize`] - Maps the backend's field spellings onto core types
//! - [`lists`] - [`ListsRepository`] (pass-through endpoints) and
//!   [`ListsManager`] (the observable, session-aware collection)
//! - [`catalog`] - Product fetching and client-side filtering
//! - [`auth`] - Login and registration
//! - [`admin`] - Role-gated product, category and user management
//!
//! A [`Session`] is shared by all of them; [`Storefront`] wires everything
//! together for a front end.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use queledoy_client::{ClientConfig, Storefront};
//! use secrecy::SecretString;
//!
//! let storefront = Storefront::new(&ClientConfig::from_env()?)?;
//! storefront
//!     .auth
//!     .login("ana@example.com", &SecretString::from("hunter2"))
//!     .await?;
//!
//! storefront.lists.load().await;
//! let list = storefront.lists.create("Birthday", "Ideas for Ana").await?;
//! println!("{} has {} products", list.name, list.product_count());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod lists;
pub mod normalize;
pub mod session;
pub mod storefront;

pub use admin::{AdminClient, ProductDraft, UserDraft};
pub use auth::AuthClient;
pub use catalog::{CatalogClient, CatalogQuery, SortOrder, categories, filter_products};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorKind, Operation, OperationError};
pub use http::HttpClient;
pub use lists::{ListDraft, ListsManager, ListsRepository, ListsSnapshot, LoadState};
pub use session::{Session, SessionId, SessionState};
pub use storefront::Storefront;
