//! Core types for Queledoy.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod list;
pub mod price;
pub mod product;
pub mod role;
pub mod user;

pub use category::Category;
pub use email::{Email, EmailError};
pub use id::*;
pub use list::List;
pub use price::{CurrencyCode, Price};
pub use product::{DEFAULT_CATEGORY, Product};
pub use role::Role;
pub use user::User;
