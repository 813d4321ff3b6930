//! Queledoy Core - Domain types for the storefront client.
//!
//! Users, products, prices and wishlists in their canonical shape. The
//! client crate normalizes backend payloads into these types at the
//! boundary; nothing here performs I/O or depends on an async runtime.
//!
//! - [`types`] - Newtype IDs, emails, prices, roles, users, products,
//!   categories and lists

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
