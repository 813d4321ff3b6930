//! User lists (wishlists).
//!
//! - [`ListsRepository`] maps list operations onto REST endpoints.
//! - [`ListsManager`] keeps the signed-in user's lists in memory and patches
//!   them after each confirmed mutation.

mod manager;
mod repository;

pub use manager::{ListsManager, ListsSnapshot, LoadState};
pub use repository::{ListDraft, ListsRepository};
