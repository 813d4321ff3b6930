//! User domain type.

use serde::{Deserialize, Serialize};

use super::{Email, Role, UserId};

/// An authenticated storefront user.
///
/// Owned by the session; everything else only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID (assigned by the backend).
    pub id: UserId,
    /// Name shown in the navigation bar.
    pub display_name: String,
    /// User's email address.
    pub email: Email,
    /// Permission level.
    pub role: Role,
}

impl User {
    /// Whether this user can use the admin console.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
