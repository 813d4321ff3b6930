//! User roles.

use serde::{Deserialize, Serialize};

/// Role of a storefront user.
///
/// Admins can manage the catalog; customers can only browse and keep lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to the admin console (products, users, categories).
    Admin,
    /// Regular shopper.
    #[default]
    Customer,
}

impl Role {
    /// Parse a role as sent by the backend.
    ///
    /// The backend is inconsistent about casing and language, so anything
    /// that is not recognisably an admin role is treated as a customer.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrador" | "administrator" | "role_admin" => Self::Admin,
            _ => Self::Customer,
        }
    }

    /// Whether this role grants admin access.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Customer => write!(f, "customer"),
        }
    }
}
