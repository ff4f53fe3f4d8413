//! Role classification and the fixed role → home-route table.

use serde::{Deserialize, Serialize};

/// Login route, the universal fallback for unauthenticated access.
pub const LOGIN_ROUTE: &str = "/login";

/// Closed role classification. Determines which route subtrees a session
/// may render and the one home route it lands on after sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Store,
    Admin,
}

impl Role {
    /// Map a wire-format role string to a role. Unknown values fall back to
    /// `User`, which only ever widens access to the public subtree.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "STORE" => Self::Store,
            "ADMIN" => Self::Admin,
            _ => Self::User,
        }
    }

    /// The designated home route for this role.
    #[must_use]
    pub fn home_route(self) -> &'static str {
        match self {
            Self::Store => "/store/dashboard",
            Self::Admin => "/admin/dashboard",
            Self::User => "/",
        }
    }
}
