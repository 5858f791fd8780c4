//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// Avatar path assigned until profile uploads exist.
pub const DEFAULT_AVATAR: &str = "uploads/profile.png";

/// Registered account stored in Firestore.
///
/// `email` is stored lowercased; uniqueness is checked at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Document ID (UUID v4)
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// bcrypt hash; never included in API responses
    pub password_hash: String,
    /// Avatar path
    pub avatar: String,
    /// When the account was created (RFC 3339)
    pub created_at: String,
    /// Last modification timestamp (RFC 3339)
    pub updated_at: String,
}

/// Non-secret user fields returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}
