//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User document stored in Firestore.
///
/// The argon2 hash never leaves the backend; listing endpoints return
/// [`UserSummary`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Document id (also used as the Firestore document name)
    pub id: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address (unique at registration time)
    pub email: String,
    /// Argon2 PHC-format password hash
    pub password_hash: String,
    /// Profile picture URL
    pub profile_picture: Option<String>,
    /// When the user registered (RFC 3339)
    pub created_at: String,
}

/// User as returned by the API, without the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub created_at: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            profile_picture: user.profile_picture,
            created_at: user.created_at,
        }
    }
}
