//! User DTOs exchanged with the Secret Santa service.

use serde::{Deserialize, Serialize};

/// The signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Service-side user identifier.
    pub user_id: String,
    /// Display name.
    pub username: String,
}
