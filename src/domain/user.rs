use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, UserFirstName, UserId, UserLastName, UserRole, UserStatus};

/// A registered storefront account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: Email,
    pub first_name: UserFirstName,
    pub last_name: UserLastName,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: NaiveDateTime,
}

/// Information required to register a new [`UserProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: String,
    pub first_name: UserFirstName,
    pub last_name: UserLastName,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: NaiveDateTime,
}

impl UserProfile {
    /// Display name shown in the header and admin tables.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
