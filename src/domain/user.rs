use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{UserId, Username};

/// Registered account. The password hash never leaves the repository layer
/// except for verification during login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: Username,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}
