//! User model and related functionality

use std::fmt;

use chrono::{DateTime, Utc};
use common::media::DEFAULT_AVATAR;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User entity. The email is the login credential.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    /// Media-root-relative reference, `avatar.svg` when no custom avatar is set
    pub avatar: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Whether the avatar is a file of the user's own, not the shared default
    pub fn has_custom_avatar(&self) -> bool {
        !self.avatar.is_empty() && self.avatar != DEFAULT_AVATAR
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

/// New user registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

/// Row about to be inserted: email normalized, password already hashed
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Profile edit payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub bio: Option<String>,
    /// New avatar reference; an empty string resets to the default avatar
    pub avatar: Option<String>,
}
