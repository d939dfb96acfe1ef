use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{UserEmail, UserId, UserName};

/// A stored login account.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: UserEmail,
    pub name: Option<UserName>,
    pub role: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to create or replace a login account.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: UserEmail,
    pub name: Option<UserName>,
    pub role: Option<String>,
    pub password_hash: String,
}

impl NewUser {
    #[must_use]
    pub fn new(
        email: UserEmail,
        name: Option<UserName>,
        role: Option<String>,
        password_hash: String,
    ) -> Self {
        Self {
            email,
            name,
            role: role
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            password_hash,
        }
    }
}
