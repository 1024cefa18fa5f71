//! User model for Quill
//!
//! This module contains the database model for user accounts
//! and the input used to create them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum username length accepted by the `users.username` column
pub const USERNAME_MAX_LEN: usize = 45;

/// Maximum email length accepted by the `users.email` column
pub const EMAIL_MAX_LEN: usize = 80;

/// User record from the users table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct User {
    /// Store-assigned identifier
    pub id: i32,

    /// Display name
    pub username: String,

    /// Contact email
    pub email: String,
}

/// User creation input
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }

    /// Materialize the record once the store has assigned an id
    pub fn with_id(self, id: i32) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
        }
    }
}
