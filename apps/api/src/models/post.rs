//! Post model for Quill

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Post record from the posts table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Post {
    /// Store-assigned identifier
    pub id: i32,

    /// Post title
    pub title: String,

    /// Post body
    pub content: String,

    /// Owning user (foreign key to users.id)
    pub user_id: i32,
}

/// Post creation input
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub user_id: i32,
}

impl NewPost {
    pub fn new(user_id: i32, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            user_id,
        }
    }

    pub fn with_id(self, id: i32) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            user_id: self.user_id,
        }
    }
}
