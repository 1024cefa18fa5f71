//! Database models and types for Quill
//!
//! This module contains the SQLx models for users and posts, plus the
//! tagged unions the store layer uses to stage and return them.

pub mod post;
pub mod user;

pub use post::{NewPost, Post};
pub use user::{NewUser, User};

/// A persisted row of any entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    User(User),
    Post(Post),
}

impl Entity {
    pub fn key(&self) -> EntityKey {
        match self {
            Self::User(user) => EntityKey::User(user.id),
            Self::Post(post) => EntityKey::Post(post.id),
        }
    }

    pub fn into_user(self) -> Option<User> {
        match self {
            Self::User(user) => Some(user),
            Self::Post(_) => None,
        }
    }

    pub fn into_post(self) -> Option<Post> {
        match self {
            Self::Post(post) => Some(post),
            Self::User(_) => None,
        }
    }
}

/// A row waiting for the store to assign its identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewEntity {
    User(NewUser),
    Post(NewPost),
}

impl From<NewUser> for NewEntity {
    fn from(user: NewUser) -> Self {
        Self::User(user)
    }
}

impl From<NewPost> for NewEntity {
    fn from(post: NewPost) -> Self {
        Self::Post(post)
    }
}

/// Identity of a persisted row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    User(i32),
    Post(i32),
}

impl EntityKey {
    /// Name of the backing table
    pub fn table(&self) -> &'static str {
        match self {
            Self::User(_) => "users",
            Self::Post(_) => "posts",
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Self::User(id) | Self::Post(id) => *id,
        }
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.table(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_key_and_projection() {
        let entity = Entity::Post(NewPost::new(3, "t", "c").with_id(9));
        assert_eq!(entity.key(), EntityKey::Post(9));
        assert_eq!(entity.key().to_string(), "posts#9");
        assert!(entity.clone().into_user().is_none());
        assert_eq!(entity.into_post().map(|p| p.user_id), Some(3));
    }
}
