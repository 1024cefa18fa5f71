//! User GraphQL type
//!
//! This module defines the GraphQL type for users with the posts relationship
//! resolver.

use async_graphql::{Context, Object, Result, ID};

use crate::context::RequestContext;
use crate::error::to_graphql_error;
use crate::graphql::ids::encode_global_id;
use crate::models::{EntityKey, User as DbUser};

use super::post::Post;

/// User exposed via GraphQL
pub struct User {
    inner: DbUser,
}

impl User {
    pub fn new(user: DbUser) -> Self {
        Self { inner: user }
    }
}

impl From<DbUser> for User {
    fn from(user: DbUser) -> Self {
        Self::new(user)
    }
}

#[Object]
impl User {
    /// Store-assigned identifier
    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    /// Opaque id accepted by `node`
    async fn global_id(&self) -> ID {
        encode_global_id(EntityKey::User(self.inner.id))
    }

    async fn username(&self) -> &str {
        &self.inner.username
    }

    async fn email(&self) -> &str {
        &self.inner.email
    }

    /// Posts written by this user, oldest first
    ///
    /// Batched through the request's posts-by-user loader, so resolving posts
    /// for many users issues a single query.
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let request = RequestContext::from_graphql(ctx).map_err(to_graphql_error)?;
        let posts = request
            .loaders()
            .posts_by_user
            .load_one(self.inner.id)
            .await
            .map_err(to_graphql_error)?
            .unwrap_or_default();

        Ok(posts.into_iter().map(Post::from).collect())
    }
}
