//! Post GraphQL type

use async_graphql::{Context, Object, Result, ID};

use crate::context::RequestContext;
use crate::error::to_graphql_error;
use crate::graphql::ids::encode_global_id;
use crate::models::{EntityKey, Post as DbPost};

use super::user::User;

/// Post exposed via GraphQL
pub struct Post {
    inner: DbPost,
}

impl Post {
    pub fn new(post: DbPost) -> Self {
        Self { inner: post }
    }
}

impl From<DbPost> for Post {
    fn from(post: DbPost) -> Self {
        Self::new(post)
    }
}

#[Object]
impl Post {
    /// Store-assigned identifier
    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    /// Opaque id accepted by `node`
    async fn global_id(&self) -> ID {
        encode_global_id(EntityKey::Post(self.inner.id))
    }

    async fn title(&self) -> &str {
        &self.inner.title
    }

    async fn content(&self) -> &str {
        &self.inner.content
    }

    /// Author of the post (batched by the user loader)
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let request = RequestContext::from_graphql(ctx).map_err(to_graphql_error)?;
        let user = request
            .loaders()
            .user
            .load_one(self.inner.user_id)
            .await
            .map_err(to_graphql_error)?;

        Ok(user.map(User::from))
    }
}
