//! Post mutations for Quill GraphQL API
//!
//! - createPost: Insert and commit a new post for an existing user

use async_graphql::{Context, Object, Result, ID};

use crate::context::RequestContext;
use crate::error::{to_graphql_error, ApiError};
use crate::graphql::ids::parse_id;
use crate::graphql::types::Post;
use crate::models::NewPost;
use crate::repositories::PostRepository;

/// Post-related mutations
#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    /// Create a post owned by `userId` and return it with its assigned id.
    ///
    /// Fails with `INTEGRITY_VIOLATION` when the user does not exist; no post
    /// is persisted in that case.
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        user_id: Option<ID>,
        title: String,
        content: String,
    ) -> Result<Post> {
        let request = RequestContext::from_graphql(ctx).map_err(to_graphql_error)?;

        let user_id = user_id
            .ok_or(ApiError::MissingField("userId"))
            .and_then(|id| parse_id(&id))
            .map_err(to_graphql_error)?;

        let post = PostRepository::new(request.session().clone())
            .create(NewPost::new(user_id, title, content))
            .await
            .map_err(to_graphql_error)?;
        // Relations cached before the commit no longer match the store
        request.loaders().clear();

        tracing::info!(post_id = post.id, user_id, request_id = %request.id(), "post created");
        Ok(Post::from(post))
    }
}
