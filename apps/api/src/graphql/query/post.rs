//! Post queries for Quill GraphQL API
//!
//! - post: Get a post by ID
//! - posts: List every post

use async_graphql::{Context, Object, Result, ID};

use crate::context::RequestContext;
use crate::error::to_graphql_error;
use crate::graphql::ids::parse_id;
use crate::graphql::types::Post;
use crate::repositories::PostRepository;

/// Post-related queries
#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// Get a post by ID. Returns null when no such post exists.
    async fn post(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Post>> {
        let request = RequestContext::from_graphql(ctx).map_err(to_graphql_error)?;
        let post_id = parse_id(&id).map_err(to_graphql_error)?;

        let post = PostRepository::new(request.session().clone())
            .find_by_id(post_id)
            .await
            .map_err(to_graphql_error)?;

        Ok(post.map(Post::from))
    }

    /// Every post, ordered by id
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let request = RequestContext::from_graphql(ctx).map_err(to_graphql_error)?;

        let posts = PostRepository::new(request.session().clone())
            .find_all()
            .await
            .map_err(to_graphql_error)?;

        Ok(posts.into_iter().map(Post::from).collect())
    }
}
