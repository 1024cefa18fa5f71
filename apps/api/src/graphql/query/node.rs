//! Global object lookup

use async_graphql::{Context, Object, Result, ID};

use crate::context::RequestContext;
use crate::error::to_graphql_error;
use crate::graphql::ids::decode_global_id;
use crate::graphql::types::{Node, Post, User};
use crate::models::EntityKey;
use crate::repositories::{PostRepository, UserRepository};

#[derive(Default)]
pub struct NodeQuery;

#[Object]
impl NodeQuery {
    /// Fetch a user or post by its global id
    async fn node(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Node>> {
        let request = RequestContext::from_graphql(ctx).map_err(to_graphql_error)?;
        let key = decode_global_id(&id).map_err(to_graphql_error)?;
        let session = request.session().clone();

        let node = match key {
            EntityKey::User(user_id) => UserRepository::new(session)
                .find_by_id(user_id)
                .await
                .map_err(to_graphql_error)?
                .map(|user| Node::User(User::from(user))),
            EntityKey::Post(post_id) => PostRepository::new(session)
                .find_by_id(post_id)
                .await
                .map_err(to_graphql_error)?
                .map(|post| Node::Post(Post::from(post))),
        };

        Ok(node)
    }
}
