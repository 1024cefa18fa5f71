//! User queries for Quill GraphQL API
//!
//! - user: Get a user by ID
//! - users: List every user

use async_graphql::{Context, Object, Result, ID};

use crate::context::RequestContext;
use crate::error::to_graphql_error;
use crate::graphql::ids::parse_id;
use crate::graphql::types::User;
use crate::repositories::UserRepository;

/// User-related queries
#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// Get a user by ID. Returns null when no such user exists.
    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<Option<User>> {
        let request = RequestContext::from_graphql(ctx).map_err(to_graphql_error)?;
        let user_id = parse_id(&id).map_err(to_graphql_error)?;

        let user = UserRepository::new(request.session().clone())
            .find_by_id(user_id)
            .await
            .map_err(to_graphql_error)?;

        Ok(user.map(User::from))
    }

    /// Every user, ordered by id
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let request = RequestContext::from_graphql(ctx).map_err(to_graphql_error)?;

        let users = UserRepository::new(request.session().clone())
            .find_all()
            .await
            .map_err(to_graphql_error)?;

        Ok(users.into_iter().map(User::from).collect())
    }
}
