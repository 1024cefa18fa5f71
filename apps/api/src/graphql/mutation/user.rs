//! User mutations for Quill GraphQL API
//!
//! - createUser: Insert and commit a new user

use async_graphql::{Context, Object, Result};

use crate::context::RequestContext;
use crate::error::to_graphql_error;
use crate::graphql::types::User;
use crate::models::NewUser;
use crate::repositories::UserRepository;

/// User-related mutations
#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Create a user and return it with its assigned id
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        email: String,
    ) -> Result<User> {
        let request = RequestContext::from_graphql(ctx).map_err(to_graphql_error)?;

        let user = UserRepository::new(request.session().clone())
            .create(NewUser::new(username, email))
            .await
            .map_err(to_graphql_error)?;
        // Relations cached before the commit no longer match the store
        request.loaders().clear();

        tracing::info!(user_id = user.id, request_id = %request.id(), "user created");
        Ok(User::from(user))
    }
}
