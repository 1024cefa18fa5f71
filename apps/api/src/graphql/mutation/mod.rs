//! GraphQL mutations for Quill
//!
//! This module contains all mutation resolvers, organized by domain.

mod post;
mod user;

pub use post::PostMutation;
pub use user::UserMutation;

use async_graphql::MergedObject;

/// Root mutation type combining all mutation domains
#[derive(MergedObject, Default)]
pub struct Mutation(UserMutation, PostMutation);
