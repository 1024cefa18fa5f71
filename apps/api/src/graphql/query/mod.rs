//! GraphQL queries for Quill
//!
//! This module contains all query resolvers, organized by domain.

mod node;
mod post;
mod user;

pub use node::NodeQuery;
pub use post::PostQuery;
pub use user::UserQuery;

use async_graphql::MergedObject;

/// Root query type combining all query domains
#[derive(MergedObject, Default)]
pub struct Query(UserQuery, PostQuery, NodeQuery);
