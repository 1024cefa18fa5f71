//! GraphQL type definitions for Quill
//!
//! This module contains the GraphQL object types exposed through the API.

mod node;
mod post;
mod user;

pub use node::Node;
pub use post::Post;
pub use user::User;
