//! Node union for global object identification

use async_graphql::Union;

use super::{Post, User};

/// Any object reachable by a global id
#[derive(Union)]
pub enum Node {
    User(User),
    Post(Post),
}
