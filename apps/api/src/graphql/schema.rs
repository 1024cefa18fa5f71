//! GraphQL schema builder for Quill
//!
//! The schema itself holds no store handle: every request brings its own
//! [`RequestContext`](crate::context::RequestContext) as request data.

use async_graphql::{EmptySubscription, Schema};

use super::mutation::Mutation;
use super::query::Query;

/// Default limit on query nesting
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// The Quill GraphQL schema type
pub type QuillSchema = Schema<Query, Mutation, EmptySubscription>;

/// Builder for constructing the GraphQL schema
pub struct SchemaBuilder {
    max_depth: usize,
    introspection: bool,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            introspection: true,
        }
    }

    /// Reject queries nested deeper than this
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Allow or refuse introspection queries
    pub fn introspection(mut self, enabled: bool) -> Self {
        self.introspection = enabled;
        self
    }

    pub fn build(self) -> QuillSchema {
        let mut builder = Schema::build(Query::default(), Mutation::default(), EmptySubscription)
            .limit_depth(self.max_depth);

        if !self.introspection {
            builder = builder.disable_introspection();
        }

        builder.finish()
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the schema with default limits
pub fn build_schema() -> QuillSchema {
    SchemaBuilder::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builder_default() {
        let builder = SchemaBuilder::default();
        assert_eq!(builder.max_depth, DEFAULT_MAX_DEPTH);
        assert!(builder.introspection);
    }

    #[test]
    fn test_sdl_exposes_node_union() {
        let sdl = build_schema().sdl();
        assert!(sdl.contains("union Node = User | Post"));
        assert!(sdl.contains("createPost("));
        assert!(sdl.contains("userId: ID,"));
        assert!(sdl.contains("globalId: ID!"));
    }
}
