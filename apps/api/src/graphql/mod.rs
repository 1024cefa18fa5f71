//! GraphQL schema and resolvers for Quill
//!
//! This module contains the async-graphql schema including:
//! - Query resolvers for users, posts and global node lookup
//! - Mutation resolvers for creating users and posts
//! - Type definitions and the Node union
//! - Request-scoped DataLoaders

pub mod ids;
pub mod loaders;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod types;

pub use schema::{build_schema, QuillSchema, SchemaBuilder};

use tracing::Instrument;

use crate::context::RequestContext;
use crate::store::Store;
use loaders::LoaderSettings;

/// Execute one GraphQL request inside its own request context.
///
/// The context (session and loaders) is created here and torn down after
/// execution whatever the outcome.
pub async fn execute(
    schema: &QuillSchema,
    store: &Store,
    settings: &LoaderSettings,
    request: async_graphql::Request,
) -> async_graphql::Response {
    let ctx = RequestContext::new(store, settings);
    let span = tracing::info_span!(
        "graphql_request",
        request_id = %ctx.id(),
        operation = request.operation_name.as_deref().unwrap_or("anonymous"),
    );

    let response = schema
        .execute(request.data(ctx.clone()))
        .instrument(span)
        .await;

    ctx.teardown().await;

    if response.is_err() {
        tracing::debug!(
            request_id = %ctx.id(),
            errors = response.errors.len(),
            "request finished with errors"
        );
    }
    response
}
