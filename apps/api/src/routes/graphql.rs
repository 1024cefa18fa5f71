//! GraphQL HTTP endpoint
//!
//! - `POST /graphql` - Execute a GraphQL request
//! - `GET /graphql` - GraphQL Playground (when enabled)

use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::graphql::{self, loaders::LoaderSettings, QuillSchema};
use crate::store::Store;

/// Shared state for the GraphQL endpoint
#[derive(Clone)]
pub struct GraphqlState {
    pub schema: QuillSchema,
    pub store: Store,
    pub loaders: Arc<LoaderSettings>,
    pub playground: bool,
}

/// Create the GraphQL router, mounted at `/graphql`
pub fn graphql_router(state: GraphqlState) -> Router {
    Router::new()
        .route("/", get(graphql_playground).post(graphql_handler))
        .with_state(state)
}

/// Execute a GraphQL request in a fresh request context
async fn graphql_handler(
    State(state): State<GraphqlState>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    graphql::execute(
        &state.schema,
        &state.store,
        &state.loaders,
        request.into_inner(),
    )
    .await
    .into()
}

/// GraphQL Playground UI
async fn graphql_playground(State(state): State<GraphqlState>) -> Response {
    if !state.playground {
        return StatusCode::NOT_FOUND.into_response();
    }
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql"))).into_response()
}
