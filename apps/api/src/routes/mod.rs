//! HTTP route handlers for the Quill API
//!
//! - GraphQL endpoint and playground
//! - Health check and status endpoints

pub mod graphql;
pub mod health;

pub use graphql::{graphql_router, GraphqlState};
pub use health::{health_router, HealthState};
