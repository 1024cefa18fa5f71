//! Test helper functions for API integration tests
//!
//! Provides an application over the in-memory store and utilities for
//! sending requests to it and inspecting responses.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use quill_api::config::Config;
use quill_api::store::{MemoryBackend, Store};
use quill_shared_config::DatabaseConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Application wired to a fresh in-memory store
pub struct TestApp {
    pub router: Router,
    pub backend: MemoryBackend,
    pub store: Store,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::development(DatabaseConfig::with_url("memory://")))
    }

    pub fn with_config(config: Config) -> Self {
        let backend = MemoryBackend::new();
        let store = Store::new(backend.clone());
        let router = quill_api::app(store.clone(), &config);
        Self {
            router,
            backend,
            store,
        }
    }

    /// POST a GraphQL document and return the JSON response body
    pub async fn graphql(&self, query: &str) -> Value {
        self.graphql_with_variables(query, json!({})).await
    }

    pub async fn graphql_with_variables(&self, query: &str, variables: Value) -> Value {
        let body = json!({ "query": query, "variables": variables });
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/graphql")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        read_json(response.into_body()).await
    }

    /// GET a path and return the status and raw body
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }
}

/// Read a response body as JSON
pub async fn read_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Error codes carried in a GraphQL response's `extensions.code`
pub fn error_codes(response: &Value) -> Vec<String> {
    response["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|error| error["extensions"]["code"].as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Copy of the ids in ascending order. Loader batches carry keys in no
/// particular order.
pub fn sorted(ids: &[i32]) -> Vec<i32> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids
}

/// Assert that a GraphQL response has no errors
#[macro_export]
macro_rules! assert_no_errors {
    ($response:expr) => {
        assert!(
            $response.get("errors").is_none(),
            "unexpected GraphQL errors: {}",
            $response["errors"]
        );
    };
}

/// Assert that a result contains a specific error message substring
#[macro_export]
macro_rules! assert_err_contains {
    ($result:expr, $substr:expr) => {
        match &$result {
            Ok(_) => panic!("Expected error but got Ok"),
            Err(e) => {
                let msg = e.to_string();
                assert!(
                    msg.contains($substr),
                    "Error message '{}' does not contain '{}'",
                    msg,
                    $substr
                );
            }
        }
    };
}
