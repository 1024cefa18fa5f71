//! Per-request execution context
//!
//! A [`RequestContext`] is created by the GraphQL handler for every incoming
//! request and handed to resolvers through async-graphql request data. It
//! owns the request's store session and its loaders, and is torn down once
//! when execution finishes.

use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::loaders::{create_loaders, LoaderSettings, Loaders};
use crate::store::{SessionHandle, Store};

/// Everything scoped to one request. Cloning is shallow.
#[derive(Clone)]
pub struct RequestContext {
    inner: Arc<Inner>,
}

struct Inner {
    id: Uuid,
    session: SessionHandle,
    loaders: Loaders,
}

impl RequestContext {
    /// Open a context with a fresh session and loaders bound to it.
    /// Must be called inside a Tokio runtime.
    pub fn new(store: &Store, settings: &LoaderSettings) -> Self {
        let session = SessionHandle::new(store.session());
        let loaders = create_loaders(session.clone(), settings);
        Self {
            inner: Arc::new(Inner {
                id: Uuid::new_v4(),
                session,
                loaders,
            }),
        }
    }

    /// Request id used in tracing spans
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// The session bound to this request. Its transaction opens on first use.
    pub fn session(&self) -> &SessionHandle {
        &self.inner.session
    }

    pub fn loaders(&self) -> &Loaders {
        &self.inner.loaders
    }

    /// Roll back anything uncommitted and close the session.
    ///
    /// Called once by the handler after execution. Later use of the session
    /// fails with `SessionClosed`.
    pub async fn teardown(&self) {
        let mut session = self.inner.session.lock().await;
        if let Err(err) = session.close().await {
            tracing::error!(request_id = %self.inner.id, error = %err, "session teardown failed");
        }
    }

    /// Fetch the context from resolver data
    pub fn from_graphql<'a>(ctx: &async_graphql::Context<'a>) -> Result<&'a Self, ApiError> {
        ctx.data::<RequestContext>().map_err(|_| {
            tracing::error!("request context missing from GraphQL data");
            ApiError::Internal("request context missing".to_string())
        })
    }
}
