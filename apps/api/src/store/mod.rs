//! Store layer for Quill
//!
//! The store is the process-wide handle over a relational backend. It hands
//! out transactions, and every request works through its own [`Session`]
//! (a lazily-opened unit of work) so concurrent requests never share
//! uncommitted state.
//!
//! Two backends exist:
//! - [`PgBackend`]: PostgreSQL via SQLx, used in deployments
//! - [`MemoryBackend`]: in-process tables with the same integrity and
//!   visibility rules, selected with `DATABASE_URL=memory://`

mod error;
mod memory;
mod postgres;
mod session;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryBackend;
pub use postgres::PgBackend;
pub use session::{Session, SessionHandle};

use async_trait::async_trait;
use quill_shared_config::DatabaseConfig;
use std::fmt;
use std::sync::Arc;

use crate::models::{Entity, EntityKey, NewEntity, Post, User};

/// SQL columns for user queries
pub const USER_COLUMNS: &str = "id, username, email";

/// SQL columns for post queries
pub const POST_COLUMNS: &str = "id, title, content, user_id";

/// A read the store knows how to answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Every user, by id
    Users,
    UserById(i32),
    /// Users whose id is in the set
    UsersByIds(Vec<i32>),
    /// Every post, by id
    Posts,
    PostById(i32),
    /// Posts whose owner is in the set (the batched relation lookup)
    PostsByUserIds(Vec<i32>),
}

impl Query {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Users | Self::UserById(_) | Self::UsersByIds(_) => "users",
            Self::Posts | Self::PostById(_) | Self::PostsByUserIds(_) => "posts",
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let in_list = |ids: &[i32]| {
            ids.iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            Self::Users => write!(f, "SELECT {USER_COLUMNS} FROM users"),
            Self::UserById(id) => write!(f, "SELECT {USER_COLUMNS} FROM users WHERE id = {id}"),
            Self::UsersByIds(ids) => write!(
                f,
                "SELECT {USER_COLUMNS} FROM users WHERE id IN ({})",
                in_list(ids)
            ),
            Self::Posts => write!(f, "SELECT {POST_COLUMNS} FROM posts"),
            Self::PostById(id) => write!(f, "SELECT {POST_COLUMNS} FROM posts WHERE id = {id}"),
            Self::PostsByUserIds(ids) => write!(
                f,
                "SELECT {POST_COLUMNS} FROM posts WHERE user_id IN ({})",
                in_list(ids)
            ),
        }
    }
}

/// Rows returned by [`Transaction::fetch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rows {
    Users(Vec<User>),
    Posts(Vec<Post>),
}

impl Rows {
    fn kind(&self) -> &'static str {
        match self {
            Self::Users(_) => "users",
            Self::Posts(_) => "posts",
        }
    }

    pub fn into_users(self) -> StoreResult<Vec<User>> {
        match self {
            Self::Users(users) => Ok(users),
            other => Err(StoreError::UnexpectedRows {
                expected: "users",
                actual: other.kind(),
            }),
        }
    }

    pub fn into_posts(self) -> StoreResult<Vec<Post>> {
        match self {
            Self::Posts(posts) => Ok(posts),
            other => Err(StoreError::UnexpectedRows {
                expected: "posts",
                actual: other.kind(),
            }),
        }
    }
}

/// A relational backend the store can run on
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Short backend name for logs and health output
    fn name(&self) -> &'static str;

    /// Create the schema if it is absent
    async fn migrate(&self) -> StoreResult<()>;

    /// Check the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Open a new transaction
    async fn begin(&self) -> StoreResult<Box<dyn Transaction>>;
}

/// An open transaction on a [`Backend`]
///
/// Writes become visible to other transactions only after [`commit`].
/// Dropping a transaction without committing rolls it back.
///
/// [`commit`]: Transaction::commit
#[async_trait]
pub trait Transaction: Send {
    /// Insert a row, returning it with its assigned identifier
    async fn insert(&mut self, entity: NewEntity) -> StoreResult<Entity>;

    /// Delete a row. Returns `false` if no such row exists.
    async fn delete(&mut self, key: EntityKey) -> StoreResult<bool>;

    /// Run a read inside this transaction
    async fn fetch(&mut self, query: &Query) -> StoreResult<Rows>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;

    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}

/// Process-wide store handle. Cloning is cheap and shares the backend.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn Backend>,
}

impl Store {
    pub fn new(backend: impl Backend) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// A store over fresh, empty in-process tables
    pub fn memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Connect to the backend selected by the configuration URL
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        if config.is_memory() {
            tracing::warn!("Using in-process memory store, data will not survive a restart");
            return Ok(Self::memory());
        }

        let backend = PgBackend::connect(config).await?;
        Ok(Self::new(backend))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        self.backend.migrate().await
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.backend.ping().await
    }

    /// A new, not yet opened session bound to this store
    pub fn session(&self) -> Session {
        Session::new(self.clone())
    }

    pub(crate) async fn begin(&self) -> StoreResult<Box<dyn Transaction>> {
        self.backend.begin().await
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("backend", &self.backend.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_display_matches_sql_shape() {
        assert_eq!(
            Query::PostsByUserIds(vec![1, 2, 3]).to_string(),
            "SELECT id, title, content, user_id FROM posts WHERE user_id IN (1, 2, 3)"
        );
        assert_eq!(
            Query::UserById(4).to_string(),
            "SELECT id, username, email FROM users WHERE id = 4"
        );
        assert_eq!(Query::UsersByIds(vec![]).table(), "users");
    }

    #[test]
    fn test_rows_projection() {
        assert!(Rows::Users(vec![]).into_users().unwrap().is_empty());
        assert!(matches!(
            Rows::Users(vec![]).into_posts(),
            Err(StoreError::UnexpectedRows {
                expected: "posts",
                actual: "users"
            })
        ));
    }

    #[tokio::test]
    async fn test_connect_memory() {
        let config = DatabaseConfig::with_url("memory://");
        let store = Store::connect(&config).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
        assert!(store.ping().await.is_ok());
        assert!(store.migrate().await.is_ok());
    }
}
