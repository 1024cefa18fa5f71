//! Request-scoped DataLoaders for GraphQL relationship resolvers
//!
//! Every request gets a fresh [`Loaders`] bound to its own store session, so
//! cached values never outlive the request and never leak between users.
//!
//! There are two kinds of loaders:
//! - Single-entity loaders: return `Option<T>` for one entity by id
//! - Collection loaders: return `Vec<T>` of related entities by parent id

mod posts_by_user;
mod user;

pub use posts_by_user::{PostsByUserFetcher, PostsByUserLoader};
pub use user::{UserFetcher, UserLoader};

use async_graphql::dataloader::{DataLoader, HashMapCache};
use std::time::Duration;

use crate::store::SessionHandle;

/// Wait this long for sibling resolvers to queue keys before dispatching
pub const DEFAULT_DELAY: Duration = Duration::from_millis(5);

/// Dispatch early once a batch holds this many keys
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

/// Batching window settings shared by every loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderSettings {
    pub delay: Duration,
    pub max_batch_size: usize,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

/// Wrap a fetcher in a caching DataLoader driven by the Tokio runtime
fn data_loader<T>(fetcher: T, settings: &LoaderSettings) -> DataLoader<T, HashMapCache>
where
    T: Send + Sync + 'static,
{
    DataLoader::with_cache(fetcher, tokio::spawn, HashMapCache::default())
        .delay(settings.delay)
        .max_batch_size(settings.max_batch_size)
}

/// Create every loader for one request.
/// Must be called inside a Tokio runtime.
pub fn create_loaders(session: SessionHandle, settings: &LoaderSettings) -> Loaders {
    Loaders {
        user: data_loader(UserFetcher::new(session.clone()), settings),
        posts_by_user: data_loader(PostsByUserFetcher::new(session), settings),
    }
}

/// Container for one request's DataLoader instances
pub struct Loaders {
    pub user: UserLoader,
    pub posts_by_user: PostsByUserLoader,
}

impl Loaders {
    /// Drop every cached value. Called after a commit so relations
    /// resolved later in the same request see the new rows.
    pub fn clear(&self) {
        self.user.clear::<i32>();
        self.posts_by_user.clear::<i32>();
    }
}
