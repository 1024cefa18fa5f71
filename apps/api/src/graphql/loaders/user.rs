//! User DataLoader for batched fetching by primary key

use async_graphql::dataloader::{DataLoader, HashMapCache, Loader};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::User;
use crate::repositories::UserRepository;
use crate::store::{SessionHandle, StoreError};

/// Batch function for users by id. Ids with no row are left out of the
/// result, so `load_one` yields `None` for them.
pub struct UserFetcher {
    users: UserRepository,
}

impl UserFetcher {
    pub fn new(session: SessionHandle) -> Self {
        Self {
            users: UserRepository::new(session),
        }
    }
}

impl Loader<i32> for UserFetcher {
    type Value = User;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[i32]) -> Result<HashMap<i32, Self::Value>, Self::Error> {
        tracing::debug!(num_keys = keys.len(), "loading users batch");
        let users = self.users.find_by_ids(keys).await.map_err(Arc::new)?;

        Ok(users.into_iter().map(|user| (user.id, user)).collect())
    }
}

/// Loader for `Post.user`
pub type UserLoader = DataLoader<UserFetcher, HashMapCache>;
