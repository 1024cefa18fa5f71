//! Posts-by-User DataLoader for batched fetching
//!
//! Batches the owner ids of every `User.posts` field resolved in a request
//! into one `user_id = ANY($1)` query, returning each user's posts in id
//! order.

use async_graphql::dataloader::{DataLoader, HashMapCache, Loader};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::Post;
use crate::repositories::PostRepository;
use crate::store::{SessionHandle, StoreError};

/// Batch function for posts grouped by owner
pub struct PostsByUserFetcher {
    posts: PostRepository,
}

impl PostsByUserFetcher {
    pub fn new(session: SessionHandle) -> Self {
        Self {
            posts: PostRepository::new(session),
        }
    }
}

impl Loader<i32> for PostsByUserFetcher {
    type Value = Vec<Post>;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[i32]) -> Result<HashMap<i32, Self::Value>, Self::Error> {
        tracing::debug!(num_keys = keys.len(), "loading posts-by-user batch");
        let posts = self.posts.find_by_user_ids(keys).await.map_err(Arc::new)?;

        // Group posts by user_id
        let mut result: HashMap<i32, Vec<Post>> = HashMap::new();
        for post in posts {
            result.entry(post.user_id).or_default().push(post);
        }

        // Ensure all requested keys have an entry (even if empty)
        for key in keys {
            result.entry(*key).or_default();
        }

        Ok(result)
    }
}

/// Loader for `User.posts`
pub type PostsByUserLoader = DataLoader<PostsByUserFetcher, HashMapCache>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewPost, NewUser};
    use crate::store::{MemoryBackend, Query, Store};

    #[tokio::test]
    async fn test_groups_posts_by_owner() {
        let backend = MemoryBackend::new();
        let store = Store::new(backend.clone());
        let session = SessionHandle::new(store.session());
        {
            let mut session = session.lock().await;
            session.add(NewUser::new("ada", "a@x.com")).unwrap();
            session.add(NewUser::new("bob", "b@x.com")).unwrap();
            session.add(NewPost::new(1, "one", "c")).unwrap();
            session.add(NewPost::new(1, "two", "c")).unwrap();
            session.commit().await.unwrap();
        }
        backend.clear_query_log().await;

        let fetcher = PostsByUserFetcher::new(session);
        let grouped = fetcher.load(&[1, 2]).await.unwrap();

        let titles: Vec<_> = grouped[&1].iter().map(|post| post.title.as_str()).collect();
        assert_eq!(titles, ["one", "two"]);
        assert!(grouped[&2].is_empty());
        assert_eq!(
            backend.query_log().await,
            [Query::PostsByUserIds(vec![1, 2])]
        );
    }
}
