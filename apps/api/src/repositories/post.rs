//! Post repository for session-scoped store operations

use super::persist;
use crate::models::{Entity, NewPost, Post};
use crate::store::{Query, SessionHandle, StoreError, StoreResult};

/// Repository for post operations within one request
#[derive(Clone)]
pub struct PostRepository {
    session: SessionHandle,
}

impl PostRepository {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }

    /// Find a post by id
    pub async fn find_by_id(&self, post_id: i32) -> StoreResult<Option<Post>> {
        let posts = self
            .session
            .execute(&Query::PostById(post_id))
            .await?
            .into_posts()?;
        Ok(posts.into_iter().next())
    }

    /// Every post, ordered by id
    pub async fn find_all(&self) -> StoreResult<Vec<Post>> {
        self.session.execute(&Query::Posts).await?.into_posts()
    }

    /// Posts owned by any of the given users, ordered by id
    pub async fn find_by_user_ids(&self, user_ids: &[i32]) -> StoreResult<Vec<Post>> {
        self.session
            .execute(&Query::PostsByUserIds(user_ids.to_vec()))
            .await?
            .into_posts()
    }

    /// Insert and commit a post, returning it with its assigned id.
    ///
    /// Fails with an integrity error when the owner does not exist; nothing
    /// is persisted in that case.
    pub async fn create(&self, post: NewPost) -> StoreResult<Post> {
        let written = persist(&self.session, post.into()).await?;
        written
            .into_iter()
            .rev()
            .find_map(Entity::into_post)
            .ok_or(StoreError::UnexpectedRows {
                expected: "posts",
                actual: "nothing",
            })
    }
}
