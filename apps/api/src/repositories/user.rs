//! User repository for session-scoped store operations

use super::persist;
use crate::models::{Entity, NewUser, User};
use crate::store::{Query, SessionHandle, StoreError, StoreResult};

/// Repository for user operations within one request
#[derive(Clone)]
pub struct UserRepository {
    session: SessionHandle,
}

impl UserRepository {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }

    /// Find a user by id
    pub async fn find_by_id(&self, user_id: i32) -> StoreResult<Option<User>> {
        let users = self
            .session
            .execute(&Query::UserById(user_id))
            .await?
            .into_users()?;
        Ok(users.into_iter().next())
    }

    /// Every user, ordered by id
    pub async fn find_all(&self) -> StoreResult<Vec<User>> {
        self.session.execute(&Query::Users).await?.into_users()
    }

    /// Users whose id is in the set, ordered by id
    pub async fn find_by_ids(&self, user_ids: &[i32]) -> StoreResult<Vec<User>> {
        self.session
            .execute(&Query::UsersByIds(user_ids.to_vec()))
            .await?
            .into_users()
    }

    /// Insert and commit a user, returning it with its assigned id
    pub async fn create(&self, user: NewUser) -> StoreResult<User> {
        let written = persist(&self.session, user.into()).await?;
        written
            .into_iter()
            .rev()
            .find_map(Entity::into_user)
            .ok_or(StoreError::UnexpectedRows {
                expected: "users",
                actual: "nothing",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryBackend, Store};

    fn repository() -> (MemoryBackend, UserRepository) {
        let backend = MemoryBackend::new();
        let store = Store::new(backend.clone());
        (backend, UserRepository::new(SessionHandle::new(store.session())))
    }

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let (backend, users) = repository();

        let ada = users.create(NewUser::new("ada", "a@x.com")).await.unwrap();
        let bob = users.create(NewUser::new("bob", "b@x.com")).await.unwrap();

        assert_eq!(ada.id, 1);
        assert_eq!(bob.id, 2);
        assert_eq!(backend.row_counts().await, (2, 0));
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let (_, users) = repository();
        users.create(NewUser::new("ada", "a@x.com")).await.unwrap();

        let found = users.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found.username, "ada");
        assert!(users.find_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_width_violation_is_integrity_error() {
        let (backend, users) = repository();

        let err = users
            .create(NewUser::new("x".repeat(46), "a@x.com"))
            .await
            .unwrap_err();

        assert!(err.is_integrity());
        assert_eq!(backend.row_counts().await, (0, 0));
        assert!(users.find_all().await.unwrap().is_empty());
    }
}
