//! Repository layer for Quill
//!
//! Repositories wrap the request's store session with typed lookups and
//! create operations, so resolvers and mutations never build queries or
//! drive commits themselves.

pub mod post;
pub mod user;

pub use post::PostRepository;
pub use user::UserRepository;

use crate::models::{Entity, NewEntity};
use crate::store::{SessionHandle, StoreResult};

/// Stage one entity, commit, and return the written rows.
///
/// A failed commit rolls the session back so the request can keep reading.
async fn persist(session: &SessionHandle, entity: NewEntity) -> StoreResult<Vec<Entity>> {
    let mut session = session.lock().await;
    session.add(entity)?;

    match session.commit().await {
        Ok(written) => Ok(written),
        Err(err) => {
            if let Err(rollback_err) = session.rollback().await {
                tracing::error!(error = %rollback_err, "rollback after failed commit failed");
            }
            Err(err)
        }
    }
}
