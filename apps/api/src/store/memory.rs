//! In-process memory backend
//!
//! Mirrors the PostgreSQL schema closely enough to run the API without a
//! database server: identifiers come from non-transactional sequences,
//! foreign keys and column widths are enforced, and a transaction's writes
//! reach the shared tables only when it commits.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::{Backend, Query, Rows, StoreError, StoreResult, Transaction};
use crate::models::user::{EMAIL_MAX_LEN, USERNAME_MAX_LEN};
use crate::models::{Entity, EntityKey, NewEntity, Post, User};

/// Backend over shared in-process tables. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    tables: RwLock<Tables>,
    user_seq: AtomicI32,
    post_seq: AtomicI32,
    query_log: Mutex<Vec<Query>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every read executed against this backend, in order
    pub async fn query_log(&self) -> Vec<Query> {
        self.state.query_log.lock().await.clone()
    }

    /// Number of logged reads matching the predicate
    pub async fn count_queries(&self, predicate: impl Fn(&Query) -> bool) -> usize {
        self.state
            .query_log
            .lock()
            .await
            .iter()
            .filter(|query| predicate(query))
            .count()
    }

    pub async fn clear_query_log(&self) {
        self.state.query_log.lock().await.clear();
    }

    /// Committed row counts as `(users, posts)`
    pub async fn row_counts(&self) -> (usize, usize) {
        let tables = self.state.tables.read().await;
        (tables.users.len(), tables.posts.len())
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn migrate(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn begin(&self) -> StoreResult<Box<dyn Transaction>> {
        Ok(Box::new(MemoryTransaction {
            state: self.state.clone(),
            writes: Vec::new(),
        }))
    }
}

#[derive(Debug, Clone, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    posts: BTreeMap<i32, Post>,
}

impl Tables {
    fn apply(&mut self, write: &Write) -> StoreResult<()> {
        match write {
            Write::Insert(Entity::User(user)) => {
                check_width("users.username", &user.username, USERNAME_MAX_LEN)?;
                check_width("users.email", &user.email, EMAIL_MAX_LEN)?;
                self.users.insert(user.id, user.clone());
            }
            Write::Insert(Entity::Post(post)) => {
                if !self.users.contains_key(&post.user_id) {
                    return Err(StoreError::integrity(format!(
                        "insert on table \"posts\" violates foreign key constraint: \
                         user {} does not exist",
                        post.user_id
                    )));
                }
                self.posts.insert(post.id, post.clone());
            }
            Write::Delete(EntityKey::User(id)) => {
                if self.posts.values().any(|post| post.user_id == *id) {
                    return Err(StoreError::integrity(format!(
                        "delete on table \"users\" violates foreign key constraint: \
                         user {} is still referenced from table \"posts\"",
                        id
                    )));
                }
                self.users.remove(id);
            }
            Write::Delete(EntityKey::Post(id)) => {
                self.posts.remove(id);
            }
        }
        Ok(())
    }

    fn contains(&self, key: EntityKey) -> bool {
        match key {
            EntityKey::User(id) => self.users.contains_key(&id),
            EntityKey::Post(id) => self.posts.contains_key(&id),
        }
    }

    fn run(&self, query: &Query) -> Rows {
        match query {
            Query::Users => Rows::Users(self.users.values().cloned().collect()),
            Query::UserById(id) => Rows::Users(self.users.get(id).cloned().into_iter().collect()),
            Query::UsersByIds(ids) => Rows::Users(
                ids.iter()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .filter_map(|id| self.users.get(id).cloned())
                    .collect(),
            ),
            Query::Posts => Rows::Posts(self.posts.values().cloned().collect()),
            Query::PostById(id) => Rows::Posts(self.posts.get(id).cloned().into_iter().collect()),
            Query::PostsByUserIds(user_ids) => {
                let owners: HashSet<i32> = user_ids.iter().copied().collect();
                Rows::Posts(
                    self.posts
                        .values()
                        .filter(|post| owners.contains(&post.user_id))
                        .cloned()
                        .collect(),
                )
            }
        }
    }
}

fn check_width(column: &str, value: &str, max: usize) -> StoreResult<()> {
    if value.chars().count() > max {
        return Err(StoreError::integrity(format!(
            "value too long for column {} (max {} characters)",
            column, max
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
enum Write {
    Insert(Entity),
    Delete(EntityKey),
}

struct MemoryTransaction {
    state: Arc<MemoryState>,
    writes: Vec<Write>,
}

impl MemoryTransaction {
    /// Committed tables overlaid with this transaction's own writes
    async fn view(&self) -> StoreResult<Tables> {
        let mut view = self.state.tables.read().await.clone();
        for write in &self.writes {
            view.apply(write)?;
        }
        Ok(view)
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn insert(&mut self, entity: NewEntity) -> StoreResult<Entity> {
        let entity = match entity {
            NewEntity::User(user) => {
                let id = self.state.user_seq.fetch_add(1, Ordering::SeqCst) + 1;
                Entity::User(user.with_id(id))
            }
            NewEntity::Post(post) => {
                let id = self.state.post_seq.fetch_add(1, Ordering::SeqCst) + 1;
                Entity::Post(post.with_id(id))
            }
        };

        let write = Write::Insert(entity.clone());
        self.view().await?.apply(&write)?;
        self.writes.push(write);
        Ok(entity)
    }

    async fn delete(&mut self, key: EntityKey) -> StoreResult<bool> {
        let mut view = self.view().await?;
        if !view.contains(key) {
            return Ok(false);
        }

        let write = Write::Delete(key);
        view.apply(&write)?;
        self.writes.push(write);
        Ok(true)
    }

    async fn fetch(&mut self, query: &Query) -> StoreResult<Rows> {
        self.state.query_log.lock().await.push(query.clone());
        Ok(self.view().await?.run(query))
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let mut tables = self.state.tables.write().await;

        // Re-check against whatever committed since our writes were staged
        let mut next = tables.clone();
        for write in &self.writes {
            next.apply(write)?;
        }
        *tables = next;

        tracing::trace!(writes = self.writes.len(), "memory transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        tracing::trace!(writes = self.writes.len(), "memory transaction rolled back");
        Ok(())
    }
}
