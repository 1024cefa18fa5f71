//! Request-scoped unit of work
//!
//! A [`Session`] stages writes in memory and talks to the backend through a
//! single transaction that is opened on first use. Reads flush staged writes
//! first, so a request always observes its own changes.

use std::mem;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use super::{Query, Rows, Store, StoreError, StoreResult, Transaction};
use crate::models::{Entity, EntityKey, NewEntity};

#[derive(Debug, Clone)]
enum Staged {
    Add(NewEntity),
    Delete(EntityKey),
}

/// Unit of work bound to one request
pub struct Session {
    store: Store,
    tx: Option<Box<dyn Transaction>>,
    staged: Vec<Staged>,
    /// Entities written in the open transaction, handed back on commit
    written: Vec<Entity>,
    closed: bool,
}

impl Session {
    pub(crate) fn new(store: Store) -> Self {
        Self {
            store,
            tx: None,
            staged: Vec::new(),
            written: Vec::new(),
            closed: false,
        }
    }

    /// Whether a backend transaction is currently open
    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    /// Whether there are staged writes not yet flushed
    pub fn has_pending(&self) -> bool {
        !self.staged.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed {
            tracing::error!("store session used after request teardown");
            return Err(StoreError::SessionClosed);
        }
        Ok(())
    }

    async fn transaction(&mut self) -> StoreResult<&mut Box<dyn Transaction>> {
        self.ensure_open()?;
        if self.tx.is_none() {
            tracing::trace!(backend = self.store.backend_name(), "opening session transaction");
            self.tx = Some(self.store.begin().await?);
        }
        // Populated just above when it was empty
        self.tx.as_mut().ok_or(StoreError::SessionClosed)
    }

    /// Stage a new entity for insertion
    pub fn add(&mut self, entity: impl Into<NewEntity>) -> StoreResult<()> {
        self.ensure_open()?;
        self.staged.push(Staged::Add(entity.into()));
        Ok(())
    }

    /// Stage a row for deletion
    pub fn delete(&mut self, key: EntityKey) -> StoreResult<()> {
        self.ensure_open()?;
        self.staged.push(Staged::Delete(key));
        Ok(())
    }

    /// Write staged changes into the open transaction without committing.
    ///
    /// Returns the entities inserted by this flush, in staging order. On
    /// error the remaining staged work is discarded and the caller is
    /// expected to roll back.
    pub async fn flush(&mut self) -> StoreResult<Vec<Entity>> {
        if self.staged.is_empty() {
            self.ensure_open()?;
            return Ok(Vec::new());
        }

        let staged = mem::take(&mut self.staged);
        let tx = self.transaction().await?;

        let mut inserted = Vec::new();
        for op in staged {
            match op {
                Staged::Add(entity) => inserted.push(tx.insert(entity).await?),
                Staged::Delete(key) => {
                    if !tx.delete(key).await? {
                        tracing::debug!(%key, "delete matched no row");
                    }
                }
            }
        }

        self.written.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    /// Flush and commit, returning every entity inserted in the transaction
    pub async fn commit(&mut self) -> StoreResult<Vec<Entity>> {
        self.flush().await?;

        let written = mem::take(&mut self.written);
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
            tracing::debug!(entities = written.len(), "session committed");
        }
        Ok(written)
    }

    /// Discard staged work and roll back the open transaction
    pub async fn rollback(&mut self) -> StoreResult<()> {
        self.staged.clear();
        self.written.clear();
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
            tracing::debug!("session rolled back");
        }
        Ok(())
    }

    /// Run a read in the session's transaction, flushing staged writes first
    pub async fn execute(&mut self, query: &Query) -> StoreResult<Rows> {
        self.flush().await?;
        let tx = self.transaction().await?;
        tracing::trace!(%query, "executing query");
        tx.fetch(query).await
    }

    /// End the session: roll back anything uncommitted and refuse further use
    pub(crate) async fn close(&mut self) -> StoreResult<()> {
        if self.closed {
            return Ok(());
        }
        let result = self.rollback().await;
        self.closed = true;
        result
    }
}

/// Shared handle to a request's session
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<Session>>,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Lock the session. Do not hold the guard across a loader await.
    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock().await
    }

    /// Lock and run a single read
    pub async fn execute(&self, query: &Query) -> StoreResult<Rows> {
        self.lock().await.execute(query).await
    }
}
