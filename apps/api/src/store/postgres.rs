//! PostgreSQL backend

use async_trait::async_trait;
use quill_shared_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};
use std::time::Duration;

use super::{Backend, Query, Rows, StoreResult, Transaction, POST_COLUMNS, USER_COLUMNS};
use crate::models::{Entity, EntityKey, NewEntity, Post, User};

/// Backend over a shared SQLx connection pool
#[derive(Clone)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build the pool described by the configuration
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_secs)))
            .connect(&config.url)
            .await?;
        tracing::debug!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "postgres pool ready"
        );

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Backend for PgBackend {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn begin(&self) -> StoreResult<Box<dyn Transaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTransaction { tx }))
    }
}

struct PgTransaction {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl Transaction for PgTransaction {
    async fn insert(&mut self, entity: NewEntity) -> StoreResult<Entity> {
        let entity = match entity {
            NewEntity::User(user) => {
                let sql = format!(
                    "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING {}",
                    USER_COLUMNS
                );
                let user = sqlx::query_as::<_, User>(&sql)
                    .bind(&user.username)
                    .bind(&user.email)
                    .fetch_one(&mut *self.tx)
                    .await?;
                Entity::User(user)
            }
            NewEntity::Post(post) => {
                let sql = format!(
                    "INSERT INTO posts (title, content, user_id) VALUES ($1, $2, $3) RETURNING {}",
                    POST_COLUMNS
                );
                let post = sqlx::query_as::<_, Post>(&sql)
                    .bind(&post.title)
                    .bind(&post.content)
                    .bind(post.user_id)
                    .fetch_one(&mut *self.tx)
                    .await?;
                Entity::Post(post)
            }
        };
        Ok(entity)
    }

    async fn delete(&mut self, key: EntityKey) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", key.table());
        let result = sqlx::query(&sql)
            .bind(key.id())
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch(&mut self, query: &Query) -> StoreResult<Rows> {
        let rows = match query {
            Query::Users => {
                let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
                Rows::Users(
                    sqlx::query_as::<_, User>(&sql)
                        .fetch_all(&mut *self.tx)
                        .await?,
                )
            }
            Query::UserById(id) => {
                let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
                Rows::Users(
                    sqlx::query_as::<_, User>(&sql)
                        .bind(*id)
                        .fetch_all(&mut *self.tx)
                        .await?,
                )
            }
            Query::UsersByIds(ids) => {
                let sql = format!(
                    "SELECT {} FROM users WHERE id = ANY($1) ORDER BY id",
                    USER_COLUMNS
                );
                Rows::Users(
                    sqlx::query_as::<_, User>(&sql)
                        .bind(ids.as_slice())
                        .fetch_all(&mut *self.tx)
                        .await?,
                )
            }
            Query::Posts => {
                let sql = format!("SELECT {} FROM posts ORDER BY id", POST_COLUMNS);
                Rows::Posts(
                    sqlx::query_as::<_, Post>(&sql)
                        .fetch_all(&mut *self.tx)
                        .await?,
                )
            }
            Query::PostById(id) => {
                let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
                Rows::Posts(
                    sqlx::query_as::<_, Post>(&sql)
                        .bind(*id)
                        .fetch_all(&mut *self.tx)
                        .await?,
                )
            }
            Query::PostsByUserIds(user_ids) => {
                let sql = format!(
                    "SELECT {} FROM posts WHERE user_id = ANY($1) ORDER BY id",
                    POST_COLUMNS
                );
                Rows::Posts(
                    sqlx::query_as::<_, Post>(&sql)
                        .bind(user_ids.as_slice())
                        .fetch_all(&mut *self.tx)
                        .await?,
                )
            }
        };
        Ok(rows)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let PgTransaction { tx } = *self;
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        let PgTransaction { tx } = *self;
        tx.rollback().await?;
        Ok(())
    }
}
