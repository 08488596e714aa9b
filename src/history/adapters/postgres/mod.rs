//! `PostgreSQL` adapter for ingested-message persistence, following
//! [`crate::session::adapters::postgres::PostgresSessionRepository`]'s
//! pool-per-adapter, blocking-offloaded shape.

mod models;
mod schema;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};

use crate::history::domain::StoredMessage;
use crate::history::ports::{HistoryRepository, HistoryRepositoryError, HistoryRepositoryResult};
use crate::ids::SessionId;
use crate::message::domain::MessageId;
use models::{MessageRow, NewMessageRow};
use schema::eion_messages::dsl;

/// `PostgreSQL` connection pool type, shared with other adapters that point
/// at the same database.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;
type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed [`HistoryRepository`] implementation.
#[derive(Clone)]
pub struct PostgresHistoryRepository {
    pool: PgPool,
}

impl PostgresHistoryRepository {
    /// Creates a repository backed by the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn get_conn(pool: &PgPool) -> HistoryRepositoryResult<PooledConn> {
    pool.get()
        .map_err(|e| HistoryRepositoryError::persistence(std::io::Error::other(e.to_string())))
}

async fn run_blocking<F, T>(f: F) -> HistoryRepositoryResult<T>
where
    F: FnOnce() -> HistoryRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| HistoryRepositoryError::persistence(std::io::Error::other(e.to_string())))?
}

#[async_trait]
impl HistoryRepository for PostgresHistoryRepository {
    async fn append_batch(&self, messages: &[StoredMessage]) -> HistoryRepositoryResult<()> {
        let pool = self.pool.clone();
        let rows = messages
            .iter()
            .map(|message| {
                NewMessageRow::try_from_domain(message)
                    .map_err(|e| HistoryRepositoryError::persistence(std::io::Error::other(e)))
            })
            .collect::<HistoryRepositoryResult<Vec<_>>>()?;
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            conn.transaction(|conn| {
                diesel::insert_into(dsl::eion_messages)
                    .values(&rows)
                    .execute(conn)
            })
            .map_err(|e| HistoryRepositoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(())
        })
        .await
    }

    async fn find_by_session(
        &self,
        session_id: SessionId,
    ) -> HistoryRepositoryResult<Vec<StoredMessage>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows = dsl::eion_messages
                .filter(dsl::session_id.eq(session_id.into_inner()))
                .filter(dsl::deleted_at.is_null())
                .order(dsl::created_at.asc())
                .select(MessageRow::as_select())
                .load(&mut conn)
                .map_err(|e| HistoryRepositoryError::persistence(std::io::Error::other(e.to_string())))?;
            rows.into_iter()
                .map(|row| {
                    row.try_into_domain()
                        .map_err(|e| HistoryRepositoryError::persistence(std::io::Error::other(e)))
                })
                .collect()
        })
        .await
    }

    async fn find_by_id(&self, id: MessageId) -> HistoryRepositoryResult<Option<StoredMessage>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let row = dsl::eion_messages
                .filter(dsl::id.eq(id.into_inner()))
                .select(MessageRow::as_select())
                .first(&mut conn)
                .optional()
                .map_err(|e| HistoryRepositoryError::persistence(std::io::Error::other(e.to_string())))?;
            row.map(MessageRow::try_into_domain)
                .transpose()
                .map_err(|e| HistoryRepositoryError::persistence(std::io::Error::other(e)))
        })
        .await
    }

    async fn health_check(&self) -> HistoryRepositoryResult<()> {
        let pool = self.pool.clone();
        run_blocking(move || {
            get_conn(&pool)?;
            Ok(())
        })
        .await
    }

    async fn delete_by_session(
        &self,
        session_id: SessionId,
        now: chrono::DateTime<chrono::Utc>,
    ) -> HistoryRepositoryResult<()> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            diesel::update(
                dsl::eion_messages
                    .filter(dsl::session_id.eq(session_id.into_inner()))
                    .filter(dsl::deleted_at.is_null()),
            )
            .set(dsl::deleted_at.eq(Some(now)))
            .execute(&mut conn)
            .map_err(|e| HistoryRepositoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(())
        })
        .await
    }
}
