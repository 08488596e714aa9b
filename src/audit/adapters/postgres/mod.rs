//! `PostgreSQL` adapter for the append-only agent interaction log, following
//! [`crate::history::adapters::postgres::PostgresHistoryRepository`]'s
//! pool-per-adapter, blocking-offloaded shape.

mod models;
mod schema;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};

use crate::audit::domain::AgentInteractionLog;
use crate::audit::ports::{
    InteractionLogRepository, InteractionLogRepositoryError, InteractionLogRepositoryResult,
};
use crate::ids::{AgentId, SessionId, UserId};
use models::{InteractionLogRow, NewInteractionLogRow};
use schema::agent_interaction_logs::dsl;

/// `PostgreSQL` connection pool type, shared with other adapters that point
/// at the same database.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;
type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed [`InteractionLogRepository`] implementation.
#[derive(Clone)]
pub struct PostgresInteractionLogRepository {
    pool: PgPool,
}

impl PostgresInteractionLogRepository {
    /// Creates a repository backed by the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn get_conn(pool: &PgPool) -> InteractionLogRepositoryResult<PooledConn> {
    pool.get()
        .map_err(|e| InteractionLogRepositoryError::persistence(std::io::Error::other(e.to_string())))
}

async fn run_blocking<F, T>(f: F) -> InteractionLogRepositoryResult<T>
where
    F: FnOnce() -> InteractionLogRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| InteractionLogRepositoryError::persistence(std::io::Error::other(e.to_string())))?
}

fn rows_to_domain(
    rows: Vec<InteractionLogRow>,
) -> InteractionLogRepositoryResult<Vec<AgentInteractionLog>> {
    rows.into_iter()
        .map(|row| {
            row.try_into_domain()
                .map_err(|e| InteractionLogRepositoryError::persistence(std::io::Error::other(e)))
        })
        .collect()
}

#[async_trait]
impl InteractionLogRepository for PostgresInteractionLogRepository {
    async fn record(&self, log: AgentInteractionLog) -> InteractionLogRepositoryResult<()> {
        let pool = self.pool.clone();
        let row = NewInteractionLogRow::from(&log);
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            diesel::insert_into(dsl::agent_interaction_logs)
                .values(&row)
                .execute(&mut conn)
                .map_err(|e| {
                    InteractionLogRepositoryError::persistence(std::io::Error::other(e.to_string()))
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_agent(
        &self,
        agent_id: AgentId,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<AgentInteractionLog>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows = dsl::agent_interaction_logs
                .filter(dsl::agent_id.eq(agent_id.into_inner()))
                .order(dsl::timestamp.desc())
                .limit(limit_as_i64(limit))
                .select(InteractionLogRow::as_select())
                .load(&mut conn)
                .map_err(|e| {
                    InteractionLogRepositoryError::persistence(std::io::Error::other(e.to_string()))
                })?;
            rows_to_domain(rows)
        })
        .await
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<AgentInteractionLog>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows = dsl::agent_interaction_logs
                .filter(dsl::user_id.eq(user_id.into_inner()))
                .order(dsl::timestamp.desc())
                .limit(limit_as_i64(limit))
                .select(InteractionLogRow::as_select())
                .load(&mut conn)
                .map_err(|e| {
                    InteractionLogRepositoryError::persistence(std::io::Error::other(e.to_string()))
                })?;
            rows_to_domain(rows)
        })
        .await
    }

    async fn find_by_session(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<AgentInteractionLog>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows = dsl::agent_interaction_logs
                .filter(dsl::session_id.eq(Some(session_id.into_inner())))
                .order(dsl::timestamp.desc())
                .limit(limit_as_i64(limit))
                .select(InteractionLogRow::as_select())
                .load(&mut conn)
                .map_err(|e| {
                    InteractionLogRepositoryError::persistence(std::io::Error::other(e.to_string()))
                })?;
            rows_to_domain(rows)
        })
        .await
    }

    async fn find_by_time_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<AgentInteractionLog>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows = dsl::agent_interaction_logs
                .filter(dsl::timestamp.ge(start))
                .filter(dsl::timestamp.le(end))
                .order(dsl::timestamp.desc())
                .limit(limit_as_i64(limit))
                .select(InteractionLogRow::as_select())
                .load(&mut conn)
                .map_err(|e| {
                    InteractionLogRepositoryError::persistence(std::io::Error::other(e.to_string()))
                })?;
            rows_to_domain(rows)
        })
        .await
    }
}

/// Clamps a page-size `limit` into the range `diesel`'s `LIMIT` accepts.
fn limit_as_i64(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
