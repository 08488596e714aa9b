//! `PostgreSQL` adapter for session persistence.

mod models;
mod schema;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};

use crate::ids::{SessionId, UserId};
use crate::session::domain::Session;
use crate::session::ports::{SessionRepository, SessionRepositoryError, SessionRepositoryResult};
use models::{NewSession, SessionRow};
use schema::sessions::dsl;

/// `PostgreSQL` connection pool type, shared with other adapters that point
/// at the same database.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;
type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed [`SessionRepository`] implementation.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    /// Creates a repository backed by the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn get_conn(pool: &PgPool) -> SessionRepositoryResult<PooledConn> {
    pool.get()
        .map_err(|e| SessionRepositoryError::persistence(std::io::Error::other(e.to_string())))
}

async fn run_blocking<F, T>(f: F) -> SessionRepositoryResult<T>
where
    F: FnOnce() -> SessionRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SessionRepositoryError::persistence(std::io::Error::other(e.to_string())))?
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn store(&self, session: &Session) -> SessionRepositoryResult<()> {
        let pool = self.pool.clone();
        let row = NewSession::try_from_domain(session)
            .map_err(|e| SessionRepositoryError::persistence(std::io::Error::other(e)))?;
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            diesel::insert_into(dsl::sessions)
                .values(&row)
                .execute(&mut conn)
                .map_err(|e| SessionRepositoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, session: &Session) -> SessionRepositoryResult<()> {
        let pool = self.pool.clone();
        let row = NewSession::try_from_domain(session)
            .map_err(|e| SessionRepositoryError::persistence(std::io::Error::other(e)))?;
        let session_id = session.id();
        let expected_version = session.version();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let existing_version = dsl::sessions
                .filter(dsl::id.eq(session_id.into_inner()))
                .select(dsl::version)
                .first::<i64>(&mut conn)
                .optional()
                .map_err(|e| SessionRepositoryError::persistence(std::io::Error::other(e.to_string())))?
                .ok_or(SessionRepositoryError::NotFound(session_id))?;

            #[expect(
                clippy::cast_sign_loss,
                reason = "stored version is always non-negative"
            )]
            let existing_version = existing_version as u64;
            if expected_version < existing_version {
                return Err(SessionRepositoryError::VersionConflict {
                    session_id,
                    expected: expected_version,
                    actual: existing_version,
                });
            }

            diesel::update(dsl::sessions.filter(dsl::id.eq(session_id.into_inner())))
                .set(&row)
                .execute(&mut conn)
                .map_err(|e| SessionRepositoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: SessionId) -> SessionRepositoryResult<Option<Session>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let row = dsl::sessions
                .filter(dsl::id.eq(id.into_inner()))
                .select(SessionRow::as_select())
                .first(&mut conn)
                .optional()
                .map_err(|e| SessionRepositoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(row.map(SessionRow::into_domain))
        })
        .await
    }

    async fn find_by_user(&self, user_id: UserId) -> SessionRepositoryResult<Vec<Session>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows = dsl::sessions
                .filter(dsl::user_id.eq(user_id.into_inner()))
                .filter(dsl::deleted_at.is_null())
                .select(SessionRow::as_select())
                .load(&mut conn)
                .map_err(|e| SessionRepositoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(rows.into_iter().map(SessionRow::into_domain).collect())
        })
        .await
    }

    async fn list_all(&self) -> SessionRepositoryResult<Vec<Session>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows = dsl::sessions
                .select(SessionRow::as_select())
                .load(&mut conn)
                .map_err(|e| SessionRepositoryError::persistence(std::io::Error::other(e.to_string())))?;
            Ok(rows.into_iter().map(SessionRow::into_domain).collect())
        })
        .await
    }
}
