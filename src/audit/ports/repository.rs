//! Port over append-only interaction log storage.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::audit::domain::AgentInteractionLog;
use crate::ids::{AgentId, SessionId, UserId};

/// Default page size for query-side log reads (`spec.md` §4.5).
pub const DEFAULT_LIMIT: usize = 100;

/// Result type for [`InteractionLogRepository`] operations.
pub type InteractionLogRepositoryResult<T> = Result<T, InteractionLogRepositoryError>;

/// Errors an [`InteractionLogRepository`] implementation may return.
#[derive(Debug, Error)]
pub enum InteractionLogRepositoryError {
    /// The underlying store is unreachable or failed.
    #[error("interaction log store error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl InteractionLogRepositoryError {
    /// Wraps a lower-level error as [`InteractionLogRepositoryError::Persistence`].
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Append-only log storage, queryable by agent, user, session, and time
/// range (`spec.md` §4.5).
#[async_trait]
pub trait InteractionLogRepository: Send + Sync {
    /// Appends a single entry. Never mutates or removes existing entries.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionLogRepositoryError::Persistence`] on failure.
    async fn record(&self, log: AgentInteractionLog) -> InteractionLogRepositoryResult<()>;

    /// Returns the most recent entries for `agent_id`, newest first, bounded by `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionLogRepositoryError::Persistence`] on failure.
    async fn find_by_agent(
        &self,
        agent_id: AgentId,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<AgentInteractionLog>>;

    /// Returns the most recent entries for `user_id`, newest first, bounded by `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionLogRepositoryError::Persistence`] on failure.
    async fn find_by_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<AgentInteractionLog>>;

    /// Returns the most recent entries for `session_id`, newest first, bounded by `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionLogRepositoryError::Persistence`] on failure.
    async fn find_by_session(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<AgentInteractionLog>>;

    /// Returns entries with `timestamp` in `[start, end]`, newest first, bounded by `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionLogRepositoryError::Persistence`] on failure.
    async fn find_by_time_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<AgentInteractionLog>>;
}
