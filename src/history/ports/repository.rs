//! Port for persisting [`StoredMessage`] records.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::history::domain::StoredMessage;
use crate::ids::SessionId;
use crate::message::domain::MessageId;

/// Errors a [`HistoryRepository`] implementation may return.
#[derive(Debug, Error)]
pub enum HistoryRepositoryError {
    /// A message with this ID already exists.
    #[error("duplicate message: {0}")]
    Duplicate(MessageId),

    /// The underlying store is unreachable or failed.
    #[error("history store error: {0}")]
    Persistence(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

impl HistoryRepositoryError {
    /// Wraps a lower-level error as a [`HistoryRepositoryError::Persistence`].
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for [`HistoryRepository`] operations.
pub type HistoryRepositoryResult<T> = Result<T, HistoryRepositoryError>;

/// Append-only store for ingested messages.
///
/// Messages are immutable once stored, matching `spec.md` §3's invariant
/// that conversational history is never rewritten, only appended to.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Appends a batch of messages within a session. Implementations must
    /// treat the batch as a single atomic unit against the relational store.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryRepositoryError::Duplicate`] if any message ID
    /// already exists, or [`HistoryRepositoryError::Persistence`] on a
    /// storage failure.
    async fn append_batch(&self, messages: &[StoredMessage]) -> HistoryRepositoryResult<()>;

    /// Retrieves all messages for a session in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryRepositoryError::Persistence`] on a storage failure.
    async fn find_by_session(
        &self,
        session_id: SessionId,
    ) -> HistoryRepositoryResult<Vec<StoredMessage>>;

    /// Retrieves a single message by id, if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryRepositoryError::Persistence`] on a storage failure.
    async fn find_by_id(&self, id: MessageId) -> HistoryRepositoryResult<Option<StoredMessage>>;

    /// Verifies connectivity to the relational store, for the `/health` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryRepositoryError::Persistence`] if the store cannot be reached.
    async fn health_check(&self) -> HistoryRepositoryResult<()>;

    /// Tombstones every message belonging to `session_id`, as of `now`
    /// (`spec.md` §3: "deleting a Session tombstones its Messages").
    /// Already-deleted messages are left with their original timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryRepositoryError::Persistence`] on a storage failure.
    async fn delete_by_session(
        &self,
        session_id: SessionId,
        now: chrono::DateTime<chrono::Utc>,
    ) -> HistoryRepositoryResult<()>;
}
