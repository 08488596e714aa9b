//! Repository port for session persistence.

use crate::ids::{SessionId, UserId};
use crate::session::domain::Session;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for session repository operations.
pub type SessionRepositoryResult<T> = Result<T, SessionRepositoryError>;

/// Session persistence contract.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Stores a newly created session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionRepositoryError::DuplicateSession`] when a session
    /// with the same identifier already exists.
    async fn store(&self, session: &Session) -> SessionRepositoryResult<()>;

    /// Persists changes to an existing session (name, version, deletion).
    ///
    /// # Errors
    ///
    /// Returns [`SessionRepositoryError::NotFound`] when the session does
    /// not exist, or [`SessionRepositoryError::VersionConflict`] when the
    /// stored version has advanced past the version being written.
    async fn update(&self, session: &Session) -> SessionRepositoryResult<()>;

    /// Finds a session by identifier, including soft-deleted sessions.
    async fn find_by_id(&self, id: SessionId) -> SessionRepositoryResult<Option<Session>>;

    /// Returns every non-deleted session owned by `user_id`.
    async fn find_by_user(&self, user_id: UserId) -> SessionRepositoryResult<Vec<Session>>;

    /// Returns every session, including soft-deleted ones, for the
    /// developer-scope list endpoint.
    async fn list_all(&self) -> SessionRepositoryResult<Vec<Session>>;
}

/// Errors returned by session repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SessionRepositoryError {
    /// A session with the same identifier already exists.
    #[error("duplicate session identifier: {0}")]
    DuplicateSession(SessionId),

    /// The session was not found.
    #[error("session not found: {0}")]
    NotFound(SessionId),

    /// An update raced against a concurrent writer that already advanced
    /// the session's version.
    #[error("session {session_id} version conflict: expected {expected}, found {actual}")]
    VersionConflict {
        /// The session whose update was rejected.
        session_id: SessionId,
        /// The version the caller expected to overwrite.
        expected: u64,
        /// The version actually stored.
        actual: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SessionRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
