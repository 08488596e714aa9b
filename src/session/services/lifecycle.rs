//! Session lifecycle orchestration: creation, rename, soft-deletion.

use crate::ids::{SessionId, SessionTypeId, UserId};
use crate::session::domain::{Session, SessionDomainError};
use crate::session::ports::{SessionRepository, SessionRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for session lifecycle operations.
#[derive(Debug, Error)]
pub enum SessionLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] SessionDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] SessionRepositoryError),
    /// No session exists with the given identifier.
    #[error("session {0} not found")]
    NotFound(SessionId),
}

/// Result type for session lifecycle operations.
pub type SessionLifecycleResult<T> = Result<T, SessionLifecycleError>;

/// Session creation, rename, and soft-deletion orchestration service.
#[derive(Clone)]
pub struct SessionLifecycleService<R, C>
where
    R: SessionRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> SessionLifecycleService<R, C>
where
    R: SessionRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new session lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates and persists a new session for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionLifecycleError::Domain`] when `session_name` is
    /// empty, or [`SessionLifecycleError::Repository`] when persistence
    /// fails.
    pub async fn create(
        &self,
        user_id: UserId,
        session_type_id: Option<SessionTypeId>,
        session_name: Option<String>,
    ) -> SessionLifecycleResult<Session> {
        let session = Session::new(user_id, session_type_id, session_name, &*self.clock)?;
        self.repository.store(&session).await?;
        Ok(session)
    }

    /// Finds a session by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SessionLifecycleError::Repository`] when the lookup fails.
    pub async fn find_by_id(&self, id: SessionId) -> SessionLifecycleResult<Option<Session>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Renames an existing session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionLifecycleError::NotFound`] when no session has the
    /// given ID, [`SessionLifecycleError::Domain`] when `name` is empty, or
    /// [`SessionLifecycleError::Repository`] when persistence fails.
    pub async fn rename(&self, id: SessionId, name: String) -> SessionLifecycleResult<Session> {
        let mut session = self.find_or_error(id).await?;
        session.rename(name, &*self.clock)?;
        self.repository.update(&session).await?;
        Ok(session)
    }

    /// Soft-deletes a session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionLifecycleError::NotFound`] when no session has the
    /// given ID, or [`SessionLifecycleError::Repository`] when persistence
    /// fails.
    pub async fn delete(&self, id: SessionId) -> SessionLifecycleResult<Session> {
        let mut session = self.find_or_error(id).await?;
        session.soft_delete(&*self.clock);
        self.repository.update(&session).await?;
        Ok(session)
    }

    async fn find_or_error(&self, id: SessionId) -> SessionLifecycleResult<Session> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(SessionLifecycleError::NotFound(id))
    }
}
