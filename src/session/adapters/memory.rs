//! In-memory session repository for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ids::{SessionId, UserId};
use crate::session::domain::Session;
use crate::session::ports::{SessionRepository, SessionRepositoryError, SessionRepositoryResult};

/// Thread-safe in-memory session repository.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    state: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored sessions, including soft-deleted ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().map(|state| state.len()).unwrap_or(0)
    }

    /// Returns `true` if no sessions are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn store(&self, session: &Session) -> SessionRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| SessionRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        if state.contains_key(&session.id()) {
            return Err(SessionRepositoryError::DuplicateSession(session.id()));
        }
        state.insert(session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &Session) -> SessionRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| SessionRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        let existing = state
            .get(&session.id())
            .ok_or(SessionRepositoryError::NotFound(session.id()))?;
        if session.version() < existing.version() {
            return Err(SessionRepositoryError::VersionConflict {
                session_id: session.id(),
                expected: session.version(),
                actual: existing.version(),
            });
        }
        state.insert(session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: SessionId) -> SessionRepositoryResult<Option<Session>> {
        let state = self
            .state
            .read()
            .map_err(|err| SessionRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> SessionRepositoryResult<Vec<Session>> {
        let state = self
            .state
            .read()
            .map_err(|err| SessionRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state
            .values()
            .filter(|session| session.user_id() == user_id && !session.is_deleted())
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> SessionRepositoryResult<Vec<Session>> {
        let state = self
            .state
            .read()
            .map_err(|err| SessionRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.values().cloned().collect())
    }
}
