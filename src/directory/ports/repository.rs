//! Persistence contracts for directory entities.

use crate::directory::domain::{Agent, AgentGroup, SessionType, User};
use crate::ids::{AgentGroupId, AgentId, SessionTypeId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type shared by every directory repository port.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Errors returned by directory repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The requested entity was not found.
    #[error("not found")]
    NotFound,
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    async fn store(&self, user: &User) -> DirectoryResult<()>;
    /// Persists changes to an existing user (currently: soft-deletion).
    async fn update(&self, user: &User) -> DirectoryResult<()>;
    /// Finds a user by identifier.
    async fn find_by_id(&self, id: UserId) -> DirectoryResult<Option<User>>;
    /// Returns every non-deleted user, for the developer-scope list endpoint.
    async fn list_all(&self) -> DirectoryResult<Vec<User>>;
}

/// Agent persistence contract.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Stores a new agent.
    async fn store(&self, agent: &Agent) -> DirectoryResult<()>;
    /// Persists changes to an existing agent.
    async fn update(&self, agent: &Agent) -> DirectoryResult<()>;
    /// Finds an agent by identifier.
    async fn find_by_id(&self, id: AgentId) -> DirectoryResult<Option<Agent>>;
    /// Returns every registered agent, for the developer-scope list endpoint.
    async fn list_all(&self) -> DirectoryResult<Vec<Agent>>;
}

/// Agent group persistence contract.
#[async_trait]
pub trait AgentGroupRepository: Send + Sync {
    /// Stores a new agent group.
    async fn store(&self, group: &AgentGroup) -> DirectoryResult<()>;
    /// Persists changes to an existing agent group.
    async fn update(&self, group: &AgentGroup) -> DirectoryResult<()>;
    /// Finds an agent group by identifier.
    async fn find_by_id(&self, id: AgentGroupId) -> DirectoryResult<Option<AgentGroup>>;
    /// Returns every agent group, for the developer-scope list endpoint.
    async fn list_all(&self) -> DirectoryResult<Vec<AgentGroup>>;
    /// Removes an agent group. Groups carry no tombstone field: membership
    /// is a pure reference, so this is a hard delete.
    async fn delete(&self, id: AgentGroupId) -> DirectoryResult<()>;
}

/// Session type persistence contract.
#[async_trait]
pub trait SessionTypeRepository: Send + Sync {
    /// Stores a new session type.
    async fn store(&self, session_type: &SessionType) -> DirectoryResult<()>;
    /// Persists changes to an existing session type.
    async fn update(&self, session_type: &SessionType) -> DirectoryResult<()>;
    /// Finds a session type by identifier.
    async fn find_by_id(&self, id: SessionTypeId) -> DirectoryResult<Option<SessionType>>;
    /// Returns every session type, for the developer-scope list endpoint.
    async fn list_all(&self) -> DirectoryResult<Vec<SessionType>>;
    /// Removes a session type. Like agent groups, carries no tombstone field.
    async fn delete(&self, id: SessionTypeId) -> DirectoryResult<()>;
}
