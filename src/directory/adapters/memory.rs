//! In-memory directory repositories for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::domain::{Agent, AgentGroup, SessionType, User};
use crate::directory::ports::{
    AgentGroupRepository, AgentRepository, DirectoryError, DirectoryResult, SessionTypeRepository,
    UserRepository,
};
use crate::ids::{AgentGroupId, AgentId, SessionTypeId, UserId};

/// Thread-safe in-memory directory, combining users, agents, groups, and
/// session types behind a single shared state the way a small deployment's
/// directory fits comfortably in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    agents: Arc<RwLock<HashMap<AgentId, Agent>>>,
    groups: Arc<RwLock<HashMap<AgentGroupId, AgentGroup>>>,
    session_types: Arc<RwLock<HashMap<SessionTypeId, SessionType>>>,
}

impl InMemoryDirectory {
    /// Creates an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_err(err: impl std::fmt::Display) -> DirectoryError {
    DirectoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryDirectory {
    async fn store(&self, user: &User) -> DirectoryResult<()> {
        let mut state = self.users.write().map_err(lock_err)?;
        state.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> DirectoryResult<()> {
        let mut state = self.users.write().map_err(lock_err)?;
        if !state.contains_key(&user.id()) {
            return Err(DirectoryError::NotFound);
        }
        state.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> DirectoryResult<Option<User>> {
        let state = self.users.read().map_err(lock_err)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_all(&self) -> DirectoryResult<Vec<User>> {
        let state = self.users.read().map_err(lock_err)?;
        Ok(state.values().filter(|user| !user.is_deleted()).cloned().collect())
    }
}

#[async_trait]
impl AgentRepository for InMemoryDirectory {
    async fn store(&self, agent: &Agent) -> DirectoryResult<()> {
        let mut state = self.agents.write().map_err(lock_err)?;
        state.insert(agent.id(), agent.clone());
        Ok(())
    }

    async fn update(&self, agent: &Agent) -> DirectoryResult<()> {
        let mut state = self.agents.write().map_err(lock_err)?;
        if !state.contains_key(&agent.id()) {
            return Err(DirectoryError::NotFound);
        }
        state.insert(agent.id(), agent.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: AgentId) -> DirectoryResult<Option<Agent>> {
        let state = self.agents.read().map_err(lock_err)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_all(&self) -> DirectoryResult<Vec<Agent>> {
        let state = self.agents.read().map_err(lock_err)?;
        Ok(state.values().cloned().collect())
    }
}

#[async_trait]
impl AgentGroupRepository for InMemoryDirectory {
    async fn store(&self, group: &AgentGroup) -> DirectoryResult<()> {
        let mut state = self.groups.write().map_err(lock_err)?;
        state.insert(group.id(), group.clone());
        Ok(())
    }

    async fn update(&self, group: &AgentGroup) -> DirectoryResult<()> {
        let mut state = self.groups.write().map_err(lock_err)?;
        if !state.contains_key(&group.id()) {
            return Err(DirectoryError::NotFound);
        }
        state.insert(group.id(), group.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: AgentGroupId) -> DirectoryResult<Option<AgentGroup>> {
        let state = self.groups.read().map_err(lock_err)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_all(&self) -> DirectoryResult<Vec<AgentGroup>> {
        let state = self.groups.read().map_err(lock_err)?;
        Ok(state.values().cloned().collect())
    }

    async fn delete(&self, id: AgentGroupId) -> DirectoryResult<()> {
        let mut state = self.groups.write().map_err(lock_err)?;
        state.remove(&id).ok_or(DirectoryError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl SessionTypeRepository for InMemoryDirectory {
    async fn store(&self, session_type: &SessionType) -> DirectoryResult<()> {
        let mut state = self.session_types.write().map_err(lock_err)?;
        state.insert(session_type.id(), session_type.clone());
        Ok(())
    }

    async fn update(&self, session_type: &SessionType) -> DirectoryResult<()> {
        let mut state = self.session_types.write().map_err(lock_err)?;
        if !state.contains_key(&session_type.id()) {
            return Err(DirectoryError::NotFound);
        }
        state.insert(session_type.id(), session_type.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: SessionTypeId) -> DirectoryResult<Option<SessionType>> {
        let state = self.session_types.read().map_err(lock_err)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_all(&self) -> DirectoryResult<Vec<SessionType>> {
        let state = self.session_types.read().map_err(lock_err)?;
        Ok(state.values().cloned().collect())
    }

    async fn delete(&self, id: SessionTypeId) -> DirectoryResult<()> {
        let mut state = self.session_types.write().map_err(lock_err)?;
        state.remove(&id).ok_or(DirectoryError::NotFound)?;
        Ok(())
    }
}
