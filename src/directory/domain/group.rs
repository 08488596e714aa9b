//! Agent group and session type aggregates.
//!
//! A session type names the agent groups permitted to read and write a
//! session; an agent group is just a named collection its member agents
//! reference by ID (`spec.md` §3's access rule: "a session type restricts
//! access to zero or more named agent groups").

use crate::ids::{AgentGroupId, SessionTypeId};
use serde::{Deserialize, Serialize};

/// A named collection of agents sharing a permission grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentGroup {
    id: AgentGroupId,
    name: String,
}

/// Parameter object for reconstructing a persisted agent group.
pub struct PersistedAgentGroupData {
    /// Persisted group identifier.
    pub id: AgentGroupId,
    /// Persisted group name.
    pub name: String,
}

impl AgentGroup {
    /// Reconstructs an agent group from persisted storage, preserving its
    /// original identifier.
    #[must_use]
    pub fn from_persisted(data: PersistedAgentGroupData) -> Self {
        Self {
            id: data.id,
            name: data.name,
        }
    }

    /// Creates a new agent group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: AgentGroupId::new(),
            name: name.into(),
        }
    }

    /// Returns the group identifier.
    #[must_use]
    pub const fn id(&self) -> AgentGroupId {
        self.id
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the group, for the developer-scope `{variable, value}`
    /// update endpoint.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

/// A session type restricting which agent groups may access sessions of
/// that type. An empty `allowed_group_ids` means unrestricted access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionType {
    id: SessionTypeId,
    name: String,
    allowed_group_ids: Vec<AgentGroupId>,
}

/// Parameter object for reconstructing a persisted session type.
pub struct PersistedSessionTypeData {
    /// Persisted session type identifier.
    pub id: SessionTypeId,
    /// Persisted session type name.
    pub name: String,
    /// Persisted group restriction list.
    pub allowed_group_ids: Vec<AgentGroupId>,
}

impl SessionType {
    /// Reconstructs a session type from persisted storage, preserving its
    /// original identifier.
    #[must_use]
    pub fn from_persisted(data: PersistedSessionTypeData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            allowed_group_ids: data.allowed_group_ids,
        }
    }

    /// Creates a new session type.
    #[must_use]
    pub fn new(name: impl Into<String>, allowed_group_ids: Vec<AgentGroupId>) -> Self {
        Self {
            id: SessionTypeId::new(),
            name: name.into(),
            allowed_group_ids,
        }
    }

    /// Returns the session type identifier.
    #[must_use]
    pub const fn id(&self) -> SessionTypeId {
        self.id
    }

    /// Returns the session type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the agent groups permitted to access sessions of this type.
    /// Empty means unrestricted.
    #[must_use]
    pub fn allowed_group_ids(&self) -> &[AgentGroupId] {
        &self.allowed_group_ids
    }

    /// Returns `true` if `group_id` may access sessions of this type, or if
    /// this session type places no group restriction.
    #[must_use]
    pub fn permits_group(&self, group_id: Option<AgentGroupId>) -> bool {
        if self.allowed_group_ids.is_empty() {
            return true;
        }
        group_id.is_some_and(|group_id| self.allowed_group_ids.contains(&group_id))
    }

    /// Renames the session type, for the developer-scope `{variable,
    /// value}` update endpoint.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replaces the set of agent groups permitted to access sessions of
    /// this type.
    pub fn set_allowed_group_ids(&mut self, allowed_group_ids: Vec<AgentGroupId>) {
        self.allowed_group_ids = allowed_group_ids;
    }
}
