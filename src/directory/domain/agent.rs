//! Agent aggregate: a client authorised to read and write session data.

use super::{DirectoryStatus, PermissionSet};
use crate::ids::{AgentGroupId, AgentId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// An agent client. Agents authenticate against the agent-scope API
/// (`spec.md` §6) and are granted a [`PermissionSet`] plus, optionally,
/// membership in an [`AgentGroupId`] that session types use to restrict
/// access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    name: String,
    permissions: PermissionSet,
    status: DirectoryStatus,
    is_guest: bool,
    group_id: Option<AgentGroupId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted agent.
#[expect(clippy::too_many_arguments, reason = "mirrors the entity's flat attribute list")]
pub struct PersistedAgentData {
    /// Persisted agent identifier.
    pub id: AgentId,
    /// Persisted display name.
    pub name: String,
    /// Persisted permission grant.
    pub permissions: PermissionSet,
    /// Persisted lifecycle status.
    pub status: DirectoryStatus,
    /// Persisted guest flag.
    pub is_guest: bool,
    /// Persisted group membership.
    pub group_id: Option<AgentGroupId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    /// Reconstructs an agent from persisted storage, preserving its
    /// original identifier.
    #[must_use]
    pub fn from_persisted(data: PersistedAgentData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            permissions: data.permissions,
            status: data.status,
            is_guest: data.is_guest,
            group_id: data.group_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Registers a new, active agent.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        permissions: PermissionSet,
        is_guest: bool,
        group_id: Option<AgentGroupId>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: AgentId::new(),
            name: name.into(),
            permissions,
            status: DirectoryStatus::Active,
            is_guest,
            group_id,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Returns the agent's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the agent's permission grant.
    #[must_use]
    pub const fn permissions(&self) -> PermissionSet {
        self.permissions
    }

    /// Returns the agent's lifecycle status.
    #[must_use]
    pub const fn status(&self) -> DirectoryStatus {
        self.status
    }

    /// Returns `true` if the agent is a transient guest, exempt from any
    /// durable identity expectations placed on registered agents.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        self.is_guest
    }

    /// Returns the agent's group membership, if any.
    #[must_use]
    pub const fn group_id(&self) -> Option<AgentGroupId> {
        self.group_id
    }

    /// Returns `true` if the agent is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, DirectoryStatus::Active)
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Suspends the agent.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.status = DirectoryStatus::Inactive;
        self.updated_at = clock.utc();
    }

    /// Reactivates the agent.
    pub fn activate(&mut self, clock: &impl Clock) {
        self.status = DirectoryStatus::Active;
        self.updated_at = clock.utc();
    }

    /// Renames the agent, for the developer-scope `{variable, value}`
    /// update endpoint.
    pub fn rename(&mut self, name: impl Into<String>, clock: &impl Clock) {
        self.name = name.into();
        self.updated_at = clock.utc();
    }

    /// Replaces the agent's permission grant.
    pub fn set_permissions(&mut self, permissions: PermissionSet, clock: &impl Clock) {
        self.permissions = permissions;
        self.updated_at = clock.utc();
    }

    /// Replaces the agent's group membership.
    pub fn set_group_id(&mut self, group_id: Option<AgentGroupId>, clock: &impl Clock) {
        self.group_id = group_id;
        self.updated_at = clock.utc();
    }
}
