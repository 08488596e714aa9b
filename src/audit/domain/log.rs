//! The `AgentInteractionLog` aggregate (`spec.md` §3, §4.5).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::{AgentId, InteractionLogId, SessionId, UserId};

/// One append-only record of an agent's interaction with the service.
///
/// Owned by the service; no agent may mutate an entry after it is written
/// (`spec.md` §3 Ownership).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInteractionLog {
    id: InteractionLogId,
    agent_id: AgentId,
    user_id: UserId,
    session_id: Option<SessionId>,
    operation: String,
    endpoint: String,
    method: String,
    success: bool,
    error_msg: Option<String>,
    timestamp: DateTime<Utc>,
    request_data: Map<String, Value>,
}

/// Parameter object for reconstructing a persisted log entry.
#[expect(clippy::too_many_arguments, reason = "mirrors the entity's flat attribute list")]
pub struct PersistedInteractionLogData {
    /// Persisted entry identifier.
    pub id: InteractionLogId,
    /// Persisted acting agent.
    pub agent_id: AgentId,
    /// Persisted owning user.
    pub user_id: UserId,
    /// Persisted session scope, if any.
    pub session_id: Option<SessionId>,
    /// Persisted operation name.
    pub operation: String,
    /// Persisted endpoint path.
    pub endpoint: String,
    /// Persisted HTTP method.
    pub method: String,
    /// Persisted success flag.
    pub success: bool,
    /// Persisted error message.
    pub error_msg: Option<String>,
    /// Persisted timestamp.
    pub timestamp: DateTime<Utc>,
    /// Persisted request metadata.
    pub request_data: Map<String, Value>,
}

impl AgentInteractionLog {
    /// Reconstructs a log entry from persisted storage, preserving its
    /// original identifier.
    #[must_use]
    pub fn from_persisted(data: PersistedInteractionLogData) -> Self {
        Self {
            id: data.id,
            agent_id: data.agent_id,
            user_id: data.user_id,
            session_id: data.session_id,
            operation: data.operation,
            endpoint: data.endpoint,
            method: data.method,
            success: data.success,
            error_msg: data.error_msg,
            timestamp: data.timestamp,
            request_data: data.request_data,
        }
    }

    /// Creates a new log entry.
    #[must_use]
    #[expect(clippy::too_many_arguments, reason = "mirrors the entity's flat attribute list")]
    pub fn new(
        agent_id: AgentId,
        user_id: UserId,
        session_id: Option<SessionId>,
        operation: impl Into<String>,
        endpoint: impl Into<String>,
        method: impl Into<String>,
        success: bool,
        error_msg: Option<String>,
        timestamp: DateTime<Utc>,
        request_data: Map<String, Value>,
    ) -> Self {
        Self {
            id: InteractionLogId::new(),
            agent_id,
            user_id,
            session_id,
            operation: operation.into(),
            endpoint: endpoint.into(),
            method: method.into(),
            success,
            error_msg,
            timestamp,
            request_data,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> InteractionLogId {
        self.id
    }

    /// Returns the acting agent.
    #[must_use]
    pub const fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the session scope, if the operation was session-scoped.
    #[must_use]
    pub const fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    /// Returns the logical operation name, e.g. `"ingest"`.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Returns the HTTP endpoint path.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns `true` if the operation succeeded.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// Returns the error message, if the operation failed.
    #[must_use]
    pub fn error_msg(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    /// Returns when the operation occurred.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the request metadata (`status_code`, `response_time_ms`, `query_params`).
    #[must_use]
    pub const fn request_data(&self) -> &Map<String, Value> {
        &self.request_data
    }
}
