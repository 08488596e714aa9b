//! Diesel model types for the append-only agent interaction log.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use super::schema::agent_interaction_logs;
use crate::audit::domain::{AgentInteractionLog, PersistedInteractionLogData};
use crate::ids::{AgentId, InteractionLogId, SessionId, UserId};

/// Database row representation of an [`AgentInteractionLog`].
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = agent_interaction_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InteractionLogRow {
    /// Log entry identifier.
    pub id: Uuid,
    /// Acting agent.
    pub agent_id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Session scope, if any.
    pub session_id: Option<Uuid>,
    /// Logical operation name.
    pub operation: String,
    /// HTTP endpoint path.
    pub endpoint: String,
    /// HTTP method.
    pub method: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error message, if failed.
    pub error_msg: Option<String>,
    /// When the operation occurred.
    pub timestamp: DateTime<Utc>,
    /// Request metadata.
    pub request_data: Value,
}

/// Data for inserting a log row. Entries are append-only: no update path exists.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = agent_interaction_logs)]
pub struct NewInteractionLogRow {
    /// Log entry identifier.
    pub id: Uuid,
    /// Acting agent.
    pub agent_id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Session scope, if any.
    pub session_id: Option<Uuid>,
    /// Logical operation name.
    pub operation: String,
    /// HTTP endpoint path.
    pub endpoint: String,
    /// HTTP method.
    pub method: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error message, if failed.
    pub error_msg: Option<String>,
    /// When the operation occurred.
    pub timestamp: DateTime<Utc>,
    /// Request metadata.
    pub request_data: Value,
}

impl From<&AgentInteractionLog> for NewInteractionLogRow {
    fn from(log: &AgentInteractionLog) -> Self {
        Self {
            id: log.id().into_inner(),
            agent_id: log.agent_id().into_inner(),
            user_id: log.user_id().into_inner(),
            session_id: log.session_id().map(SessionId::into_inner),
            operation: log.operation().to_owned(),
            endpoint: log.endpoint().to_owned(),
            method: log.method().to_owned(),
            success: log.success(),
            error_msg: log.error_msg().map(str::to_owned),
            timestamp: log.timestamp(),
            request_data: Value::Object(log.request_data().clone()),
        }
    }
}

impl InteractionLogRow {
    /// Reconstructs a domain [`AgentInteractionLog`] from a stored row.
    ///
    /// # Errors
    ///
    /// Returns an error message if `request_data` is not a JSON object.
    pub fn try_into_domain(self) -> Result<AgentInteractionLog, String> {
        let request_data = match self.request_data {
            Value::Object(map) => map,
            other => return Err(format!("expected JSON object for request_data, got {other}")),
        };
        Ok(AgentInteractionLog::from_persisted(PersistedInteractionLogData {
            id: InteractionLogId::from_uuid(self.id),
            agent_id: AgentId::from_uuid(self.agent_id),
            user_id: UserId::from_uuid(self.user_id),
            session_id: self.session_id.map(SessionId::from_uuid),
            operation: self.operation,
            endpoint: self.endpoint,
            method: self.method,
            success: self.success,
            error_msg: self.error_msg,
            timestamp: self.timestamp,
            request_data,
        }))
    }
}
