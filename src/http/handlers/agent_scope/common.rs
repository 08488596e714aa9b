//! Shared request/response shapes for the agent-scope handlers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::{AgentId, UserId};
use crate::ingest::domain::{IngestMessageInput, IngestOutcome};
use crate::message::domain::Role;

/// Query parameters every agent-scope call carries (`spec.md` §6).
#[derive(Debug, Deserialize)]
pub struct AgentUserQuery {
    pub agent_id: Uuid,
    pub user_id: Uuid,
}

impl AgentUserQuery {
    pub fn agent_id(&self) -> AgentId {
        AgentId::from_uuid(self.agent_id)
    }

    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.user_id)
    }
}

/// One message as supplied in an ingest request body.
#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub role: String,
    pub role_type: String,
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl MessageBody {
    pub fn into_domain(self) -> Result<IngestMessageInput, crate::http::error::ApiError> {
        let role_type = Role::try_from(self.role_type.as_str())
            .map_err(|e| crate::http::error::ApiError::Validation(e.to_string()))?;
        Ok(IngestMessageInput {
            role: self.role,
            role_type,
            content: self.content,
            metadata: self.metadata,
        })
    }
}

/// `POST`/`PUT .../memories` and `.../knowledge` share this request shape.
#[derive(Debug, Deserialize)]
pub struct IngestBody {
    pub messages: Vec<MessageBody>,
    #[serde(default)]
    pub expected_version: Option<u64>,
}

/// The resolution ladder outcome, rendered for the HTTP response.
#[derive(Debug, Serialize)]
pub struct ResolutionBody {
    pub strategy: String,
    pub requires_manual_action: bool,
}

/// `IngestOutcome`, rendered for the HTTP response.
#[derive(Debug, Serialize)]
pub struct IngestResponseBody {
    pub session_version: u64,
    pub message_ids: Vec<String>,
    pub entities_written: usize,
    pub edges_committed: usize,
    pub edges_invalidated: usize,
    pub resolution: Option<ResolutionBody>,
}

impl From<IngestOutcome> for IngestResponseBody {
    fn from(outcome: IngestOutcome) -> Self {
        Self {
            session_version: outcome.session_version,
            message_ids: outcome.message_ids.iter().map(ToString::to_string).collect(),
            entities_written: outcome.entities_written,
            edges_committed: outcome.edges_committed,
            edges_invalidated: outcome.edges_invalidated,
            resolution: outcome.resolution.map(|r| ResolutionBody {
                strategy: r.strategy.as_str().to_owned(),
                requires_manual_action: r.requires_manual_action,
            }),
        }
    }
}
