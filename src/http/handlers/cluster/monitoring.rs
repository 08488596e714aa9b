//! `/cluster/v1/monitoring` — `MonitorAgent`/`MonitorSession` (`spec.md` §4.5).

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::ports::{InteractionLogRepository as _, DEFAULT_LIMIT};
use crate::audit::services::{collaboration_flows, monitor_agent, monitor_session, AgentActivitySummary, HandoffPattern, SessionActivitySummary};
use crate::http::auth::require_developer_auth;
use crate::http::error::ApiError;
use crate::http::state::AppState;
use crate::ids::{AgentId, SessionId};

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    limit: Option<usize>,
}

/// `GET /cluster/v1/monitoring/agents/{id}`.
///
/// # Errors
///
/// Returns a store failure.
pub async fn agent(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<AgentActivitySummary>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let agent_id = AgentId::from_uuid(id);
    let logs = state.audit.find_by_agent(agent_id, query.limit.unwrap_or(DEFAULT_LIMIT)).await?;
    Ok(Json(monitor_agent(agent_id, &logs)))
}

/// Combined `MonitorSession` response: the session's activity summary plus
/// its derived agent handoff sequence.
#[derive(Debug, Serialize)]
pub struct SessionMonitorResponse {
    #[serde(flatten)]
    summary: SessionActivitySummary,
    handoffs: Vec<HandoffPattern>,
}

/// `GET /cluster/v1/monitoring/sessions/{id}`.
///
/// # Errors
///
/// Returns a store failure.
pub async fn session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<SessionMonitorResponse>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let session_id = SessionId::from_uuid(id);
    let logs = state.audit.find_by_session(session_id, query.limit.unwrap_or(DEFAULT_LIMIT)).await?;
    let summary = monitor_session(session_id, &logs);
    let handoffs = collaboration_flows(session_id, &logs);
    Ok(Json(SessionMonitorResponse { summary, handoffs }))
}
