//! `/cluster/v1/agent-groups` — CRUD + list (`spec.md` §6).

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::directory::domain::AgentGroup;
use crate::directory::ports::AgentGroupRepository as _;
use crate::http::auth::require_developer_auth;
use crate::http::error::ApiError;
use crate::http::state::AppState;
use crate::ids::AgentGroupId;

#[derive(Debug, Deserialize)]
pub struct CreateAgentGroupBody {
    name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAgentGroupBody {
    variable: String,
    value: serde_json::Value,
}

async fn find_group(state: &AppState, id: AgentGroupId) -> Result<AgentGroup, ApiError> {
    state
        .agent_groups
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("agent group {id} not found")))
}

/// `POST /cluster/v1/agent-groups`.
///
/// # Errors
///
/// Returns a store failure.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateAgentGroupBody>,
) -> Result<(StatusCode, Json<AgentGroup>), ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let group = AgentGroup::new(body.name);
    state.agent_groups.store(&group).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// `GET /cluster/v1/agent-groups`.
///
/// # Errors
///
/// Returns a store failure.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<AgentGroup>>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    Ok(Json(state.agent_groups.list_all().await?))
}

/// `GET /cluster/v1/agent-groups/{id}`.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the group does not exist.
pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<AgentGroup>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    Ok(Json(find_group(&state, AgentGroupId::from_uuid(id)).await?))
}

/// `PUT /cluster/v1/agent-groups/{id}` — `{variable: "name", value}`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for an unrecognised `variable`.
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAgentGroupBody>,
) -> Result<Json<AgentGroup>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let mut group = find_group(&state, AgentGroupId::from_uuid(id)).await?;
    match body.variable.as_str() {
        "name" => {
            let name = body
                .value
                .as_str()
                .ok_or_else(|| ApiError::Validation("name must be a string".to_owned()))?;
            group.rename(name);
        }
        other => return Err(ApiError::Validation(format!("unknown agent group variable: {other}"))),
    }
    state.agent_groups.update(&group).await?;
    Ok(Json(group))
}

/// `DELETE /cluster/v1/agent-groups/{id}` — hard delete.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the group does not exist.
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let id = AgentGroupId::from_uuid(id);
    find_group(&state, id).await?;
    state.agent_groups.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
