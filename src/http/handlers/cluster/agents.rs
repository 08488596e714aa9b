//! `/cluster/v1/agents` — agent registration CRUD + list (`spec.md` §6).

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use mockable::DefaultClock;
use serde::Deserialize;
use uuid::Uuid;

use crate::directory::domain::{Agent, DirectoryStatus, PermissionSet};
use crate::directory::ports::AgentRepository as _;
use crate::http::auth::require_developer_auth;
use crate::http::error::ApiError;
use crate::http::state::AppState;
use crate::ids::{AgentGroupId, AgentId};

#[derive(Debug, Deserialize)]
pub struct CreateAgentBody {
    name: String,
    permissions: String,
    #[serde(default)]
    is_guest: bool,
    #[serde(default)]
    group_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAgentBody {
    variable: String,
    value: serde_json::Value,
}

async fn find_agent(state: &AppState, id: AgentId) -> Result<Agent, ApiError> {
    state
        .agents
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("agent {id} not found")))
}

fn parse_permissions(raw: &str) -> Result<PermissionSet, ApiError> {
    PermissionSet::try_from(raw).map_err(|e| ApiError::Validation(e.to_string()))
}

/// `POST /cluster/v1/agents`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] if `permissions` is not a valid
/// permission string.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateAgentBody>,
) -> Result<(StatusCode, Json<Agent>), ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let permissions = parse_permissions(&body.permissions)?;
    let agent = Agent::new(
        body.name,
        permissions,
        body.is_guest,
        body.group_id.map(AgentGroupId::from_uuid),
        &DefaultClock,
    );
    state.agents.store(&agent).await?;
    Ok((StatusCode::CREATED, Json(agent)))
}

/// `GET /cluster/v1/agents`.
///
/// # Errors
///
/// Returns a store failure.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Agent>>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    Ok(Json(state.agents.list_all().await?))
}

/// `GET /cluster/v1/agents/{id}`.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the agent does not exist.
pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Agent>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    Ok(Json(find_agent(&state, AgentId::from_uuid(id)).await?))
}

/// `PUT /cluster/v1/agents/{id}` — `{variable, value}`, `variable` one of
/// `name`, `permissions`, `group_id`, `status`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for an unrecognised `variable` or a
/// malformed `value`.
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAgentBody>,
) -> Result<Json<Agent>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let mut agent = find_agent(&state, AgentId::from_uuid(id)).await?;
    match body.variable.as_str() {
        "name" => {
            let name = body
                .value
                .as_str()
                .ok_or_else(|| ApiError::Validation("name must be a string".to_owned()))?;
            agent.rename(name, &DefaultClock);
        }
        "permissions" => {
            let raw = body
                .value
                .as_str()
                .ok_or_else(|| ApiError::Validation("permissions must be a string".to_owned()))?;
            agent.set_permissions(parse_permissions(raw)?, &DefaultClock);
        }
        "group_id" => {
            let group_id = match body.value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(
                    s.parse::<Uuid>()
                        .map_err(|e| ApiError::Validation(format!("invalid group_id: {e}")))
                        .map(AgentGroupId::from_uuid)?,
                ),
                _ => return Err(ApiError::Validation("group_id must be a string or null".to_owned())),
            };
            agent.set_group_id(group_id, &DefaultClock);
        }
        "status" => {
            let status = body
                .value
                .as_str()
                .ok_or_else(|| ApiError::Validation("status must be a string".to_owned()))?;
            match DirectoryStatus::try_from(status).map_err(|e| ApiError::Validation(e.to_string()))? {
                DirectoryStatus::Active => agent.activate(&DefaultClock),
                DirectoryStatus::Inactive => agent.deactivate(&DefaultClock),
            }
        }
        other => return Err(ApiError::Validation(format!("unknown agent variable: {other}"))),
    }
    state.agents.update(&agent).await?;
    Ok(Json(agent))
}

/// `DELETE /cluster/v1/agents/{id}` — agents carry no tombstone field, so
/// deletion suspends the agent (`status = inactive`) rather than removing
/// the row.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the agent does not exist.
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let mut agent = find_agent(&state, AgentId::from_uuid(id)).await?;
    agent.deactivate(&DefaultClock);
    state.agents.update(&agent).await?;
    Ok(StatusCode::NO_CONTENT)
}
