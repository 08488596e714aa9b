//! `/cluster/v1/session-types` — CRUD + list (`spec.md` §6).

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::directory::domain::SessionType;
use crate::directory::ports::SessionTypeRepository as _;
use crate::http::auth::require_developer_auth;
use crate::http::error::ApiError;
use crate::http::state::AppState;
use crate::ids::{AgentGroupId, SessionTypeId};

#[derive(Debug, Deserialize)]
pub struct CreateSessionTypeBody {
    name: String,
    #[serde(default)]
    allowed_group_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSessionTypeBody {
    variable: String,
    value: serde_json::Value,
}

async fn find_session_type(state: &AppState, id: SessionTypeId) -> Result<SessionType, ApiError> {
    state
        .session_types
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("session type {id} not found")))
}

fn parse_group_ids(value: &serde_json::Value) -> Result<Vec<AgentGroupId>, ApiError> {
    let array = value
        .as_array()
        .ok_or_else(|| ApiError::Validation("allowed_group_ids must be an array".to_owned()))?;
    array
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .ok_or_else(|| ApiError::Validation("allowed_group_ids entries must be strings".to_owned()))
                .and_then(|s| {
                    s.parse::<Uuid>()
                        .map_err(|e| ApiError::Validation(format!("invalid group id: {e}")))
                })
                .map(AgentGroupId::from_uuid)
        })
        .collect()
}

/// `POST /cluster/v1/session-types`.
///
/// # Errors
///
/// Returns a store failure.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateSessionTypeBody>,
) -> Result<(StatusCode, Json<SessionType>), ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let allowed_group_ids = body.allowed_group_ids.into_iter().map(AgentGroupId::from_uuid).collect();
    let session_type = SessionType::new(body.name, allowed_group_ids);
    state.session_types.store(&session_type).await?;
    Ok((StatusCode::CREATED, Json(session_type)))
}

/// `GET /cluster/v1/session-types`.
///
/// # Errors
///
/// Returns a store failure.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SessionType>>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    Ok(Json(state.session_types.list_all().await?))
}

/// `GET /cluster/v1/session-types/{id}`.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the session type does not exist.
pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionType>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    Ok(Json(find_session_type(&state, SessionTypeId::from_uuid(id)).await?))
}

/// `PUT /cluster/v1/session-types/{id}` — `{variable, value}`, `variable`
/// one of `name`, `allowed_group_ids`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for an unrecognised `variable` or a
/// malformed `value`.
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateSessionTypeBody>,
) -> Result<Json<SessionType>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let mut session_type = find_session_type(&state, SessionTypeId::from_uuid(id)).await?;
    match body.variable.as_str() {
        "name" => {
            let name = body
                .value
                .as_str()
                .ok_or_else(|| ApiError::Validation("name must be a string".to_owned()))?;
            session_type.rename(name);
        }
        "allowed_group_ids" => {
            session_type.set_allowed_group_ids(parse_group_ids(&body.value)?);
        }
        other => return Err(ApiError::Validation(format!("unknown session type variable: {other}"))),
    }
    state.session_types.update(&session_type).await?;
    Ok(Json(session_type))
}

/// `DELETE /cluster/v1/session-types/{id}` — hard delete.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the session type does not exist.
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let id = SessionTypeId::from_uuid(id);
    find_session_type(&state, id).await?;
    state.session_types.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
