//! `/cluster/v1/sessions` — CRUD + list (`spec.md` §6).
//!
//! Deletion cascades to message history: [`delete`] soft-deletes the
//! session via [`crate::session::services::SessionLifecycleService`] and
//! separately tombstones its messages through [`crate::http::state::AppState::history`] —
//! the lifecycle service only knows about sessions, so the cascade is
//! composed here rather than inside the service.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::history::ports::HistoryRepository as _;
use crate::http::auth::require_developer_auth;
use crate::http::error::ApiError;
use crate::http::state::AppState;
use crate::ids::{SessionId, SessionTypeId, UserId};
use crate::session::domain::Session;
use crate::session::ports::SessionRepository as _;

#[derive(Debug, Deserialize)]
pub struct CreateSessionBody {
    user_id: Uuid,
    #[serde(default)]
    session_type_id: Option<Uuid>,
    #[serde(default)]
    session_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSessionBody {
    variable: String,
    value: serde_json::Value,
}

async fn find_live(state: &AppState, id: SessionId) -> Result<Session, ApiError> {
    let session = state
        .sessions
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("session {id} not found")))?;
    if session.is_deleted() {
        return Err(ApiError::NotFound(format!("session {id} not found")));
    }
    Ok(session)
}

/// `POST /cluster/v1/sessions`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] if `session_name` is empty.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateSessionBody>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let session = state
        .session_lifecycle
        .create(
            UserId::from_uuid(body.user_id),
            body.session_type_id.map(SessionTypeId::from_uuid),
            body.session_name,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// `GET /cluster/v1/sessions`.
///
/// # Errors
///
/// Returns a store failure.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Session>>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    Ok(Json(state.sessions.list_all().await?))
}

/// `GET /cluster/v1/sessions/{id}`.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the session is missing or soft-deleted.
pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    Ok(Json(find_live(&state, SessionId::from_uuid(id)).await?))
}

/// `PUT /cluster/v1/sessions/{id}` — `{variable: "session_name", value}`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for an unrecognised `variable`, or
/// [`ApiError::NotFound`] if the session is missing.
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateSessionBody>,
) -> Result<Json<Session>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    if body.variable != "session_name" {
        return Err(ApiError::Validation(format!("unknown session variable: {}", body.variable)));
    }
    let name = body
        .value
        .as_str()
        .ok_or_else(|| ApiError::Validation("session_name must be a string".to_owned()))?
        .to_owned();
    let session = state.session_lifecycle.rename(SessionId::from_uuid(id), name).await?;
    Ok(Json(session))
}

/// `DELETE /cluster/v1/sessions/{id}` — soft-deletes the session and
/// tombstones its message history. Interaction log entries are untouched.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the session is missing.
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let session_id = SessionId::from_uuid(id);
    state.session_lifecycle.delete(session_id).await?;
    state.history.delete_by_session(session_id, Utc::now()).await?;
    Ok(StatusCode::NO_CONTENT)
}
