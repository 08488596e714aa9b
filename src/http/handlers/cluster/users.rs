//! `/cluster/v1/users` — developer-managed user CRUD + list (`spec.md` §6).

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use mockable::DefaultClock;
use serde::Deserialize;
use uuid::Uuid;

use crate::directory::domain::User;
use crate::directory::ports::UserRepository as _;
use crate::http::auth::require_developer_auth;
use crate::http::error::ApiError;
use crate::http::state::AppState;
use crate::ids::UserId;

#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserBody {
    variable: String,
    value: serde_json::Value,
}

async fn find_live(state: &AppState, id: UserId) -> Result<User, ApiError> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
    if user.is_deleted() {
        return Err(ApiError::NotFound(format!("user {id} not found")));
    }
    Ok(user)
}

/// `POST /cluster/v1/users`.
///
/// # Errors
///
/// Returns [`ApiError::DeveloperUnauthorized`] or a store failure.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateUserBody>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let user = User::new(body.display_name, &DefaultClock);
    state.users.store(&user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /cluster/v1/users`.
///
/// # Errors
///
/// Returns [`ApiError::DeveloperUnauthorized`] or a store failure.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<User>>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    Ok(Json(state.users.list_all().await?))
}

/// `GET /cluster/v1/users/{id}`.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the user is missing or soft-deleted.
pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    Ok(Json(find_live(&state, UserId::from_uuid(id)).await?))
}

/// `PUT /cluster/v1/users/{id}` — `{variable: "display_name", value}`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for an unrecognised `variable`.
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<User>, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let mut user = find_live(&state, UserId::from_uuid(id)).await?;
    match body.variable.as_str() {
        "display_name" => {
            let display_name = match body.value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s),
                _ => return Err(ApiError::Validation("display_name must be a string or null".to_owned())),
            };
            user.set_display_name(display_name);
        }
        other => return Err(ApiError::Validation(format!("unknown user variable: {other}"))),
    }
    state.users.update(&user).await?;
    Ok(Json(user))
}

/// `DELETE /cluster/v1/users/{id}` — soft-deletes the user.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the user is missing or already deleted.
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_developer_auth(&headers, &state.auth.cluster_api_key)?;
    let mut user = find_live(&state, UserId::from_uuid(id)).await?;
    user.soft_delete(&DefaultClock);
    state.users.update(&user).await?;
    Ok(StatusCode::NO_CONTENT)
}
