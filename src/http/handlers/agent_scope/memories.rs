//! `GET/POST/DELETE .../memories` and `GET .../memories/search` (`spec.md` §6).

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::history::domain::StoredMessage;
use crate::history::ports::HistoryRepository as _;
use crate::http::auth::authorize_agent_scope;
use crate::http::error::ApiError;
use crate::http::handlers::agent_scope::common::{AgentUserQuery, IngestBody, IngestResponseBody};
use crate::http::state::AppState;
use crate::ids::SessionId;
use crate::ingest::domain::IngestRequest;
use crate::search::Fact;

#[derive(Debug, Deserialize)]
pub struct MemoriesQuery {
    #[serde(flatten)]
    auth: AgentUserQuery,
    last_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MemoriesResponse {
    messages: Vec<StoredMessage>,
    facts: Vec<Fact>,
}

/// `GET /sessions/v1/{session_id}/memories/?last_n=N`.
///
/// Returns the session's most recent `last_n` messages (all of them if
/// unset) plus the facts the graph holds for this session, ranked against
/// those messages' combined text.
///
/// # Errors
///
/// Returns [`ApiError::AgentForbidden`] or [`ApiError::NotFound`] per the
/// agent-scope access rule, or a store failure.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<Uuid>,
    Query(query): Query<MemoriesQuery>,
) -> Result<Json<MemoriesResponse>, ApiError> {
    let session_id = SessionId::from_uuid(session_id);
    authorize_agent_scope(
        &headers,
        &Method::GET,
        query.auth.agent_id(),
        query.auth.user_id(),
        session_id,
        &*state.agents,
        &*state.sessions,
        &*state.session_types,
    )
    .await?;

    let mut messages = state.history.find_by_session(session_id).await?;
    if let Some(last_n) = query.last_n {
        let skip = messages.len().saturating_sub(last_n);
        messages = messages.split_off(skip);
    }

    let facts = if messages.is_empty() {
        Vec::new()
    } else {
        let query_text = messages.iter().map(StoredMessage::content).collect::<Vec<_>>().join("\n");
        state.search.search(session_id, &query_text, 0).await?
    };

    Ok(Json(MemoriesResponse { messages, facts }))
}

/// `POST /sessions/v1/{session_id}/memories/` — `{messages: [...], expected_version?}`.
///
/// # Errors
///
/// Returns [`ApiError::AgentForbidden`]/[`ApiError::NotFound`] per the
/// agent-scope access rule, [`ApiError::Validation`] on a malformed batch,
/// or a store/extractor/embedder failure.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<Uuid>,
    Query(auth): Query<AgentUserQuery>,
    Json(body): Json<IngestBody>,
) -> Result<(StatusCode, Json<IngestResponseBody>), ApiError> {
    let session_id = SessionId::from_uuid(session_id);
    let scope = authorize_agent_scope(
        &headers,
        &Method::POST,
        auth.agent_id(),
        auth.user_id(),
        session_id,
        &*state.agents,
        &*state.sessions,
        &*state.session_types,
    )
    .await?;

    let messages = body
        .messages
        .into_iter()
        .map(super::common::MessageBody::into_domain)
        .collect::<Result<Vec<_>, _>>()?;
    let outcome = state
        .ingest
        .ingest(IngestRequest {
            session_id,
            agent_id: scope.agent.id(),
            expected_version: body.expected_version,
            messages,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// `DELETE /sessions/v1/{session_id}/memories/` — tombstones all messages
/// in the session's view.
///
/// # Errors
///
/// Returns [`ApiError::AgentForbidden`]/[`ApiError::NotFound`] per the
/// agent-scope access rule, or a store failure.
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<Uuid>,
    Query(auth): Query<AgentUserQuery>,
) -> Result<StatusCode, ApiError> {
    let session_id = SessionId::from_uuid(session_id);
    authorize_agent_scope(
        &headers,
        &Method::DELETE,
        auth.agent_id(),
        auth.user_id(),
        session_id,
        &*state.agents,
        &*state.sessions,
        &*state.session_types,
    )
    .await?;
    state.history.delete_by_session(session_id, Utc::now()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(flatten)]
    auth: AgentUserQuery,
}

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    text: String,
    #[serde(default)]
    limit: usize,
    #[serde(default)]
    min_score: f32,
}

/// `GET /sessions/v1/{session_id}/memories/search` — `{text, limit, min_score}`.
///
/// # Errors
///
/// Returns [`ApiError::AgentForbidden`]/[`ApiError::NotFound`] per the
/// agent-scope access rule, or a store/embedder failure.
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<Uuid>,
    Query(query): Query<SearchQuery>,
    Json(body): Json<SearchBody>,
) -> Result<Json<Vec<Fact>>, ApiError> {
    let session_id = SessionId::from_uuid(session_id);
    authorize_agent_scope(
        &headers,
        &Method::GET,
        query.auth.agent_id(),
        query.auth.user_id(),
        session_id,
        &*state.agents,
        &*state.sessions,
        &*state.session_types,
    )
    .await?;

    let facts = state.search.search(session_id, &body.text, body.limit).await?;
    Ok(Json(facts.into_iter().filter(|fact| fact.score >= body.min_score).collect()))
}
