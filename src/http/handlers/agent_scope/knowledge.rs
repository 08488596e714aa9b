//! `GET/POST/PUT/DELETE .../knowledge` (`spec.md` §6).
//!
//! `POST`/`PUT` share the memories ingest path verbatim: the ingest
//! pipeline always writes through to the graph, so there is no separate
//! "force graph processing" branch to take.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::Json;

use crate::http::auth::authorize_agent_scope;
use crate::http::error::ApiError;
use crate::http::handlers::agent_scope::common::{AgentUserQuery, IngestBody, IngestResponseBody};
use crate::http::state::AppState;
use crate::ids::SessionId;
use crate::ingest::domain::IngestRequest;
use crate::search::Fact;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct KnowledgeQuery {
    #[serde(flatten)]
    auth: AgentUserQuery,
    query: String,
    #[serde(default)]
    limit: usize,
}

/// `GET /sessions/v1/{session_id}/knowledge/?query=…&limit=…`.
///
/// # Errors
///
/// Returns [`ApiError::AgentForbidden`]/[`ApiError::NotFound`] per the
/// agent-scope access rule, or a store/embedder failure.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<Uuid>,
    Query(query): Query<KnowledgeQuery>,
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

    let facts = state.search.search(session_id, &query.query, query.limit).await?;
    Ok(Json(facts))
}

/// `POST`/`PUT /sessions/v1/{session_id}/knowledge/` — same request shape
/// and pipeline as the memories ingest endpoint.
///
/// # Errors
///
/// Returns [`ApiError::AgentForbidden`]/[`ApiError::NotFound`] per the
/// agent-scope access rule, [`ApiError::Validation`] on a malformed batch,
/// or a store/extractor/embedder failure.
pub async fn upsert(
    State(state): State<AppState>,
    headers: HeaderMap,
    method: Method,
    Path(session_id): Path<Uuid>,
    Query(auth): Query<AgentUserQuery>,
    Json(body): Json<IngestBody>,
) -> Result<(StatusCode, Json<IngestResponseBody>), ApiError> {
    let session_id = SessionId::from_uuid(session_id);
    let scope = authorize_agent_scope(
        &headers,
        &method,
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

    Ok((StatusCode::OK, Json(outcome.into())))
}

/// `DELETE /sessions/v1/{session_id}/knowledge/` — invalidates the
/// session's whole graph view rather than tombstoning message rows.
///
/// # Errors
///
/// Returns [`ApiError::AgentForbidden`]/[`ApiError::NotFound`] per the
/// agent-scope access rule, or a graph store failure.
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
    state.graph.delete_group(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
