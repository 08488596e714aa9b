//! Developer-scope and agent-scope authorization (`spec.md` §6).
//!
//! Developer-scope requests carry a `Bearer`/`Api-Key` header checked
//! against the configured cluster API key. Agent-scope requests carry
//! `agent_id`/`user_id` query parameters instead, and explicitly reject
//! developer credentials. Both checks are plain functions rather than
//! `FromRequestParts` extractors: the handlers need the request method
//! (to pick the required permission letter) and the path's `session_id`
//! alongside the query parameters, so composing them inline reads more
//! plainly than threading state through a generic extractor.

use axum::http::{HeaderMap, Method};

use crate::directory::domain::Agent;
use crate::directory::ports::AgentRepository;
use crate::http::error::ApiError;
use crate::ids::{AgentId, SessionId, UserId};
use crate::session::domain::Session;
use crate::session::ports::SessionRepository;

const AUTHORIZATION_HEADER: &str = "authorization";

/// Extracts the bearer/API key from an `Authorization` header, accepting
/// either scheme `spec.md` §6 names.
fn bearer_or_api_key(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(AUTHORIZATION_HEADER)?.to_str().ok()?;
    raw.strip_prefix("Bearer ").or_else(|| raw.strip_prefix("Api-Key "))
}

/// Verifies developer-scope credentials against the configured cluster API key.
///
/// # Errors
///
/// Returns [`ApiError::DeveloperUnauthorized`] if the header is absent,
/// malformed, or does not match.
pub fn require_developer_auth(headers: &HeaderMap, cluster_api_key: &str) -> Result<(), ApiError> {
    match bearer_or_api_key(headers) {
        Some(key) if key == cluster_api_key => Ok(()),
        _ => Err(ApiError::DeveloperUnauthorized),
    }
}

/// The permission character an HTTP method requires (`spec.md` §6).
const fn permission_letter(method: &Method) -> Option<char> {
    match *method {
        Method::POST => Some('c'),
        Method::GET => Some('r'),
        Method::PUT | Method::PATCH => Some('u'),
        Method::DELETE => Some('d'),
        _ => None,
    }
}

/// An authorized agent-scope call: the agent and session resolved after
/// every `spec.md` §6 check has passed.
pub struct AgentScope {
    /// The calling agent.
    pub agent: Agent,
    /// The user the agent is acting on behalf of.
    pub user_id: UserId,
    /// The session being accessed.
    pub session: Session,
}

/// Checks `spec.md` §6's agent-scope access rule end to end: rejects
/// developer credentials, resolves the agent and session, and verifies
/// status, permission, and group membership.
///
/// # Errors
///
/// Returns [`ApiError::AgentForbidden`] if developer credentials are
/// presented, the agent is missing or inactive, lacks the permission
/// `method` requires, or is not a member of a group the session's type
/// permits. Returns [`ApiError::NotFound`] if the session does not exist
/// or is soft-deleted.
#[expect(clippy::too_many_arguments, reason = "every argument is a distinct, independently-sourced check input")]
pub async fn authorize_agent_scope<AR, SR, STR>(
    headers: &HeaderMap,
    method: &Method,
    agent_id: AgentId,
    user_id: UserId,
    session_id: SessionId,
    agents: &AR,
    sessions: &SR,
    session_types: &STR,
) -> Result<AgentScope, ApiError>
where
    AR: AgentRepository + ?Sized,
    SR: SessionRepository + ?Sized,
    STR: crate::directory::ports::SessionTypeRepository + ?Sized,
{
    if bearer_or_api_key(headers).is_some() {
        return Err(ApiError::AgentForbidden(
            "developer credentials are not accepted on the agent-scope surface".to_owned(),
        ));
    }

    let agent = agents
        .find_by_id(agent_id)
        .await?
        .ok_or_else(|| ApiError::AgentForbidden(format!("agent {agent_id} not found")))?;
    if !agent.is_active() {
        return Err(ApiError::AgentForbidden(format!("agent {agent_id} is not active")));
    }
    let required = permission_letter(method)
        .ok_or_else(|| ApiError::Validation(format!("unsupported method {method}")))?;
    if !agent.permissions().as_str().contains(required) {
        return Err(ApiError::AgentForbidden(format!(
            "agent {agent_id} lacks '{required}' permission"
        )));
    }

    let session = sessions
        .find_by_id(session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("session {session_id} not found")))?;
    if session.is_deleted() {
        return Err(ApiError::NotFound(format!("session {session_id} not found")));
    }

    if let Some(session_type_id) = session.session_type_id() {
        let session_type = session_types
            .find_by_id(session_type_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("session type {session_type_id} not found")))?;
        if !session_type.permits_group(agent.group_id()) {
            return Err(ApiError::AgentForbidden(format!(
                "agent {agent_id} is not a member of a group permitted by this session's type"
            )));
        }
    }

    Ok(AgentScope { agent, user_id, session })
}
