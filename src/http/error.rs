//! Maps internal failure kinds onto the HTTP status codes `spec.md` §7
//! assigns them.
//!
//! Every service-level error type the handlers touch funnels through
//! [`ApiError`] rather than leaking its own `IntoResponse` impl, so the
//! status-code mapping lives in exactly one place.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::directory::ports::DirectoryError;
use crate::graph::ports::GraphStoreError;
use crate::history::ports::HistoryRepositoryError;
use crate::ingest::IngestError;
use crate::search::SearchError;
use crate::session::ports::SessionRepositoryError;
use crate::session::services::SessionLifecycleError;

/// A request-scoped failure, carrying enough information to render the
/// `spec.md` §7 status code and an opaque or field-level message.
#[derive(Debug)]
pub enum ApiError {
    /// Caller-fixable input error (`spec.md` §7 Validation). 400.
    Validation(String),
    /// The referenced resource does not exist, or is soft-deleted
    /// (`spec.md` §7 NotFound). 404.
    NotFound(String),
    /// Missing or incorrect developer-scope credentials. 401.
    DeveloperUnauthorized,
    /// A valid agent lacks the permission or membership a session-scoped
    /// operation requires, or developer credentials were presented against
    /// the agent-scope surface. 403.
    AgentForbidden(String),
    /// A create-if-not-exists violation (`spec.md` §7 Conflict, duplicate id). 409.
    Conflict(String),
    /// `ExtractorFailed`, `EmbedderFailed`, or any other fatal, opaque
    /// internal failure. 500.
    Internal(String),
    /// The relational or graph store could not be reached. 503.
    StoreUnavailable(String),
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DeveloperUnauthorized => StatusCode::UNAUTHORIZED,
            Self::AgentForbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(msg)
            | Self::NotFound(msg)
            | Self::AgentForbidden(msg)
            | Self::Conflict(msg)
            | Self::Internal(msg)
            | Self::StoreUnavailable(msg) => msg.clone(),
            Self::DeveloperUnauthorized => "missing or invalid developer credentials".to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.message() }));
        (status, body).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Validation(e) => Self::Validation(e.to_string()),
            IngestError::SessionNotFound(id) => Self::NotFound(format!("session {id} not found")),
            IngestError::AgentUnauthorized(id) => {
                Self::AgentForbidden(format!("agent {id} is not authorised for this operation"))
            }
            IngestError::ExtractorFailed(_) | IngestError::EmbedderFailed(_) => {
                Self::Internal(err.to_string())
            }
            IngestError::GraphWriteFailed(_) | IngestError::RelationalWriteFailed(_) => {
                Self::StoreUnavailable(err.to_string())
            }
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Embedding(_) => Self::Internal(err.to_string()),
            SearchError::Graph(_) => Self::StoreUnavailable(err.to_string()),
        }
    }
}

impl From<SessionLifecycleError> for ApiError {
    fn from(err: SessionLifecycleError) -> Self {
        match err {
            SessionLifecycleError::Domain(e) => Self::Validation(e.to_string()),
            SessionLifecycleError::NotFound(id) => Self::NotFound(format!("session {id} not found")),
            SessionLifecycleError::Repository(e) => Self::StoreUnavailable(e.to_string()),
        }
    }
}

impl From<SessionRepositoryError> for ApiError {
    fn from(err: SessionRepositoryError) -> Self {
        match err {
            SessionRepositoryError::NotFound(id) => Self::NotFound(format!("session {id} not found")),
            SessionRepositoryError::DuplicateSession(id) => {
                Self::Conflict(format!("session {id} already exists"))
            }
            SessionRepositoryError::VersionConflict { .. } | SessionRepositoryError::Persistence(_) => {
                Self::StoreUnavailable(err.to_string())
            }
        }
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound => Self::NotFound("not found".to_owned()),
            DirectoryError::Persistence(_) => Self::StoreUnavailable(err.to_string()),
        }
    }
}

impl From<GraphStoreError> for ApiError {
    fn from(err: GraphStoreError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

impl From<HistoryRepositoryError> for ApiError {
    fn from(err: HistoryRepositoryError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}
