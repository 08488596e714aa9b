//! Ingest pipeline failure modes (`spec.md` §4.1 Failure modes).

use thiserror::Error;

use crate::embedding::ports::EmbedderError;
use crate::extraction::ports::ExtractorError;
use crate::graph::ports::GraphStoreError;
use crate::history::ports::HistoryRepositoryError;
use crate::ids::{AgentId, SessionId};
use crate::ingest::domain::IngestValidationError;
use crate::session::ports::SessionRepositoryError;

/// Errors the ingest pipeline may return. Every variant other than
/// [`IngestError::Validation`] and the unauthorized/not-found variants
/// means no part of the batch was committed to either store.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The request failed input validation before any I/O was attempted.
    #[error(transparent)]
    Validation(#[from] IngestValidationError),

    /// The session does not exist.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// The agent does not exist, is inactive, or lacks create permission.
    #[error("agent {0} is not authorised to write to this session")]
    AgentUnauthorized(AgentId),

    /// The extractor reported failure or was unreachable.
    #[error("extraction failed: {0}")]
    ExtractorFailed(#[source] ExtractorError),

    /// An embedder call failed.
    #[error("embedding failed: {0}")]
    EmbedderFailed(#[source] EmbedderError),

    /// The graph store write failed after extraction succeeded.
    #[error("graph write failed: {0}")]
    GraphWriteFailed(#[source] GraphStoreError),

    /// The relational store write failed after the graph write succeeded.
    ///
    /// Per `spec.md` §4.1 step 7, the graph write has already committed by
    /// the time this can happen; the caller is responsible for the
    /// compensating cleanup `spec.md` §7 describes, keyed by `batch_id`.
    #[error("relational write failed: {0}")]
    RelationalWriteFailed(#[source] RelationalWriteError),
}

/// The relational-side failures [`IngestError::RelationalWriteFailed`] wraps.
#[derive(Debug, Error)]
pub enum RelationalWriteError {
    /// The session repository rejected the write.
    #[error(transparent)]
    Session(#[from] SessionRepositoryError),

    /// The history repository rejected the write.
    #[error(transparent)]
    History(#[from] HistoryRepositoryError),
}

impl From<GraphStoreError> for IngestError {
    fn from(err: GraphStoreError) -> Self {
        Self::GraphWriteFailed(err)
    }
}

impl From<ExtractorError> for IngestError {
    fn from(err: ExtractorError) -> Self {
        Self::ExtractorFailed(err)
    }
}

impl From<EmbedderError> for IngestError {
    fn from(err: EmbedderError) -> Self {
        Self::EmbedderFailed(err)
    }
}
