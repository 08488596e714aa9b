//! The `Extractor` port: the out-of-process entity-extraction worker contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::ids::{EpisodicId, SessionId};

/// Result type for extractor operations.
pub type ExtractorResult<T> = Result<T, ExtractorError>;

/// Errors returned by extractor implementations. Every variant is fatal to
/// the current ingest (`spec.md` §4.1: "On non-success response: abort with
/// `ExtractorFailed`. No partial write is allowed").
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// The extractor responded with `success: false`, or omitted `success`
    /// entirely (`spec.md` §6: "Service MUST treat missing `success=true` as
    /// fatal failure").
    #[error("extractor reported failure: {0}")]
    ExtractionFailed(String),

    /// The extractor process or transport could not be reached.
    #[error("extractor unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// The extractor's response could not be parsed as the expected wire format.
    #[error("malformed extractor response: {0}")]
    MalformedResponse(Arc<dyn std::error::Error + Send + Sync>),
}

impl ExtractorError {
    /// Wraps a connectivity failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Wraps a parse failure.
    pub fn malformed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::MalformedResponse(Arc::new(err))
    }
}

/// A single message as presented to the extractor, per `spec.md` §6.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionMessage {
    /// The message's identifier; doubles as its eventual `EpisodicNode` id.
    pub uuid: EpisodicId,
    /// The message's role string.
    pub role: String,
    /// The message's `role_type` string.
    pub role_type: String,
    /// The message's raw content.
    pub content: String,
}

/// A single extraction request: the current batch plus bounded prior
/// episode context for the same `group_id` (`spec.md` §4.1 step 3).
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionRequest {
    /// The session scoping key.
    pub group_id: SessionId,
    /// The messages to extract from.
    pub messages: Vec<ExtractionMessage>,
    /// Prior episode UUIDs for this `group_id`, bounded to a fixed window.
    pub previous_episodes: Vec<EpisodicId>,
    /// Entity type hints, if any are configured.
    pub entity_types: Vec<String>,
    /// Whether to request NUMA-aware extraction from the worker.
    pub use_numa: bool,
}

/// An extracted entity node, prior to embedding.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedNode {
    /// Freshly generated identifier for the entity.
    pub uuid: crate::ids::EntityId,
    /// The entity's display name.
    pub name: String,
    /// The session scoping key (mirrors the request's `group_id`).
    pub group_id: SessionId,
    /// Entity labels.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Natural-language summary.
    #[serde(default)]
    pub summary: String,
    /// Extraction timestamp, as reported by the worker.
    pub created_at: DateTime<Utc>,
}

/// An extracted directed edge, prior to embedding.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedEdge {
    /// Freshly generated identifier for the edge.
    pub uuid: crate::ids::EdgeId,
    /// The source entity's identifier.
    pub source_uuid: crate::ids::EntityId,
    /// The target entity's identifier.
    pub target_uuid: crate::ids::EntityId,
    /// The relation label.
    pub relation_type: String,
    /// Natural-language summary (becomes the edge's `fact`).
    pub summary: String,
    /// Extraction timestamp, as reported by the worker.
    pub created_at: DateTime<Utc>,
}

/// The extractor's response to one [`ExtractionRequest`].
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted entity nodes.
    pub nodes: Vec<ExtractedNode>,
    /// Extracted directed edges.
    pub edges: Vec<ExtractedEdge>,
}

/// Port over the out-of-process entity-extraction worker (`spec.md` §2, §6).
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Invokes the extractor for one ingest batch.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::ExtractionFailed`] if the worker reports
    /// `success: false` or omits `success`; [`ExtractorError::Unavailable`]
    /// if the worker process or transport cannot be reached;
    /// [`ExtractorError::MalformedResponse`] if the response cannot be
    /// parsed.
    async fn extract(&self, request: ExtractionRequest) -> ExtractorResult<ExtractionResult>;
}
