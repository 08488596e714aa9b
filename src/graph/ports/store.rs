//! The `GraphStore` port: a typed, indexed property graph (`spec.md` §4.2).

use crate::graph::domain::{Edge, EntityNode, EpisodicNode};
use crate::ids::{EntityId, SessionId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for graph store operations.
pub type GraphStoreResult<T> = Result<T, GraphStoreError>;

/// Errors returned by graph store implementations.
#[derive(Debug, Error)]
pub enum GraphStoreError {
    /// An edge referenced an entity endpoint that does not exist in the store.
    #[error("edge endpoint not found: {0}")]
    MissingEndpoint(EntityId),

    /// The underlying driver or connection failed.
    #[error("graph store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// A query or write failed for a reason other than unavailability.
    #[error("graph store query failed: {0}")]
    Query(Arc<dyn std::error::Error + Send + Sync>),
}

impl GraphStoreError {
    /// Wraps a connectivity failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Wraps a query failure.
    pub fn query(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Query(Arc::new(err))
    }
}

/// An entity returned from a similarity search, paired with its cosine score.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarEntity {
    /// The matched entity.
    pub entity: EntityNode,
    /// Cosine similarity to the query vector, in `[-1.0, 1.0]`.
    pub score: f32,
}

/// Port over the property graph holding entities, episodes, and facts.
///
/// Implementations MUST create the schema `spec.md` §4.2 requires on first
/// connect: unique constraints on entity/episodic/edge UUID and on
/// `(entity.name, entity.group_id)`; cosine vector indexes on entity,
/// episodic, and edge-fact embeddings; full-text indexes on
/// `(entity.name, entity.summary)` and `(episodic.content, episodic.source)`;
/// property indexes on `group_id` and `created_at` for all three node kinds.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Creates required constraints and indexes. Idempotent; called once at
    /// startup (`spec.md` §9 init order: RS → Embedder → GS → Extractor).
    async fn ensure_schema(&self) -> GraphStoreResult<()>;

    /// Verifies connectivity to the store, for the `/health` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GraphStoreError::Unavailable`] if the store cannot be reached.
    async fn health_check(&self) -> GraphStoreResult<()>;

    /// `MERGE`s an entity node by UUID, overwriting its mutable fields.
    async fn upsert_entity(&self, node: &EntityNode) -> GraphStoreResult<()>;

    /// `MERGE`s an edge by UUID. Both endpoints must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`GraphStoreError::MissingEndpoint`] if either endpoint is
    /// absent from the store.
    async fn upsert_edge(&self, edge: &Edge) -> GraphStoreResult<()>;

    /// `MERGE`s an episodic node by UUID.
    async fn upsert_episodic(&self, node: &EpisodicNode) -> GraphStoreResult<()>;

    /// Returns up to `k` entities in `group_ids` ranked by cosine similarity
    /// to `qvec`, most similar first.
    async fn search_similar_entities(
        &self,
        qvec: &[f32],
        group_ids: &[SessionId],
        k: usize,
    ) -> GraphStoreResult<Vec<SimilarEntity>>;

    /// For each input edge, returns up to `k` existing edges in `group_ids`
    /// with `cosine(fact_embedding) >= min_score` that share at least one
    /// endpoint with the input edge. This is the core query backing both
    /// duplicate detection and contradiction detection (`spec.md` §4.2).
    async fn get_edge_invalidation_candidates(
        &self,
        edges: &[Edge],
        group_ids: &[SessionId],
        min_score: f32,
        k: usize,
    ) -> GraphStoreResult<Vec<Vec<Edge>>>;

    /// Returns non-expired edges in `group_id` ranked by cosine similarity
    /// to `qvec`, most similar first, bounded by `limit`. Backs
    /// [`crate::search::SearchService`].
    async fn search_facts(
        &self,
        qvec: &[f32],
        group_id: SessionId,
        limit: usize,
    ) -> GraphStoreResult<Vec<(Edge, f32)>>;

    /// Deletes every edge, entity, and episodic node scoped to `group_id`,
    /// in that order (`spec.md` §4.2 `DeleteGroup`).
    async fn delete_group(&self, group_id: SessionId) -> GraphStoreResult<()>;
}
