//! The `Search` operation: embed a query, rank non-expired facts by cosine
//! similarity to it, scoped to one session (`spec.md` §4.4).

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::embedding::ports::{Embedder, EmbedderError};
use crate::graph::domain::Edge;
use crate::graph::ports::{GraphStore, GraphStoreError};
use crate::ids::{EdgeId, EntityId, SessionId};

/// Default result cap when a caller does not specify one.
pub const DEFAULT_LIMIT: usize = 10;

/// Result type for [`SearchService::search`].
pub type SearchResult<T> = Result<T, SearchError>;

/// Failure modes for a search call.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query embedding call failed.
    #[error("query embedding failed: {0}")]
    Embedding(#[from] EmbedderError),
    /// The graph query failed.
    #[error("graph search failed: {0}")]
    Graph(#[from] GraphStoreError),
}

/// A ranked fact returned from search: a flattened, read-only view of an
/// [`Edge`] paired with its similarity score to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fact {
    /// The edge identifier the fact was read from.
    pub edge_id: EdgeId,
    /// The fact's source entity.
    pub source_uuid: EntityId,
    /// The fact's target entity.
    pub target_uuid: EntityId,
    /// The relation label.
    pub relation_type: String,
    /// The natural-language fact text.
    pub fact: String,
    /// Cosine similarity to the query, in `[-1.0, 1.0]`.
    pub score: f32,
}

impl Fact {
    fn from_edge(edge: &Edge, score: f32) -> Self {
        Self {
            edge_id: edge.id(),
            source_uuid: edge.source_uuid(),
            target_uuid: edge.target_uuid(),
            relation_type: edge.relation_type().to_owned(),
            fact: edge.fact().to_owned(),
            score,
        }
    }
}

/// Embeds a query and ranks the matching facts within one session.
pub struct SearchService<GS, EM>
where
    GS: GraphStore,
    EM: Embedder,
{
    graph: Arc<GS>,
    embedder: Arc<EM>,
}

impl<GS, EM> SearchService<GS, EM>
where
    GS: GraphStore,
    EM: Embedder,
{
    /// Creates a search service wired to the given graph store and embedder.
    #[must_use]
    pub const fn new(graph: Arc<GS>, embedder: Arc<EM>) -> Self {
        Self { graph, embedder }
    }

    /// `Search(sessionId, text, limit) -> { facts[] }`.
    ///
    /// Non-expired edges scoped to `session_id`, most similar first.
    /// `limit` of `0` is treated as [`DEFAULT_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Embedding`] if the query cannot be embedded,
    /// or [`SearchError::Graph`] if the underlying graph query fails.
    pub async fn search(&self, session_id: SessionId, text: &str, limit: usize) -> SearchResult<Vec<Fact>> {
        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        let qvec = self.embedder.embed_one(text).await?;
        let matches = self.graph.search_facts(&qvec, session_id, limit).await?;
        Ok(matches.iter().map(|(edge, score)| Fact::from_edge(edge, *score)).collect())
    }
}
