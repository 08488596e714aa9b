//! In-memory graph store, mirroring `Neo4jGraphStore` for fast unit testing
//! and for environments without a Neo4j instance. Vector search is
//! brute-force cosine similarity; full-text search, where needed, is
//! substring matching.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::graph::domain::{Edge, EntityNode, EpisodicNode};
use crate::graph::ports::{GraphStore, GraphStoreError, GraphStoreResult, SimilarEntity};
use crate::ids::{EdgeId, EntityId, EpisodicId, SessionId};
use crate::vector::cosine_similarity;

/// Thread-safe in-memory graph store.
#[derive(Debug, Default)]
pub struct InMemoryGraphStore {
    entities: RwLock<HashMap<EntityId, EntityNode>>,
    edges: RwLock<HashMap<EdgeId, Edge>>,
    episodics: RwLock<HashMap<EpisodicId, EpisodicNode>>,
}

impl InMemoryGraphStore {
    /// Creates an empty in-memory graph store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored edges, including expired ones. Used by
    /// tests asserting the "edge count unchanged" duplicate-merge property.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.read().map_or(0, |edges| edges.len())
    }

    /// Returns a clone of a stored edge, if present.
    #[must_use]
    pub fn get_edge(&self, id: EdgeId) -> Option<Edge> {
        self.edges.read().ok().and_then(|edges| edges.get(&id).cloned())
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn ensure_schema(&self) -> GraphStoreResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> GraphStoreResult<()> {
        Ok(())
    }

    async fn upsert_entity(&self, node: &EntityNode) -> GraphStoreResult<()> {
        let mut entities = self
            .entities
            .write()
            .map_err(|err| GraphStoreError::query(std::io::Error::other(err.to_string())))?;
        entities.insert(node.id(), node.clone());
        Ok(())
    }

    async fn upsert_edge(&self, edge: &Edge) -> GraphStoreResult<()> {
        {
            let entities = self
                .entities
                .read()
                .map_err(|err| GraphStoreError::query(std::io::Error::other(err.to_string())))?;
            if !entities.contains_key(&edge.source_uuid()) {
                return Err(GraphStoreError::MissingEndpoint(edge.source_uuid()));
            }
            if !entities.contains_key(&edge.target_uuid()) {
                return Err(GraphStoreError::MissingEndpoint(edge.target_uuid()));
            }
        }
        let mut edges = self
            .edges
            .write()
            .map_err(|err| GraphStoreError::query(std::io::Error::other(err.to_string())))?;
        edges.insert(edge.id(), edge.clone());
        Ok(())
    }

    async fn upsert_episodic(&self, node: &EpisodicNode) -> GraphStoreResult<()> {
        let mut episodics = self
            .episodics
            .write()
            .map_err(|err| GraphStoreError::query(std::io::Error::other(err.to_string())))?;
        episodics.insert(node.id(), node.clone());
        Ok(())
    }

    async fn search_similar_entities(
        &self,
        qvec: &[f32],
        group_ids: &[SessionId],
        k: usize,
    ) -> GraphStoreResult<Vec<SimilarEntity>> {
        let entities = self
            .entities
            .read()
            .map_err(|err| GraphStoreError::query(std::io::Error::other(err.to_string())))?;
        let mut scored: Vec<SimilarEntity> = entities
            .values()
            .filter(|entity| group_ids.contains(&entity.group_id()))
            .map(|entity| SimilarEntity {
                entity: entity.clone(),
                score: cosine_similarity(qvec, entity.embedding()),
            })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    async fn get_edge_invalidation_candidates(
        &self,
        edges: &[Edge],
        group_ids: &[SessionId],
        min_score: f32,
        k: usize,
    ) -> GraphStoreResult<Vec<Vec<Edge>>> {
        let stored = self
            .edges
            .read()
            .map_err(|err| GraphStoreError::query(std::io::Error::other(err.to_string())))?;
        let pool: Vec<&Edge> = stored
            .values()
            .filter(|candidate| group_ids.contains(&candidate.group_id()))
            .collect();
        let mut results = Vec::with_capacity(edges.len());
        for edge in edges {
            let mut scored: Vec<(f32, &Edge)> = pool
                .iter()
                .filter(|candidate| {
                    candidate.id() != edge.id()
                        && (candidate.source_uuid() == edge.source_uuid()
                            || candidate.source_uuid() == edge.target_uuid()
                            || candidate.target_uuid() == edge.source_uuid()
                            || candidate.target_uuid() == edge.target_uuid())
                })
                .map(|candidate| (cosine_similarity(edge.fact_embedding(), candidate.fact_embedding()), *candidate))
                .filter(|(score, _)| *score >= min_score)
                .collect();
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
            scored.truncate(k);
            results.push(scored.into_iter().map(|(_, edge)| edge.clone()).collect());
        }
        Ok(results)
    }

    async fn search_facts(
        &self,
        qvec: &[f32],
        group_id: SessionId,
        limit: usize,
    ) -> GraphStoreResult<Vec<(Edge, f32)>> {
        let stored = self
            .edges
            .read()
            .map_err(|err| GraphStoreError::query(std::io::Error::other(err.to_string())))?;
        let mut scored: Vec<(Edge, f32)> = stored
            .values()
            .filter(|edge| edge.group_id() == group_id && !edge.is_expired())
            .map(|edge| (edge.clone(), cosine_similarity(qvec, edge.fact_embedding())))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn delete_group(&self, group_id: SessionId) -> GraphStoreResult<()> {
        let mut edges = self
            .edges
            .write()
            .map_err(|err| GraphStoreError::query(std::io::Error::other(err.to_string())))?;
        edges.retain(|_, edge| edge.group_id() != group_id);
        drop(edges);
        let mut entities = self
            .entities
            .write()
            .map_err(|err| GraphStoreError::query(std::io::Error::other(err.to_string())))?;
        entities.retain(|_, entity| entity.group_id() != group_id);
        drop(entities);
        let mut episodics = self
            .episodics
            .write()
            .map_err(|err| GraphStoreError::query(std::io::Error::other(err.to_string())))?;
        episodics.retain(|_, episodic| episodic.group_id() != group_id);
        Ok(())
    }
}
