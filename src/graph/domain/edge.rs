//! Edges: bi-temporal facts connecting two entities.

use crate::ids::{AgentId, EdgeId, EntityId, EpisodicId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// A directed, bi-temporal fact connecting two [`super::EntityNode`]s
/// (`spec.md` §3 `Edge (fact)`). Facts carry their own embedding so the
/// temporal resolver can detect duplicates and contradictions by cosine
/// similarity, and a `checksum_hash` that is a pure function of `fact` so
/// tampering or accidental re-derivation is detectable without comparing
/// full records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    id: EdgeId,
    source_uuid: EntityId,
    target_uuid: EntityId,
    relation_type: String,
    fact: String,
    fact_embedding: Vec<f32>,
    group_id: SessionId,
    episodes: Vec<EpisodicId>,
    valid_at: Option<DateTime<Utc>>,
    invalid_at: Option<DateTime<Utc>>,
    expired_at: Option<DateTime<Utc>>,
    version: u64,
    last_modified_by: AgentId,
    checksum_hash: String,
    metadata: Map<String, Value>,
}

/// Fields required to construct a brand-new edge (`version` starts at `1`
/// per `spec.md` §4.1 step 5's "else: the committed edge is the new one
/// with `version=1`").
#[derive(Debug, Clone)]
pub struct NewEdgeParams {
    /// Edge identifier, normally freshly generated by the extractor.
    pub id: EdgeId,
    /// Source entity endpoint.
    pub source_uuid: EntityId,
    /// Target entity endpoint.
    pub target_uuid: EntityId,
    /// Relation label, e.g. `"WORKS_FOR"`.
    pub relation_type: String,
    /// Natural-language summary of the fact.
    pub fact: String,
    /// Embedding of `fact`.
    pub fact_embedding: Vec<f32>,
    /// Session scoping key.
    pub group_id: SessionId,
    /// The episode that produced this edge.
    pub episode: EpisodicId,
    /// When the fact became true, if known.
    pub valid_at: Option<DateTime<Utc>>,
    /// The agent whose ingest produced this edge.
    pub last_modified_by: AgentId,
}

impl Edge {
    /// Constructs a brand-new edge at version `1`.
    #[must_use]
    pub fn new(params: NewEdgeParams) -> Self {
        Self {
            id: params.id,
            source_uuid: params.source_uuid,
            target_uuid: params.target_uuid,
            checksum_hash: generate_checksum(&params.fact),
            relation_type: params.relation_type,
            fact: params.fact,
            fact_embedding: params.fact_embedding,
            group_id: params.group_id,
            episodes: vec![params.episode],
            valid_at: params.valid_at,
            invalid_at: None,
            expired_at: None,
            version: 1,
            last_modified_by: params.last_modified_by,
            metadata: Map::new(),
        }
    }

    /// Reconstructs an edge from persisted storage.
    #[must_use]
    #[expect(clippy::too_many_arguments, reason = "mirrors the persisted row shape")]
    pub fn from_parts(
        id: EdgeId,
        source_uuid: EntityId,
        target_uuid: EntityId,
        relation_type: String,
        fact: String,
        fact_embedding: Vec<f32>,
        group_id: SessionId,
        episodes: Vec<EpisodicId>,
        valid_at: Option<DateTime<Utc>>,
        invalid_at: Option<DateTime<Utc>>,
        expired_at: Option<DateTime<Utc>>,
        version: u64,
        last_modified_by: AgentId,
        metadata: Map<String, Value>,
    ) -> Self {
        let checksum_hash = generate_checksum(&fact);
        Self {
            id,
            source_uuid,
            target_uuid,
            relation_type,
            fact,
            fact_embedding,
            group_id,
            episodes,
            valid_at,
            invalid_at,
            expired_at,
            version,
            last_modified_by,
            checksum_hash,
            metadata,
        }
    }

    /// Returns the edge identifier.
    #[must_use]
    pub const fn id(&self) -> EdgeId {
        self.id
    }

    /// Returns the source entity endpoint.
    #[must_use]
    pub const fn source_uuid(&self) -> EntityId {
        self.source_uuid
    }

    /// Returns the target entity endpoint.
    #[must_use]
    pub const fn target_uuid(&self) -> EntityId {
        self.target_uuid
    }

    /// Returns the relation label.
    #[must_use]
    pub fn relation_type(&self) -> &str {
        &self.relation_type
    }

    /// Returns the natural-language fact summary.
    #[must_use]
    pub fn fact(&self) -> &str {
        &self.fact
    }

    /// Returns the fact's embedding vector.
    #[must_use]
    pub fn fact_embedding(&self) -> &[f32] {
        &self.fact_embedding
    }

    /// Returns the owning session's scoping key.
    #[must_use]
    pub const fn group_id(&self) -> SessionId {
        self.group_id
    }

    /// Returns the episodes that contributed to this edge.
    #[must_use]
    pub fn episodes(&self) -> &[EpisodicId] {
        &self.episodes
    }

    /// Returns when the fact became true, if known.
    #[must_use]
    pub const fn valid_at(&self) -> Option<DateTime<Utc>> {
        self.valid_at
    }

    /// Returns when the fact stopped being true, if known.
    #[must_use]
    pub const fn invalid_at(&self) -> Option<DateTime<Utc>> {
        self.invalid_at
    }

    /// Returns when the edge was superseded, if it has been.
    #[must_use]
    pub const fn expired_at(&self) -> Option<DateTime<Utc>> {
        self.expired_at
    }

    /// Returns `true` if the edge is historical (`spec.md` §3: an edge with
    /// non-null `expired_at` is never returned from Search unless explicitly
    /// requested).
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.expired_at.is_some()
    }

    /// Returns the edge's version counter.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the agent that last modified this edge.
    #[must_use]
    pub const fn last_modified_by(&self) -> AgentId {
        self.last_modified_by
    }

    /// Returns the checksum of `fact`.
    #[must_use]
    pub fn checksum_hash(&self) -> &str {
        &self.checksum_hash
    }

    /// Returns the edge's free-form metadata annotations.
    #[must_use]
    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Merges a newly extracted duplicate edge onto this one, per `spec.md`
    /// §4.1 step 5: episodes are unioned, version is bumped, provenance is
    /// updated, and merge metadata is recorded.
    pub fn merge_duplicate(&mut self, new_episode: EpisodicId, new_edge_id: EdgeId, modified_by: AgentId) {
        if !self.episodes.contains(&new_episode) {
            self.episodes.push(new_episode);
        }
        self.version += 1;
        self.last_modified_by = modified_by;
        self.metadata
            .insert("auto_merged".to_owned(), Value::Bool(true));
        self.metadata.insert(
            "merged_with".to_owned(),
            Value::String(new_edge_id.to_string()),
        );
    }

    /// Marks this edge as superseded by `superseded_by`, per `spec.md` §4.1
    /// step 6: sets `expired_at`/`invalid_at` and annotates metadata.
    pub fn invalidate(
        &mut self,
        now: DateTime<Utc>,
        invalid_at: Option<DateTime<Utc>>,
        superseded_by: EdgeId,
    ) {
        self.expired_at = Some(now);
        if let Some(invalid_at) = invalid_at {
            self.invalid_at = Some(invalid_at);
        }
        self.metadata
            .insert("auto_invalidated".to_owned(), Value::Bool(true));
        self.metadata.insert(
            "superseded_by".to_owned(),
            Value::String(superseded_by.to_string()),
        );
    }

    /// Returns a clone of this edge with `invalidate` applied, leaving the
    /// receiver untouched. The temporal resolver is pure and must not
    /// mutate the candidates it is handed (`spec.md` §4.3).
    #[must_use]
    pub fn invalidated_copy(
        &self,
        now: DateTime<Utc>,
        invalid_at: Option<DateTime<Utc>>,
        superseded_by: EdgeId,
    ) -> Self {
        let mut copy = self.clone();
        copy.invalidate(now, invalid_at, superseded_by);
        copy
    }
}

/// Computes `SHA-256(fact)` as lowercase hex, per `spec.md` §3:
/// `checksum_hash(edge) = SHA-256(fact)`.
///
/// # Examples
///
/// ```
/// use eion::graph::domain::generate_checksum;
///
/// let a = generate_checksum("Alice works at Acme.");
/// let b = generate_checksum("Alice works at Acme.");
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
#[must_use]
pub fn generate_checksum(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
