//! Entity nodes: the typed vertices of the knowledge graph.

use crate::ids::{EntityId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A typed vertex in the knowledge graph, merged by UUID (`spec.md` §4.2
/// `UpsertEntity`) and uniquely keyed on `(name, group_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityNode {
    id: EntityId,
    name: String,
    labels: Vec<String>,
    summary: String,
    group_id: SessionId,
    embedding: Vec<f32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EntityNode {
    /// Creates a new entity node.
    #[must_use]
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        labels: Vec<String>,
        summary: impl Into<String>,
        group_id: SessionId,
        embedding: Vec<f32>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            labels,
            summary: summary.into(),
            group_id,
            embedding,
            created_at,
            updated_at: created_at,
        }
    }

    /// Returns the entity identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entity's labels.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the entity's natural-language summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns the owning session's scoping key.
    #[must_use]
    pub const fn group_id(&self) -> SessionId {
        self.group_id
    }

    /// Returns the entity's embedding vector.
    #[must_use]
    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Merges mutable fields (`name`, `summary`, `embedding`, `labels`) from
    /// a freshly extracted node sharing the same UUID, mirroring the
    /// `MERGE`-by-UUID semantics `spec.md` §4.2 requires of `UpsertEntity`.
    pub fn merge_mutable_fields(&mut self, other: &Self, updated_at: DateTime<Utc>) {
        self.name = other.name.clone();
        self.summary = other.summary.clone();
        self.embedding = other.embedding.clone();
        self.labels = other.labels.clone();
        self.updated_at = updated_at;
    }
}
