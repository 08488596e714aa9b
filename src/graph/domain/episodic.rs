//! Episodic nodes: one immutable record per ingested message.

use crate::ids::{EpisodicId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable node recording a single ingested message (`spec.md` §3
/// `EpisodicNode`). Its identifier equals the message's UUID, so `spec.md`
/// §8's "every Message has a corresponding EpisodicNode with identical
/// UUID" invariant is a type-level equality rather than a join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodicNode {
    id: EpisodicId,
    group_id: SessionId,
    content: String,
    source: String,
    embedding: Vec<f32>,
    created_at: DateTime<Utc>,
    valid_at: DateTime<Utc>,
}

impl EpisodicNode {
    /// Creates a new episodic node.
    #[must_use]
    pub fn new(
        id: EpisodicId,
        group_id: SessionId,
        content: impl Into<String>,
        source: impl Into<String>,
        embedding: Vec<f32>,
        created_at: DateTime<Utc>,
        valid_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            group_id,
            content: content.into(),
            source: source.into(),
            embedding,
            created_at,
            valid_at,
        }
    }

    /// Returns the episodic identifier, equal to the originating message's UUID.
    #[must_use]
    pub const fn id(&self) -> EpisodicId {
        self.id
    }

    /// Returns the owning session's scoping key.
    #[must_use]
    pub const fn group_id(&self) -> SessionId {
        self.group_id
    }

    /// Returns the episode's raw content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the episode's source label (e.g. `"message"`).
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the episode's embedding vector.
    #[must_use]
    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the timestamp at which the episode's content became valid.
    #[must_use]
    pub const fn valid_at(&self) -> DateTime<Utc> {
        self.valid_at
    }
}
