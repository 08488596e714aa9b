//! The `StoredMessage` aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::SessionId;
use crate::message::domain::{MessageId, Role};

/// A single ingested message, persisted verbatim alongside its derived
/// embedding and token count.
///
/// # Invariants
///
/// - `content` is non-empty (checked by the ingest pipeline before storage).
/// - `embedding`, once set, never changes length across the session's life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    id: MessageId,
    session_id: SessionId,
    /// The free-text role label supplied by the caller, e.g. an agent's name.
    role: String,
    /// The structural category of the message.
    role_type: Role,
    content: String,
    token_count: u32,
    embedding: Option<Vec<f32>>,
    metadata: Map<String, Value>,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl StoredMessage {
    /// Creates a new stored message with no embedding yet attached.
    #[must_use]
    pub fn new(
        id: MessageId,
        session_id: SessionId,
        role: impl Into<String>,
        role_type: Role,
        content: impl Into<String>,
        token_count: u32,
        metadata: Map<String, Value>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            session_id,
            role: role.into(),
            role_type,
            content: content.into(),
            token_count,
            embedding: None,
            metadata,
            created_at,
            deleted_at: None,
        }
    }

    /// Reconstructs a stored message from persisted storage, preserving its
    /// tombstone state.
    #[must_use]
    #[expect(clippy::too_many_arguments, reason = "mirrors the entity's flat attribute list")]
    pub fn from_persisted(
        id: MessageId,
        session_id: SessionId,
        role: impl Into<String>,
        role_type: Role,
        content: impl Into<String>,
        token_count: u32,
        embedding: Option<Vec<f32>>,
        metadata: Map<String, Value>,
        created_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            session_id,
            role: role.into(),
            role_type,
            content: content.into(),
            token_count,
            embedding,
            metadata,
            created_at,
            deleted_at,
        }
    }

    /// Returns a copy of `self` with `embedding` attached.
    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Returns the message identifier. This is also the episodic node's id
    /// in the graph store, per `spec.md` §3's cross-store identity rule.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the owning session.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns the free-text role label.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Returns the structural role category.
    #[must_use]
    pub const fn role_type(&self) -> Role {
        self.role_type
    }

    /// Returns the message content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the token count computed at ingest time.
    #[must_use]
    pub const fn token_count(&self) -> u32 {
        self.token_count
    }

    /// Returns the embedding vector, if one has been attached.
    #[must_use]
    pub fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref()
    }

    /// Returns the free-form metadata map.
    #[must_use]
    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the soft-deletion timestamp, if the message has been
    /// tombstoned (`spec.md` §3: deleting a session tombstones its messages).
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns `true` if the message has been tombstoned.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
