//! Diesel model types for ingested-message persistence.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use super::schema::eion_messages;
use crate::history::domain::StoredMessage;
use crate::ids::SessionId;
use crate::message::domain::{MessageId, Role};

/// Database row representation of a [`StoredMessage`].
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = eion_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Message identifier.
    pub id: Uuid,
    /// Owning session.
    pub session_id: Uuid,
    /// Free-text role label.
    pub role: String,
    /// Structural role category, stored as its canonical string.
    pub role_type: String,
    /// Raw content.
    pub content: String,
    /// Token count.
    pub token_count: i32,
    /// Embedding, serialized as a JSON array.
    pub embedding: Option<Value>,
    /// Metadata JSON.
    pub metadata: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Soft-deletion timestamp, if tombstoned.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Data for inserting a message row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = eion_messages)]
pub struct NewMessageRow {
    /// Message identifier.
    pub id: Uuid,
    /// Owning session.
    pub session_id: Uuid,
    /// Free-text role label.
    pub role: String,
    /// Structural role category, stored as its canonical string.
    pub role_type: String,
    /// Raw content.
    pub content: String,
    /// Token count.
    pub token_count: i32,
    /// Embedding, serialized as a JSON array.
    pub embedding: Option<Value>,
    /// Metadata JSON.
    pub metadata: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Soft-deletion timestamp; always `None` on insert.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl NewMessageRow {
    /// Builds a row from a domain [`StoredMessage`].
    ///
    /// # Errors
    ///
    /// Returns an error message if the token count overflows `i32`.
    pub fn try_from_domain(message: &StoredMessage) -> Result<Self, String> {
        let token_count =
            i32::try_from(message.token_count()).map_err(|e| format!("token count overflow: {e}"))?;
        let embedding = message
            .embedding()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| format!("embedding serialization failed: {e}"))?;
        Ok(Self {
            id: message.id().into_inner(),
            session_id: message.session_id().into_inner(),
            role: message.role().to_owned(),
            role_type: message.role_type().as_str().to_owned(),
            content: message.content().to_owned(),
            token_count,
            embedding,
            metadata: Value::Object(message.metadata().clone()),
            created_at: message.created_at(),
            deleted_at: message.deleted_at(),
        })
    }
}

impl MessageRow {
    /// Reconstructs a domain [`StoredMessage`] from a stored row.
    ///
    /// # Errors
    ///
    /// Returns an error message if `role_type` is not a recognised role, or
    /// if `metadata` is not a JSON object.
    pub fn try_into_domain(self) -> Result<StoredMessage, String> {
        let role_type = Role::try_from(self.role_type.as_str()).map_err(|e| e.to_string())?;
        let metadata = match self.metadata {
            Value::Object(map) => map,
            other => return Err(format!("expected JSON object for metadata, got {other}")),
        };
        let embedding = self
            .embedding
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| format!("embedding deserialization failed: {e}"))?;
        Ok(StoredMessage::from_persisted(
            MessageId::from_uuid(self.id),
            SessionId::from_uuid(self.session_id),
            self.role,
            role_type,
            self.content,
            self.token_count.unsigned_abs(),
            embedding,
            metadata,
            self.created_at,
            self.deleted_at,
        ))
    }
}
