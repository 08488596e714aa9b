//! The stored conversational record: `spec.md` §3 Message entity.
//!
//! This is deliberately a lighter shape than [`crate::message::domain::Message`]:
//! a flat `content: String` plus `role_type`, `token_count` and an optional
//! embedding, rather than the teacher's multi-part assistant content model.
//! Ingest persists records of this shape; `message::domain::Message` remains
//! available for callers that need the richer conversation-history aggregate.

mod record;

pub use record::StoredMessage;
