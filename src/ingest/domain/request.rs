//! Ingest request shape and batch validation (`spec.md` §4.1 Inputs).

use serde_json::{Map, Value};
use thiserror::Error;

use crate::ids::{AgentId, SessionId};
use crate::message::domain::Role;

/// Maximum number of messages accepted in a single ingest batch.
pub const MAX_BATCH_SIZE: usize = 30;

/// Maximum content length, in characters, for a single message.
pub const MAX_CONTENT_CHARS: usize = 50_000;

/// One message as supplied by the caller, prior to persistence.
///
/// This is deliberately lighter than [`crate::message::domain::Message`]'s
/// multi-part content: `spec.md`'s Message entity carries a single
/// `content` string, not an assistant-style content-block list.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestMessageInput {
    /// Free-text role label, e.g. an agent's name.
    pub role: String,
    /// Structural role category.
    pub role_type: Role,
    /// Raw message content.
    pub content: String,
    /// Caller-supplied metadata, merged with any resolution annotations.
    pub metadata: Map<String, Value>,
}

/// A single ingest call: `Ingest(sessionId, agentId, batch)` (`spec.md` §4.1).
#[derive(Debug, Clone, PartialEq)]
pub struct IngestRequest {
    /// The session the batch is written into.
    pub session_id: SessionId,
    /// The agent performing the write.
    pub agent_id: AgentId,
    /// The version the caller last observed, if any. `None` skips conflict
    /// classification entirely (first write, or caller does not track it).
    pub expected_version: Option<u64>,
    /// The batch of messages to ingest.
    pub messages: Vec<IngestMessageInput>,
}

/// Errors from validating an [`IngestRequest`] against `spec.md` §4.1's
/// input constraints, prior to any I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestValidationError {
    /// The batch contained no messages.
    #[error("ingest batch must contain at least one message")]
    EmptyBatch,

    /// The batch exceeded the maximum allowed size.
    #[error("ingest batch of {actual} messages exceeds the limit of {max}")]
    BatchTooLarge {
        /// The configured maximum.
        max: usize,
        /// The actual batch size.
        actual: usize,
    },

    /// A message's content was empty.
    #[error("message at index {index} has empty content")]
    EmptyContent {
        /// The offending message's index within the batch.
        index: usize,
    },

    /// A message's content exceeded the maximum length.
    #[error("message at index {index} has {length} characters, exceeds limit of {max}")]
    ContentTooLong {
        /// The offending message's index within the batch.
        index: usize,
        /// The message's actual character count.
        length: usize,
        /// The configured maximum.
        max: usize,
    },
}

/// Validates `request` against `spec.md` §4.1's input constraints.
///
/// # Errors
///
/// Returns the first [`IngestValidationError`] encountered, in batch order.
pub fn validate_request(request: &IngestRequest) -> Result<(), IngestValidationError> {
    if request.messages.is_empty() {
        return Err(IngestValidationError::EmptyBatch);
    }
    if request.messages.len() > MAX_BATCH_SIZE {
        return Err(IngestValidationError::BatchTooLarge {
            max: MAX_BATCH_SIZE,
            actual: request.messages.len(),
        });
    }
    for (index, message) in request.messages.iter().enumerate() {
        if message.content.trim().is_empty() {
            return Err(IngestValidationError::EmptyContent { index });
        }
        let length = message.content.chars().count();
        if length > MAX_CONTENT_CHARS {
            return Err(IngestValidationError::ContentTooLong {
                index,
                length,
                max: MAX_CONTENT_CHARS,
            });
        }
    }
    Ok(())
}
