//! Scripted mock extractor for tests: returns a pre-programmed response
//! (or a canned heuristic extraction) without spawning a process.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use crate::extraction::ports::{
    ExtractedEdge, ExtractedNode, ExtractionRequest, ExtractionResult, Extractor, ExtractorError,
    ExtractorResult,
};
use crate::ids::{EdgeId, EntityId};

/// A scripted extraction outcome for one call.
pub enum ScriptedResponse {
    /// Return this result.
    Success(ExtractionResult),
    /// Fail with this message, as if the worker had returned `success: false`.
    Failure(String),
}

/// Extractor that plays back a queue of scripted responses, one per call,
/// or falls back to a simple heuristic (one entity per capitalised word,
/// one edge between the first two) when the queue is empty. Grounded on
/// `message::adapters::memory`'s in-memory-for-tests convention.
pub struct MockExtractor {
    queue: Mutex<Vec<ScriptedResponse>>,
}

impl MockExtractor {
    /// Creates a mock extractor with no scripted responses; every call uses
    /// the heuristic fallback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock extractor that plays back `responses` in order.
    #[must_use]
    pub fn scripted(responses: Vec<ScriptedResponse>) -> Self {
        Self {
            queue: Mutex::new(responses),
        }
    }

    fn heuristic_extract(request: &ExtractionRequest) -> ExtractionResult {
        let mut nodes = Vec::new();
        for message in &request.messages {
            for word in message.content.split_whitespace() {
                let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric());
                if trimmed.chars().next().is_some_and(char::is_uppercase) && trimmed.len() > 1 {
                    if nodes.iter().any(|node: &ExtractedNode| node.name == trimmed) {
                        continue;
                    }
                    nodes.push(ExtractedNode {
                        uuid: EntityId::new(),
                        name: trimmed.to_owned(),
                        group_id: request.group_id,
                        labels: vec!["Entity".to_owned()],
                        summary: trimmed.to_owned(),
                        created_at: Utc::now(),
                    });
                }
            }
        }
        let mut edges = Vec::new();
        if nodes.len() >= 2 {
            let summary = request
                .messages
                .first()
                .map(|message| message.content.clone())
                .unwrap_or_default();
            edges.push(ExtractedEdge {
                uuid: EdgeId::new(),
                source_uuid: nodes[0].uuid,
                target_uuid: nodes[1].uuid,
                relation_type: "RELATES_TO".to_owned(),
                summary,
                created_at: Utc::now(),
            });
        }
        ExtractionResult { nodes, edges }
    }
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    async fn extract(&self, request: ExtractionRequest) -> ExtractorResult<ExtractionResult> {
        let next = self
            .queue
            .lock()
            .map_err(|err| ExtractorError::unavailable(std::io::Error::other(err.to_string())))?
            .pop();
        match next {
            Some(ScriptedResponse::Success(result)) => Ok(result),
            Some(ScriptedResponse::Failure(message)) => Err(ExtractorError::ExtractionFailed(message)),
            None => Ok(Self::heuristic_extract(&request)),
        }
    }
}
