//! Subprocess extractor adapter: one process invocation per ingest batch,
//! JSON on stdin, JSON on stdout, matching `spec.md` §6's wire contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::extraction::ports::{
    ExtractedEdge, ExtractedNode, ExtractionRequest, ExtractionResult, Extractor, ExtractorError,
    ExtractorResult,
};

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    uuid: String,
    role: &'a str,
    role_type: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    group_id: String,
    messages: Vec<WireMessage<'a>>,
    previous_episodes: Vec<String>,
    entity_types: &'a [String],
    use_numa: bool,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    extracted_nodes: Vec<ExtractedNode>,
    #[serde(default)]
    extracted_edges: Vec<ExtractedEdge>,
}

/// Invokes an external extraction process per call, per `spec.md` §6: "The
/// extractor is invoked as a subprocess with JSON on stdin and JSON on
/// stdout; the service does not depend on a specific language runtime for
/// it." Grounded on `bin/pg_worker.rs`'s subprocess-and-JSON-payload
/// pattern, adapted from a long-lived privileged helper to a single-flight
/// RPC invoked once per ingest batch.
pub struct SubprocessExtractor {
    program: String,
    args: Vec<String>,
    call_timeout: Duration,
}

impl SubprocessExtractor {
    /// Creates an adapter that invokes `program args...` once per call,
    /// bounded by `call_timeout`.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>, call_timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            call_timeout,
        }
    }
}

#[async_trait]
impl Extractor for SubprocessExtractor {
    async fn extract(&self, request: ExtractionRequest) -> ExtractorResult<ExtractionResult> {
        let wire = WireRequest {
            group_id: request.group_id.to_string(),
            messages: request
                .messages
                .iter()
                .map(|message| WireMessage {
                    uuid: message.uuid.to_string(),
                    role: &message.role,
                    role_type: &message.role_type,
                    content: &message.content,
                })
                .collect(),
            previous_episodes: request.previous_episodes.iter().map(ToString::to_string).collect(),
            entity_types: &request.entity_types,
            use_numa: request.use_numa,
        };
        let payload = serde_json::to_vec(&wire).map_err(ExtractorError::malformed)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(ExtractorError::unavailable)?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            ExtractorError::unavailable(std::io::Error::other("extractor stdin unavailable"))
        })?;
        stdin.write_all(&payload).await.map_err(ExtractorError::unavailable)?;
        drop(stdin);

        let output = timeout(self.call_timeout, child.wait_with_output())
            .await
            .map_err(ExtractorError::unavailable)?
            .map_err(ExtractorError::unavailable)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractorError::ExtractionFailed(stderr.into_owned()));
        }

        let response: WireResponse =
            serde_json::from_slice(&output.stdout).map_err(ExtractorError::malformed)?;

        match response.success {
            Some(true) => Ok(ExtractionResult {
                nodes: response.extracted_nodes,
                edges: response.extracted_edges,
            }),
            Some(false) => Err(ExtractorError::ExtractionFailed(
                response.error.unwrap_or_else(|| "extraction failed".to_owned()),
            )),
            None => Err(ExtractorError::ExtractionFailed(
                "response omitted required `success` field".to_owned(),
            )),
        }
    }
}
