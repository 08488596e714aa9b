//! HTTP embedder adapter matching the wire contract in `spec.md` §6.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::embedding::ports::{Embedder, EmbedderError, EmbedderResult};

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    texts: &'a [String],
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
    #[serde(default)]
    error: Option<String>,
}

/// Embedder backed by an HTTP endpoint, per `spec.md` §6's embedder wire
/// contract: `POST {texts, model} -> {embeddings, error?}`.
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    dimension: usize,
}

impl HttpEmbedder {
    /// Creates an HTTP embedder targeting `endpoint`, requesting `model`,
    /// validating responses against `dimension`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            client: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(5))
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            model: model.into(),
            dimension,
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> EmbedderResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest {
                texts,
                model: &self.model,
            })
            .send()
            .await
            .map_err(EmbedderError::call_failed)?;
        let body: EmbedResponse = response.json().await.map_err(EmbedderError::call_failed)?;
        if let Some(error) = body.error {
            return Err(EmbedderError::call_failed(std::io::Error::other(error)));
        }
        for embedding in &body.embeddings {
            if embedding.len() != self.dimension {
                return Err(EmbedderError::DimensionMismatch {
                    expected: self.dimension,
                    actual: embedding.len(),
                });
            }
        }
        Ok(body.embeddings)
    }
}
