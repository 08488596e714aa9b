//! The `Embedder` port: deterministic text-to-vector mapping.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for embedder operations.
pub type EmbedderResult<T> = Result<T, EmbedderError>;

/// Errors returned by embedder implementations.
#[derive(Debug, Error)]
pub enum EmbedderError {
    /// The embedder returned a vector of the wrong dimension. `spec.md` §6:
    /// "All vectors must be of the configured dimension ... mismatch is a
    /// fatal error."
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The configured dimension.
        expected: usize,
        /// The dimension actually returned.
        actual: usize,
    },

    /// The embedder call failed transport-wise or returned an error payload.
    #[error("embedder call failed: {0}")]
    CallFailed(Arc<dyn std::error::Error + Send + Sync>),
}

impl EmbedderError {
    /// Wraps a transport or remote failure.
    pub fn call_failed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::CallFailed(Arc::new(err))
    }
}

/// A deterministic mapping from text to a fixed-dimension float vector
/// (`spec.md` §2 Embedder). Calls are assumed synchronous with small
/// per-call latency and are safe to issue concurrently (`spec.md` §5).
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns the configured embedding dimension.
    fn dimension(&self) -> usize;

    /// Embeds a batch of texts, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedderError::DimensionMismatch`] if any returned vector
    /// does not match [`Embedder::dimension`], or
    /// [`EmbedderError::CallFailed`] on transport/remote failure.
    async fn embed(&self, texts: &[String]) -> EmbedderResult<Vec<Vec<f32>>>;

    /// Embeds a single text. Default implementation delegates to
    /// [`Embedder::embed`] with a one-element batch.
    async fn embed_one(&self, text: &str) -> EmbedderResult<Vec<f32>> {
        let mut vectors = self.embed(std::slice::from_ref(&text.to_owned())).await?;
        Ok(vectors.pop().unwrap_or_default())
    }
}
