//! Deterministic hash-based embedder for tests and `embedding.provider = "mock"`.

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::embedding::ports::{Embedder, EmbedderResult};

/// Embeds text by hashing overlapping word shingles into a fixed-dimension
/// vector. Not semantically meaningful, but deterministic (the same text
/// always produces the same vector) and stable under small edits, which is
/// enough for tests exercising duplicate/contradiction detection without a
/// network dependency.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimension: usize,
}

impl MockEmbedder {
    /// Creates a mock embedder producing vectors of `dimension` floats.
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];
        if self.dimension == 0 {
            return vector;
        }
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return vector;
        }
        for word in &words {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            let bucket = (hasher.finish() as usize) % self.dimension;
            vector[bucket] += 1.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> EmbedderResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}
