//! Duplicate-edge detection strategies (`spec.md` §4.3).

use std::collections::HashSet;

use crate::graph::domain::Edge;
use crate::vector::cosine_similarity;

/// The three duplicate-detection strategies `spec.md` §4.3 names. The
/// ingest pipeline selects one per call; the resolver never mixes them
/// within a single decision, so ambiguity about which matched is never
/// surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DuplicateDetectionStrategy {
    /// Cosine similarity over `fact_embedding`, first match above `threshold` wins.
    VectorSimilarity {
        /// Minimum cosine similarity to count as a match.
        threshold: f32,
    },
    /// Exact `(source_uuid, target_uuid, relation_type)` triple match.
    EntityPatternMatch,
    /// Identical endpoints and Jaccard-similar `fact` text above `threshold`.
    StringSimilarity {
        /// Minimum Jaccard similarity over lowercased word sets.
        threshold: f64,
    },
}

/// Finds the first edge in `existing` that `candidate` duplicates under
/// `strategy`, or `None` if none match.
///
/// Iterates `existing` in input order so that, when multiple edges would
/// match, the result is deterministic (`spec.md` §4.3 "first ... return
/// the first with similarity > threshold").
///
/// # Examples
///
/// ```
/// use eion::graph::domain::{Edge, NewEdgeParams};
/// use eion::ids::{AgentId, EdgeId, EntityId, EpisodicId, SessionId};
/// use eion::temporal::{detect_duplicate_edge, DuplicateDetectionStrategy};
///
/// let group = SessionId::new();
/// let source = EntityId::new();
/// let target = EntityId::new();
/// let existing = Edge::new(NewEdgeParams {
///     id: EdgeId::new(),
///     source_uuid: source,
///     target_uuid: target,
///     relation_type: "WORKS_FOR".to_owned(),
///     fact: "Alice works at Acme.".to_owned(),
///     fact_embedding: vec![1.0, 0.0],
///     group_id: group,
///     episode: EpisodicId::new(),
///     valid_at: None,
///     last_modified_by: AgentId::new(),
/// });
/// let candidate = Edge::new(NewEdgeParams {
///     id: EdgeId::new(),
///     source_uuid: source,
///     target_uuid: target,
///     relation_type: "WORKS_FOR".to_owned(),
///     fact: "Alice is employed by Acme.".to_owned(),
///     fact_embedding: vec![0.99, 0.01],
///     group_id: group,
///     episode: EpisodicId::new(),
///     valid_at: None,
///     last_modified_by: AgentId::new(),
/// });
/// let found = detect_duplicate_edge(
///     &candidate,
///     &[existing.clone()],
///     DuplicateDetectionStrategy::VectorSimilarity { threshold: 0.85 },
/// );
/// assert_eq!(found, Some(existing));
/// ```
#[must_use]
pub fn detect_duplicate_edge(
    candidate: &Edge,
    existing: &[Edge],
    strategy: DuplicateDetectionStrategy,
) -> Option<Edge> {
    match strategy {
        DuplicateDetectionStrategy::VectorSimilarity { threshold } => {
            detect_by_vector_similarity(candidate, existing, threshold)
        }
        DuplicateDetectionStrategy::EntityPatternMatch => detect_by_entity_pattern(candidate, existing),
        DuplicateDetectionStrategy::StringSimilarity { threshold } => {
            detect_by_string_similarity(candidate, existing, threshold)
        }
    }
}

fn detect_by_vector_similarity(candidate: &Edge, existing: &[Edge], threshold: f32) -> Option<Edge> {
    existing
        .iter()
        .find(|other| {
            !candidate.fact_embedding().is_empty()
                && !other.fact_embedding().is_empty()
                && cosine_similarity(candidate.fact_embedding(), other.fact_embedding()) > threshold
        })
        .cloned()
}

fn detect_by_entity_pattern(candidate: &Edge, existing: &[Edge]) -> Option<Edge> {
    existing
        .iter()
        .find(|other| {
            other.source_uuid() == candidate.source_uuid()
                && other.target_uuid() == candidate.target_uuid()
                && other.relation_type() == candidate.relation_type()
        })
        .cloned()
}

fn detect_by_string_similarity(candidate: &Edge, existing: &[Edge], threshold: f64) -> Option<Edge> {
    let candidate_words = word_set(candidate.fact());
    existing
        .iter()
        .find(|other| {
            other.source_uuid() == candidate.source_uuid()
                && other.target_uuid() == candidate.target_uuid()
                && jaccard_similarity(&candidate_words, &word_set(other.fact())) > threshold
        })
        .cloned()
}

fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase().split_whitespace().map(str::to_owned).collect()
}

#[expect(clippy::float_arithmetic, reason = "jaccard similarity is a ratio reported as a score, not an integer quantity")]
fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        #[expect(clippy::cast_precision_loss, reason = "word-set sizes are small; exact f64 representation is not required for a similarity ratio")]
        {
            intersection as f64 / union as f64
        }
    }
}
