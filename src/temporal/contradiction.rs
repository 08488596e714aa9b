//! Contradiction detection and invalidation (`spec.md` §4.3).

use chrono::{DateTime, Utc};

use crate::graph::domain::Edge;

/// Given the edge the pipeline just committed and a set of candidate edges
/// sharing its `group_id` and similar embedding, returns invalidated copies
/// of every candidate that `resolved` contradicts.
///
/// A non-expired candidate is invalidated when any of `spec.md` §4.3's three
/// rules hold:
///
/// 1. `resolved.invalid_at` is set, `candidate.valid_at` is set, and
///    `resolved.invalid_at < candidate.valid_at`.
/// 2. `resolved.valid_at` is set, `candidate.valid_at` is set, and
///    `resolved.valid_at > candidate.valid_at`.
/// 3. `resolved` and `candidate` share `(source, target, relation_type)`
///    and their `fact` text differs.
///
/// Candidates are visited in input order (not re-sorted), so that when two
/// candidates are invalidated under otherwise-equal timestamps, both are
/// invalidated deterministically rather than by arbitrary selection — the
/// tie-break `spec.md` §4.3 calls for is "invalidate both", which falls out
/// naturally of evaluating every candidate independently.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use eion::graph::domain::{Edge, NewEdgeParams};
/// use eion::ids::{AgentId, EdgeId, EntityId, EpisodicId, SessionId};
/// use eion::temporal::resolve_edge_contradictions;
///
/// let group = SessionId::new();
/// let source = EntityId::new();
/// let target = EntityId::new();
/// let now = Utc::now();
/// let candidate = Edge::new(NewEdgeParams {
///     id: EdgeId::new(),
///     source_uuid: source,
///     target_uuid: target,
///     relation_type: "WORKS_FOR".to_owned(),
///     fact: "Alice works at Acme.".to_owned(),
///     fact_embedding: vec![1.0, 0.0],
///     group_id: group,
///     episode: EpisodicId::new(),
///     valid_at: Some(now - Duration::days(1)),
///     last_modified_by: AgentId::new(),
/// });
/// let mut resolved = Edge::new(NewEdgeParams {
///     id: EdgeId::new(),
///     source_uuid: source,
///     target_uuid: target,
///     relation_type: "WORKS_FOR".to_owned(),
///     fact: "Alice works at Globex.".to_owned(),
///     fact_embedding: vec![0.99, 0.1],
///     group_id: group,
///     episode: EpisodicId::new(),
///     valid_at: Some(now),
///     last_modified_by: AgentId::new(),
/// });
/// let invalidated = resolve_edge_contradictions(&resolved, &[candidate], now);
/// assert_eq!(invalidated.len(), 1);
/// assert!(invalidated[0].is_expired());
/// ```
#[must_use]
pub fn resolve_edge_contradictions(resolved: &Edge, candidates: &[Edge], now: DateTime<Utc>) -> Vec<Edge> {
    candidates
        .iter()
        .filter(|candidate| !candidate.is_expired() && candidate.id() != resolved.id())
        .filter(|candidate| contradicts(resolved, candidate))
        .map(|candidate| candidate.invalidated_copy(now, resolved.valid_at(), resolved.id()))
        .collect()
}

fn contradicts(resolved: &Edge, candidate: &Edge) -> bool {
    let invalid_before_candidate_valid = match (resolved.invalid_at(), candidate.valid_at()) {
        (Some(invalid_at), Some(candidate_valid_at)) => invalid_at < candidate_valid_at,
        _ => false,
    };
    let valid_after_candidate_valid = match (resolved.valid_at(), candidate.valid_at()) {
        (Some(valid_at), Some(candidate_valid_at)) => valid_at > candidate_valid_at,
        _ => false,
    };
    let same_triple_different_fact = resolved.source_uuid() == candidate.source_uuid()
        && resolved.target_uuid() == candidate.target_uuid()
        && resolved.relation_type() == candidate.relation_type()
        && resolved.fact() != candidate.fact();
    invalid_before_candidate_valid || valid_after_candidate_valid || same_triple_different_fact
}
