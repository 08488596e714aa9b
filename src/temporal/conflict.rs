//! Version-conflict classification and the resolution ladder (`spec.md` §4.3).

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::ids::SessionId;

/// Raised when the version the caller expected to overwrite does not match
/// the version currently stored for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictDetection {
    /// The session the conflicting write targeted.
    pub session_id: SessionId,
    /// The version the caller expected.
    pub expected_version: u64,
    /// The version actually stored.
    pub actual_version: u64,
}

impl ConflictDetection {
    /// Returns the detection status. `spec.md` §4.3 specifies this as the
    /// literal string `"detected"` — there is only ever one status because
    /// a `ConflictDetection` is only ever constructed when a conflict
    /// exists; absence is represented by `None`, not another status value.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        "detected"
    }
}

/// Returns `Some(ConflictDetection)` iff `expected != actual`; else `None`.
///
/// # Examples
///
/// ```
/// use eion::ids::SessionId;
/// use eion::temporal::detect_version_conflict;
///
/// let session = SessionId::new();
/// assert_eq!(detect_version_conflict(1, 1, session), None);
/// assert!(detect_version_conflict(1, 2, session).is_some());
/// ```
#[must_use]
pub const fn detect_version_conflict(
    expected: u64,
    actual: u64,
    session_id: SessionId,
) -> Option<ConflictDetection> {
    if expected == actual {
        None
    } else {
        Some(ConflictDetection {
            session_id,
            expected_version: expected,
            actual_version: actual,
        })
    }
}

/// The deterministic sequence of strategies the ingest pipeline tries, in
/// order, to reconcile a version conflict without surfacing it to the
/// caller (`spec.md` §4.3, the glossary's "resolution ladder").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolutionStrategy {
    /// New messages are orthogonal to the existing timeline and can simply
    /// be appended.
    ContentMerge,
    /// Preserve chronological order downstream by annotating messages with
    /// resolution provenance.
    TemporalOrdering,
    /// Accept the new write as-is; last resort.
    LastWriterWins,
}

impl ConflictResolutionStrategy {
    /// Returns the strategy's canonical wire/metadata name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ContentMerge => "content_merge",
            Self::TemporalOrdering => "temporal_ordering",
            Self::LastWriterWins => "last_writer_wins",
        }
    }
}

impl std::fmt::Display for ConflictResolutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome of applying one rung of the resolution ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedConflict {
    /// The strategy that resolved the conflict.
    pub strategy: ConflictResolutionStrategy,
    /// Whether a human operator must intervene before the write can proceed.
    /// Every ladder rung in `spec.md` §4.3 resolves automatically, so this
    /// is always `false` for the strategies this module implements; it
    /// exists so a future, non-automatic strategy can report `true` without
    /// changing this type's shape.
    pub requires_manual_action: bool,
    /// When resolution was performed.
    pub resolved_at: DateTime<Utc>,
}

/// `content_merge`: resolves whenever the batch is non-empty, since new
/// messages are orthogonal to the existing timeline and can be appended
/// without reconciling anything.
#[must_use]
pub fn resolve_content_merge(batch_len: usize, now: DateTime<Utc>) -> Option<ResolvedConflict> {
    if batch_len == 0 {
        return None;
    }
    Some(ResolvedConflict {
        strategy: ConflictResolutionStrategy::ContentMerge,
        requires_manual_action: false,
        resolved_at: now,
    })
}

/// `temporal_ordering`: always resolves. Decorates each message's metadata
/// map with `conflict_resolved_at`, `resolution_strategy`, and
/// `conflict_id`, so that downstream readers can reconstruct which write
/// path a message travelled without consulting the conflict-detection
/// event itself.
#[must_use]
pub fn resolve_temporal_ordering(
    message_metadata: &mut [Map<String, Value>],
    conflict_id: Uuid,
    now: DateTime<Utc>,
) -> ResolvedConflict {
    for metadata in message_metadata.iter_mut() {
        metadata.insert(
            "conflict_resolved_at".to_owned(),
            Value::String(now.to_rfc3339()),
        );
        metadata.insert(
            "resolution_strategy".to_owned(),
            Value::String(ConflictResolutionStrategy::TemporalOrdering.as_str().to_owned()),
        );
        metadata.insert(
            "conflict_id".to_owned(),
            Value::String(conflict_id.to_string()),
        );
    }
    ResolvedConflict {
        strategy: ConflictResolutionStrategy::TemporalOrdering,
        requires_manual_action: false,
        resolved_at: now,
    }
}

/// `last_writer_wins`: accepts the new write as-is. The last rung of the
/// ladder; always resolves and never requires manual action (`spec.md` §8:
/// "`ResolveConflict(detected, "last_writer_wins", …)` always returns
/// `requires_manual_action=false`").
#[must_use]
pub const fn resolve_last_writer_wins(now: DateTime<Utc>) -> ResolvedConflict {
    ResolvedConflict {
        strategy: ConflictResolutionStrategy::LastWriterWins,
        requires_manual_action: false,
        resolved_at: now,
    }
}
