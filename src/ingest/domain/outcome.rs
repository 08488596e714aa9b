//! The result of a successful ingest (`spec.md` §4.1 Guarantees on success).

use crate::message::domain::MessageId;
use crate::temporal::ResolvedConflict;

/// Summary of what a committed ingest wrote, returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    /// The session's version after this ingest (always `expected + 1` from
    /// the session's perspective, regardless of whether a conflict fired).
    pub session_version: u64,
    /// Identifiers of the messages written, in batch order.
    pub message_ids: Vec<MessageId>,
    /// Number of entity nodes upserted.
    pub entities_written: usize,
    /// Number of edges committed (merged duplicates or brand-new facts).
    pub edges_committed: usize,
    /// Number of existing edges invalidated by contradiction.
    pub edges_invalidated: usize,
    /// The resolution that fired, if a version conflict was detected.
    pub resolution: Option<ResolvedConflict>,
}
