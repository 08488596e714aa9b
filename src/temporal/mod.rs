//! The temporal resolver (TR): pure, I/O-free logic over candidate edges.
//!
//! Every function here is deterministic given its inputs and performs no
//! I/O — `spec.md` §4.3 requires this so the resolver can be exhaustively
//! unit-tested without a live graph store. Grounded on
//! `message::validation::rules`'s pure rule-function style: one function
//! per concern, composed by the caller (here, `ingest::services`) rather
//! than bundled into a God object.

mod contradiction;
mod conflict;
mod duplicate;

pub use contradiction::resolve_edge_contradictions;
pub use conflict::{
    resolve_content_merge, resolve_last_writer_wins, resolve_temporal_ordering,
    ConflictDetection, ConflictResolutionStrategy, ResolvedConflict, detect_version_conflict,
};
pub use duplicate::{detect_duplicate_edge, DuplicateDetectionStrategy};
