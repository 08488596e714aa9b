//! Developer-scope directory: users, agents, agent groups, and session
//! types. These are the entities a cluster operator manages through the
//! developer-scope API surface (`spec.md` §6's `/cluster/v1/*` endpoints);
//! this module provides their domain model and persistence ports so the
//! ingest pipeline and the thin [`crate::http`] surface can authorize
//! against them, without re-implementing the full administrative console.

pub mod adapters;
pub mod domain;
pub mod ports;
