//! Domain types for the append-only agent interaction log.

mod log;

pub use log::{AgentInteractionLog, PersistedInteractionLogData};
