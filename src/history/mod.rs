//! The relational record of ingested messages (`spec.md` §3, §4.4).
//!
//! Grounded on `message::ports::repository` / `message::adapters::memory`'s
//! port-and-adapter shape, applied to the simpler record the ingest
//! pipeline actually needs to persist.

pub mod adapters;
pub mod domain;
pub mod ports;
