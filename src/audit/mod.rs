//! Append-only interaction log and its query/analytics surface (`spec.md`
//! §4.5).
//!
//! Grounded on `message::ports::repository` / `message::adapters::memory`'s
//! port-and-adapter shape, with analytics derived the way
//! `message::domain::handoff` tracks agent-to-agent transitions.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
