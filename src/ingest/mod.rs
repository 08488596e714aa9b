//! The Knowledge Ingestion and Temporal Resolution Pipeline (`spec.md`
//! §4.1): the subsystem that takes inbound messages, performs per-session
//! version control, extracts a typed graph, detects and invalidates
//! contradicted facts, and merges duplicates.
//!
//! Grounded on `session::services::lifecycle::SessionLifecycleService`'s
//! generic-over-ports-and-clock service shape, fanning out to every
//! collaborator this pipeline orchestrates: [`crate::session`],
//! [`crate::history`], [`crate::graph`], [`crate::embedding`],
//! [`crate::extraction`], [`crate::temporal`], and [`crate::audit`].

pub mod domain;
pub mod error;
pub mod services;

pub use error::{IngestError, RelationalWriteError};
