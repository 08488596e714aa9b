//! Port trait definitions for the session subsystem.

pub mod repository;

pub use repository::{SessionRepository, SessionRepositoryError, SessionRepositoryResult};
