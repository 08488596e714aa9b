//! Session aggregate root.

use super::SessionDomainError;
use crate::ids::{SessionId, SessionTypeId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A session groups the messages written on behalf of one user and tracks
/// the monotonic version counter the ingest pipeline advances on every
/// successful write. Its identifier doubles as the knowledge graph's
/// `group_id` partition key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    user_id: UserId,
    session_type_id: Option<SessionTypeId>,
    session_name: Option<String>,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSessionData {
    /// Persisted session identifier.
    pub id: SessionId,
    /// Persisted owning user.
    pub user_id: UserId,
    /// Persisted session type, if the session is restricted to one.
    pub session_type_id: Option<SessionTypeId>,
    /// Persisted display name.
    pub session_name: Option<String>,
    /// Persisted version counter.
    pub version: u64,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted soft-deletion timestamp, if deleted.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a new session at version `0`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::EmptySessionName`] if `session_name` is
    /// `Some` but contains only whitespace.
    pub fn new(
        user_id: UserId,
        session_type_id: Option<SessionTypeId>,
        session_name: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, SessionDomainError> {
        let session_name = validate_name(session_name)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: SessionId::new(),
            user_id,
            session_type_id,
            session_name,
            version: 0,
            created_at: timestamp,
            updated_at: timestamp,
            deleted_at: None,
        })
    }

    /// Reconstructs a session from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSessionData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            session_type_id: data.session_type_id,
            session_name: data.session_name,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
            deleted_at: data.deleted_at,
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the session type restriction, if any.
    #[must_use]
    pub const fn session_type_id(&self) -> Option<SessionTypeId> {
        self.session_type_id
    }

    /// Returns the display name, if set.
    #[must_use]
    pub fn session_name(&self) -> Option<&str> {
        self.session_name.as_deref()
    }

    /// Returns the current version counter.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the soft-deletion timestamp, if the session has been deleted.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns `true` if the session has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Advances the version counter by one.
    ///
    /// Called by the ingest pipeline once per successful ingest request, so
    /// the returned version is what the pipeline should record as
    /// `last_writer_wins` provenance for any facts it writes in the same
    /// request.
    ///
    /// # Panics
    ///
    /// Will not panic in practice: advancing once per ingest request would
    /// require `2^64` successful ingests against a single session.
    pub fn record_ingest(&mut self, clock: &impl Clock) {
        self.version += 1;
        self.touch(clock);
    }

    /// Renames the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::EmptySessionName`] if `name` is empty
    /// or only whitespace.
    pub fn rename(&mut self, name: String, clock: &impl Clock) -> Result<(), SessionDomainError> {
        self.session_name = validate_name(Some(name))?;
        self.touch(clock);
        Ok(())
    }

    /// Marks the session as deleted without removing its history.
    pub fn soft_delete(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.deleted_at = Some(timestamp);
        self.updated_at = timestamp;
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn validate_name(name: Option<String>) -> Result<Option<String>, SessionDomainError> {
    match name {
        Some(name) if name.trim().is_empty() => Err(SessionDomainError::EmptySessionName),
        other => Ok(other),
    }
}
