//! User aggregate: the developer-managed owner of sessions.

use crate::ids::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A developer-managed user. Users own sessions but never authenticate
/// against the agent-scope API directly; only agents acting on their
/// behalf do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    display_name: Option<String>,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted display name.
    pub display_name: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new user.
    #[must_use]
    pub fn new(display_name: Option<String>, clock: &impl Clock) -> Self {
        Self {
            id: UserId::new(),
            display_name,
            created_at: clock.utc(),
            deleted_at: None,
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            display_name: data.display_name,
            created_at: data.created_at,
            deleted_at: data.deleted_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the user's display name, if set.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns `true` if the user has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns the soft-deletion timestamp, if the user has been deleted.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Sets the user's display name, for the developer-scope `{variable,
    /// value}` update endpoint.
    pub fn set_display_name(&mut self, display_name: Option<String>) {
        self.display_name = display_name;
    }

    /// Soft-deletes the user.
    pub fn soft_delete(&mut self, clock: &impl Clock) {
        self.deleted_at = Some(clock.utc());
    }
}
