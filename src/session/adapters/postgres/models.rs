//! Diesel model types for session persistence.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::sessions;
use crate::ids::{SessionId, SessionTypeId, UserId};
use crate::session::domain::{PersistedSessionData, Session};

/// Database row representation of a session.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SessionRow {
    /// Internal session identifier.
    pub id: Uuid,
    /// Owning user identifier.
    pub user_id: Uuid,
    /// Optional session type restriction.
    pub session_type_id: Option<Uuid>,
    /// Optional display name.
    pub session_name: Option<String>,
    /// Version counter.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Data for inserting or upserting a session row.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = sessions)]
pub struct NewSession {
    /// Internal session identifier.
    pub id: Uuid,
    /// Owning user identifier.
    pub user_id: Uuid,
    /// Optional session type restriction.
    pub session_type_id: Option<Uuid>,
    /// Optional display name.
    pub session_name: Option<String>,
    /// Version counter.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl NewSession {
    /// Builds a row from a domain [`Session`].
    ///
    /// # Errors
    ///
    /// Returns an error message if the version counter overflows `i64`.
    pub fn try_from_domain(session: &Session) -> Result<Self, String> {
        let version =
            i64::try_from(session.version()).map_err(|e| format!("version overflow: {e}"))?;
        Ok(Self {
            id: session.id().into_inner(),
            user_id: session.user_id().into_inner(),
            session_type_id: session.session_type_id().map(SessionTypeId::into_inner),
            session_name: session.session_name().map(str::to_owned),
            version,
            created_at: session.created_at(),
            updated_at: session.updated_at(),
            deleted_at: session.deleted_at(),
        })
    }
}

impl SessionRow {
    /// Reconstructs a domain [`Session`] from a stored row.
    #[must_use]
    pub fn into_domain(self) -> Session {
        Session::from_persisted(PersistedSessionData {
            id: SessionId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            session_type_id: self.session_type_id.map(SessionTypeId::from_uuid),
            session_name: self.session_name,
            #[expect(
                clippy::cast_sign_loss,
                reason = "stored version is always non-negative, written by try_from_domain"
            )]
            version: self.version as u64,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}
