//! Identifier newtypes shared across subsystem boundaries.
//!
//! Each subsystem that only ever needs an identifier internally (for
//! instance `message::domain::ids::TurnId`) keeps its own newtype close to
//! the code that uses it. The identifiers in this module are different:
//! they are read and written by multiple subsystems (a `SessionId` is
//! created by the session module, referenced by messages, read by the
//! ingest pipeline, and recorded in the interaction log), so they are
//! hoisted here rather than duplicated or imported across sibling module
//! boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID value.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    SessionId,
    "Identifies a session: the scope that groups messages written by one or more agents on \
     behalf of one user, and that the knowledge graph's `group_id` partitions are derived from."
);
uuid_id!(UserId, "Identifies the developer-managed user a session belongs to.");
uuid_id!(AgentId, "Identifies an agent client authorised to read and write session data.");
uuid_id!(
    AgentGroupId,
    "Identifies a named collection of agents sharing a permission grant."
);
uuid_id!(
    SessionTypeId,
    "Identifies a session type, which restricts which agent groups may access it."
);
uuid_id!(EntityId, "Identifies an `EntityNode` in the knowledge graph.");
uuid_id!(EdgeId, "Identifies an `Edge` (fact) in the knowledge graph.");
uuid_id!(EpisodicId, "Identifies an `EpisodicNode` in the knowledge graph.");
uuid_id!(InteractionLogId, "Identifies an entry in the agent interaction log.");
