//! Diesel schema for directory persistence.

diesel::table! {
    /// Developer-managed user records.
    directory_users (id) {
        /// Internal user identifier.
        id -> Uuid,
        /// Optional display name.
        #[max_length = 255]
        display_name -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Soft-deletion timestamp.
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Agent client records.
    directory_agents (id) {
        /// Internal agent identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Permission string, e.g. `"cru"`.
        #[max_length = 4]
        permissions -> Varchar,
        /// Lifecycle status (`active` or `inactive`).
        #[max_length = 50]
        status -> Varchar,
        /// Whether the agent is a transient guest.
        is_guest -> Bool,
        /// Optional agent group membership.
        group_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Agent group records.
    agent_groups (id) {
        /// Internal group identifier.
        id -> Uuid,
        /// Group name.
        #[max_length = 255]
        name -> Varchar,
    }
}

diesel::table! {
    /// Session type records.
    session_types (id) {
        /// Internal session type identifier.
        id -> Uuid,
        /// Session type name.
        #[max_length = 255]
        name -> Varchar,
        /// Permitted agent group identifiers as JSONB.
        allowed_group_ids -> Jsonb,
    }
}
