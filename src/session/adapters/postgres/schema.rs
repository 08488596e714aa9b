//! Diesel schema for session persistence.

diesel::table! {
    /// Session records.
    sessions (id) {
        /// Internal session identifier.
        id -> Uuid,
        /// Owning user identifier.
        user_id -> Uuid,
        /// Optional session type restricting which agent groups may access it.
        session_type_id -> Nullable<Uuid>,
        /// Optional display name.
        #[max_length = 255]
        session_name -> Nullable<Varchar>,
        /// Monotonic version counter advanced on every successful ingest.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Soft-deletion timestamp, set when the session is deleted.
        deleted_at -> Nullable<Timestamptz>,
    }
}
