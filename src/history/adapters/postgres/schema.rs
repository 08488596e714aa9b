//! Diesel schema for ingested-message persistence.

diesel::table! {
    /// Ingested message records, per `spec.md` §6's persisted state layout.
    eion_messages (id) {
        /// Message identifier; doubles as the episodic node's graph id.
        id -> Uuid,
        /// Owning session.
        session_id -> Uuid,
        /// Free-text role label supplied by the caller.
        #[max_length = 255]
        role -> Varchar,
        /// Structural role category (`norole`, `system`, `assistant`, `user`, `function`, `tool`).
        #[max_length = 32]
        role_type -> Varchar,
        /// Raw message content.
        content -> Text,
        /// Token count computed at ingest time.
        token_count -> Int4,
        /// Embedding vector, stored as a JSON array of floats.
        embedding -> Nullable<Jsonb>,
        /// Free-form metadata, stored as JSONB.
        metadata -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Soft-deletion timestamp; `NULL` while the message is live.
        deleted_at -> Nullable<Timestamptz>,
    }
}
