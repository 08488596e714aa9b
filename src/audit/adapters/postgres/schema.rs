//! Diesel schema for the append-only agent interaction log.

diesel::table! {
    /// `agent_interaction_logs` records, per `spec.md` §6's persisted state layout.
    agent_interaction_logs (id) {
        /// Log entry identifier.
        id -> Uuid,
        /// Acting agent.
        agent_id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Session scope, if the operation was session-scoped.
        session_id -> Nullable<Uuid>,
        /// Logical operation name, e.g. `"ingest"`.
        #[max_length = 64]
        operation -> Varchar,
        /// HTTP endpoint path.
        #[max_length = 255]
        endpoint -> Varchar,
        /// HTTP method.
        #[max_length = 16]
        method -> Varchar,
        /// Whether the operation succeeded.
        success -> Bool,
        /// Error message, if the operation failed.
        error_msg -> Nullable<Text>,
        /// When the operation occurred.
        timestamp -> Timestamptz,
        /// Request metadata (`status_code`, `response_time_ms`, `query_params`).
        request_data -> Jsonb,
    }
}
