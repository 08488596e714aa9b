//! Diesel schema for message and conversation persistence.

diesel::table! {
    /// Conversation (session) records.
    conversations (id) {
        /// Internal conversation identifier.
        id -> Uuid,
        /// Optional reference to the associated task.
        task_id -> Nullable<Uuid>,
        /// Flexible context data as JSONB.
        context -> Jsonb,
        /// Conversation lifecycle state.
        #[max_length = 50]
        state -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Message records belonging to a conversation.
    messages (id) {
        /// Internal message identifier.
        id -> Uuid,
        /// Reference to the containing conversation.
        conversation_id -> Uuid,
        /// Message role: `user`, `assistant`, `tool`, `system`, `function`, or `norole`.
        #[max_length = 50]
        role -> Varchar,
        /// Message content parts as JSONB.
        content -> Jsonb,
        /// Message metadata as JSONB.
        metadata -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Sequence number for ordering within the conversation.
        sequence_number -> Int8,
    }
}

diesel::table! {
    /// Domain event records for the message subsystem's event log.
    domain_events (id) {
        /// Internal event identifier.
        id -> Uuid,
        /// The aggregate this event applies to.
        aggregate_id -> Uuid,
        /// Type of aggregate.
        #[max_length = 100]
        aggregate_type -> Varchar,
        /// Type of event.
        #[max_length = 100]
        event_type -> Varchar,
        /// Event payload as JSONB.
        event_data -> Jsonb,
        /// Schema version of the event payload.
        event_version -> Int4,
        /// When the event occurred.
        occurred_at -> Timestamptz,
        /// Correlation ID for tracing related events.
        correlation_id -> Nullable<Uuid>,
        /// Causation ID identifying the event that caused this one.
        causation_id -> Nullable<Uuid>,
        /// User who caused the event.
        user_id -> Nullable<Uuid>,
        /// Session context the event occurred in.
        session_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Agent session records tracking a single agent's turn-taking span.
    agent_sessions (id) {
        /// Internal agent session identifier.
        id -> Uuid,
        /// Reference to the containing conversation.
        conversation_id -> Uuid,
        /// Agent backend identifier.
        #[max_length = 100]
        agent_backend -> Varchar,
        /// First sequence number in this session.
        start_sequence -> Int8,
        /// Last sequence number (set when the session ends).
        end_sequence -> Nullable<Int8>,
        /// Turn IDs processed in this session as JSONB.
        turn_ids -> Jsonb,
        /// Handoff that initiated this session.
        initiated_by_handoff -> Nullable<Uuid>,
        /// Handoff that terminated this session.
        terminated_by_handoff -> Nullable<Uuid>,
        /// Context snapshots captured during this session as JSONB.
        context_snapshots -> Jsonb,
        /// When the session started.
        started_at -> Timestamptz,
        /// When the session ended.
        ended_at -> Nullable<Timestamptz>,
        /// Session lifecycle state.
        #[max_length = 50]
        state -> Varchar,
    }
}

diesel::table! {
    /// Handoff records transferring control between agent sessions.
    handoffs (id) {
        /// Internal handoff identifier.
        id -> Uuid,
        /// Session being handed off from.
        source_session_id -> Uuid,
        /// Conversation containing the handoff.
        conversation_id -> Uuid,
        /// Session being handed off to.
        target_session_id -> Nullable<Uuid>,
        /// Turn ID that triggered the handoff.
        prior_turn_id -> Uuid,
        /// Tool calls that led to the handoff as JSONB.
        triggering_tool_calls -> Jsonb,
        /// Source agent backend identifier.
        #[max_length = 100]
        source_agent -> Varchar,
        /// Target agent backend identifier.
        #[max_length = 100]
        target_agent -> Varchar,
        /// Reason for the handoff.
        reason -> Nullable<Text>,
        /// When the handoff was initiated.
        initiated_at -> Timestamptz,
        /// When the handoff completed.
        completed_at -> Nullable<Timestamptz>,
        /// Handoff status.
        #[max_length = 50]
        status -> Varchar,
    }
}

diesel::table! {
    /// Context window snapshot records.
    context_snapshots (id) {
        /// Internal snapshot identifier.
        id -> Uuid,
        /// Reference to the containing conversation.
        conversation_id -> Uuid,
        /// Reference to the agent session.
        session_id -> Uuid,
        /// First sequence number in the context window.
        sequence_start -> Int8,
        /// Last sequence number in the context window.
        sequence_end -> Int8,
        /// Message counts by role as JSONB.
        message_summary -> Jsonb,
        /// Tool calls visible in the context window as JSONB.
        visible_tool_calls -> Jsonb,
        /// Token count estimate.
        token_estimate -> Nullable<Int8>,
        /// When the snapshot was captured.
        captured_at -> Timestamptz,
        /// Type of snapshot.
        #[max_length = 50]
        snapshot_type -> Varchar,
    }
}

diesel::joinable!(messages -> conversations (conversation_id));
diesel::joinable!(agent_sessions -> conversations (conversation_id));
diesel::joinable!(handoffs -> conversations (conversation_id));
diesel::joinable!(context_snapshots -> conversations (conversation_id));
diesel::joinable!(context_snapshots -> agent_sessions (session_id));

diesel::allow_tables_to_appear_in_same_query!(
    agent_sessions,
    context_snapshots,
    conversations,
    domain_events,
    handoffs,
    messages,
);
