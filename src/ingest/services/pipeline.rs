//! The Ingest Pipeline orchestration service (`spec.md` §4.1).
//!
//! Generic over every port the algorithm touches, the way
//! `session::services::lifecycle::SessionLifecycleService` is generic over
//! a single repository and a clock; this service simply has more
//! collaborators because the pipeline has more steps.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::Clock;

use crate::audit::domain::AgentInteractionLog;
use crate::audit::ports::InteractionLogRepository;
use crate::audit::services::enqueue_log;
use crate::directory::ports::AgentRepository;
use crate::embedding::ports::Embedder;
use crate::extraction::ports::{ExtractionMessage, ExtractionRequest, Extractor};
use crate::graph::domain::{EntityNode, EpisodicNode};
use crate::graph::ports::GraphStore;
use crate::history::domain::StoredMessage;
use crate::history::ports::HistoryRepository;
use crate::ids::{EpisodicId, SessionId};
use crate::ingest::domain::{validate_request, IngestOutcome, IngestRequest};
use crate::ingest::error::{IngestError, RelationalWriteError};
use crate::message::domain::MessageId;
use crate::session::ports::SessionRepository;
use crate::temporal::{
    detect_duplicate_edge, detect_version_conflict, resolve_content_merge, resolve_edge_contradictions,
    resolve_temporal_ordering, DuplicateDetectionStrategy, ResolvedConflict,
};

/// Cosine-similarity floor for `GetEdgeInvalidationCandidates` (`spec.md` §4.1 step 5).
const INVALIDATION_MIN_SCORE: f32 = 0.7;
/// Fan-out cap for `GetEdgeInvalidationCandidates` (`spec.md` §4.1 step 5).
const INVALIDATION_FANOUT: usize = 10;
/// Cosine-similarity floor for duplicate detection (`spec.md` §4.1 step 5).
const DUPLICATE_THRESHOLD: f32 = 0.85;
/// Bound on prior-episode context sent to the extractor (`spec.md` §4.1 step 3).
const PREVIOUS_EPISODE_WINDOW: usize = 50;

/// Orchestrates one `Ingest(sessionId, agentId, batch)` call end to end.
pub struct IngestPipelineService<SR, HR, GS, EM, EX, AR, AL, C>
where
    SR: SessionRepository,
    HR: HistoryRepository,
    GS: GraphStore,
    EM: Embedder,
    EX: Extractor,
    AR: AgentRepository,
    AL: InteractionLogRepository + 'static,
    C: Clock + Send + Sync,
{
    sessions: Arc<SR>,
    history: Arc<HR>,
    graph: Arc<GS>,
    embedder: Arc<EM>,
    extractor: Arc<EX>,
    agents: Arc<AR>,
    audit: Arc<AL>,
    clock: Arc<C>,
}

impl<SR, HR, GS, EM, EX, AR, AL, C> IngestPipelineService<SR, HR, GS, EM, EX, AR, AL, C>
where
    SR: SessionRepository,
    HR: HistoryRepository,
    GS: GraphStore,
    EM: Embedder,
    EX: Extractor,
    AR: AgentRepository,
    AL: InteractionLogRepository + 'static,
    C: Clock + Send + Sync,
{
    /// Creates a new ingest pipeline wired to the given ports.
    #[must_use]
    #[expect(clippy::too_many_arguments, reason = "the pipeline has one collaborator per port it orchestrates")]
    pub const fn new(
        sessions: Arc<SR>,
        history: Arc<HR>,
        graph: Arc<GS>,
        embedder: Arc<EM>,
        extractor: Arc<EX>,
        agents: Arc<AR>,
        audit: Arc<AL>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            sessions,
            history,
            graph,
            embedder,
            extractor,
            agents,
            audit,
            clock,
        }
    }

    /// Runs the full ingest algorithm (`spec.md` §4.1 steps 1-8).
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] for any of `spec.md` §4.1's named failure
    /// modes. A returned error other than `Validation`, `SessionNotFound`,
    /// or `AgentUnauthorized` may mean the graph store was written but the
    /// relational store was not (`spec.md` §4.1 step 7); no error leaves
    /// the graph store partially written on its own.
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestOutcome, IngestError> {
        validate_request(&request)?;
        let now = self.clock.utc();

        let agent = self
            .agents
            .find_by_id(request.agent_id)
            .await
            .map_err(|_| IngestError::AgentUnauthorized(request.agent_id))?
            .ok_or(IngestError::AgentUnauthorized(request.agent_id))?;
        if !agent.is_active() || !agent.permissions().create {
            return Err(IngestError::AgentUnauthorized(request.agent_id));
        }

        let mut session = self
            .sessions
            .find_by_id(request.session_id)
            .await
            .map_err(|_| IngestError::SessionNotFound(request.session_id))?
            .ok_or(IngestError::SessionNotFound(request.session_id))?;
        if session.is_deleted() {
            return Err(IngestError::SessionNotFound(request.session_id));
        }

        let v_cur = session.version();
        let mut message_metadata: Vec<serde_json::Map<String, serde_json::Value>> =
            request.messages.iter().map(|message| message.metadata.clone()).collect();
        let resolution = self.resolve_conflict(&request, v_cur, &mut message_metadata, now);

        let message_ids: Vec<MessageId> = request.messages.iter().map(|_| MessageId::new()).collect();
        let previous_episodes = self.previous_episodes(request.session_id).await?;

        let extraction_request = ExtractionRequest {
            group_id: request.session_id,
            messages: request
                .messages
                .iter()
                .zip(&message_ids)
                .map(|(message, id)| ExtractionMessage {
                    uuid: EpisodicId::from_uuid(id.into_inner()),
                    role: message.role.clone(),
                    role_type: message.role_type.as_str().to_owned(),
                    content: message.content.clone(),
                })
                .collect(),
            previous_episodes,
            entity_types: Vec::new(),
            use_numa: false,
        };
        let extracted = self.extractor.extract(extraction_request).await?;

        let node_texts: Vec<String> = extracted
            .nodes
            .iter()
            .map(|node| format!("{} {}", node.name, node.summary))
            .collect();
        let edge_texts: Vec<String> = extracted.edges.iter().map(|edge| edge.summary.clone()).collect();
        let message_texts: Vec<String> =
            request.messages.iter().map(|message| message.content.clone()).collect();
        let (node_embeddings, edge_embeddings, message_embeddings) = futures::future::try_join3(
            self.embedder.embed(&node_texts),
            self.embedder.embed(&edge_texts),
            self.embedder.embed(&message_texts),
        )
        .await?;

        let entities: Vec<EntityNode> = extracted
            .nodes
            .iter()
            .zip(node_embeddings)
            .map(|(node, embedding)| {
                EntityNode::new(node.uuid, node.name.clone(), node.labels.clone(), node.summary.clone(), request.session_id, embedding, node.created_at)
            })
            .collect();

        let leading_episode = message_ids.first().map(|id| EpisodicId::from_uuid(id.into_inner()));
        let mut committed_edges = Vec::with_capacity(extracted.edges.len());
        let mut invalidated_by_id: HashMap<_, crate::graph::domain::Edge> = HashMap::new();
        for (extracted_edge, fact_embedding) in extracted.edges.iter().zip(edge_embeddings) {
            let Some(episode) = leading_episode else {
                continue;
            };
            let candidate = crate::graph::domain::Edge::new(crate::graph::domain::NewEdgeParams {
                id: extracted_edge.uuid,
                source_uuid: extracted_edge.source_uuid,
                target_uuid: extracted_edge.target_uuid,
                relation_type: extracted_edge.relation_type.clone(),
                fact: extracted_edge.summary.clone(),
                fact_embedding,
                group_id: request.session_id,
                episode,
                valid_at: Some(now),
                last_modified_by: request.agent_id,
            });

            let invalidation_candidates = self
                .graph
                .get_edge_invalidation_candidates(
                    std::slice::from_ref(&candidate),
                    std::slice::from_ref(&request.session_id),
                    INVALIDATION_MIN_SCORE,
                    INVALIDATION_FANOUT,
                )
                .await?;
            let candidates = invalidation_candidates.into_iter().next().unwrap_or_default();

            let committed = match detect_duplicate_edge(
                &candidate,
                &candidates,
                DuplicateDetectionStrategy::VectorSimilarity { threshold: DUPLICATE_THRESHOLD },
            ) {
                Some(mut duplicate) => {
                    duplicate.merge_duplicate(episode, candidate.id(), request.agent_id);
                    duplicate
                }
                None => candidate,
            };

            for invalidated in resolve_edge_contradictions(&committed, &candidates, now) {
                invalidated_by_id.insert(invalidated.id(), invalidated);
            }
            committed_edges.push(committed);
        }

        let episodes: Vec<EpisodicNode> = request
            .messages
            .iter()
            .zip(&message_ids)
            .zip(&message_embeddings)
            .map(|((message, id), embedding)| {
                EpisodicNode::new(
                    EpisodicId::from_uuid(id.into_inner()),
                    request.session_id,
                    message.content.clone(),
                    "message",
                    embedding.clone(),
                    now,
                    now,
                )
            })
            .collect();

        for entity in &entities {
            self.graph.upsert_entity(entity).await?;
        }
        for edge in committed_edges.iter().chain(invalidated_by_id.values()) {
            self.graph.upsert_edge(edge).await?;
        }
        for episode in &episodes {
            self.graph.upsert_episodic(episode).await?;
        }

        let stored_messages: Vec<StoredMessage> = request
            .messages
            .iter()
            .zip(&message_ids)
            .zip(&message_embeddings)
            .zip(&message_metadata)
            .map(|(((message, id), embedding), metadata)| {
                #[expect(clippy::cast_possible_truncation, reason = "message content is bounded to 50_000 chars by validation")]
                let token_count = message.content.split_whitespace().count() as u32;
                StoredMessage::new(
                    *id,
                    request.session_id,
                    message.role.clone(),
                    message.role_type,
                    message.content.clone(),
                    token_count,
                    metadata.clone(),
                    now,
                )
                .with_embedding(embedding.clone())
            })
            .collect();

        self.history
            .append_batch(&stored_messages)
            .await
            .map_err(|err| IngestError::RelationalWriteFailed(RelationalWriteError::History(err)))?;

        session.record_ingest(&*self.clock);
        self.sessions
            .update(&session)
            .await
            .map_err(|err| IngestError::RelationalWriteFailed(RelationalWriteError::Session(err)))?;

        self.enqueue_audit(&request, session.user_id(), true, None, now);

        Ok(IngestOutcome {
            session_version: session.version(),
            message_ids,
            entities_written: entities.len(),
            edges_committed: committed_edges.len(),
            edges_invalidated: invalidated_by_id.len(),
            resolution,
        })
    }

    fn resolve_conflict(
        &self,
        request: &IngestRequest,
        v_cur: u64,
        message_metadata: &mut [serde_json::Map<String, serde_json::Value>],
        now: chrono::DateTime<chrono::Utc>,
    ) -> Option<ResolvedConflict> {
        let expected = request.expected_version?;
        detect_version_conflict(expected, v_cur, request.session_id)?;
        if let Some(resolved) = resolve_content_merge(request.messages.len(), now) {
            return Some(resolved);
        }
        let conflict_id = uuid::Uuid::new_v4();
        Some(resolve_temporal_ordering(message_metadata, conflict_id, now))
    }

    async fn previous_episodes(&self, session_id: SessionId) -> Result<Vec<EpisodicId>, IngestError> {
        let mut history = self
            .history
            .find_by_session(session_id)
            .await
            .map_err(|err| IngestError::RelationalWriteFailed(RelationalWriteError::History(err)))?;
        history.sort_by_key(StoredMessage::created_at);
        Ok(history
            .iter()
            .rev()
            .take(PREVIOUS_EPISODE_WINDOW)
            .map(|message| EpisodicId::from_uuid(message.id().into_inner()))
            .collect())
    }

    fn enqueue_audit(
        &self,
        request: &IngestRequest,
        user_id: crate::ids::UserId,
        success: bool,
        error_msg: Option<String>,
        now: chrono::DateTime<chrono::Utc>,
    ) {
        let log = AgentInteractionLog::new(
            request.agent_id,
            user_id,
            Some(request.session_id),
            "ingest",
            "/sessions/v1/{sessionId}/memories",
            "POST",
            success,
            error_msg,
            now,
            serde_json::Map::new(),
        );
        enqueue_log(Arc::clone(&self.audit), log);
    }
}
