//! The dynamic-dispatch composition root: every port the HTTP surface
//! touches, type-erased behind `Arc<dyn Trait>` so [`AppState`] names one
//! concrete type regardless of which adapters `eion-server` wires in.
//!
//! Grounded on the teacher pack's `Arc<dyn Trait>` host-context idiom
//! (an `astrid-gateway` inbound router holds `Arc<dyn IdentityStore>`,
//! `Arc<dyn KvStore>`, and similar type-erased collaborators rather than
//! threading adapter generics through the server's entry point).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::DefaultClock;

use crate::audit::ports::{
    InteractionLogRepository, InteractionLogRepositoryResult,
};
use crate::config::AuthConfig;
use crate::directory::domain::{Agent, AgentGroup, SessionType, User};
use crate::directory::ports::{
    AgentGroupRepository, AgentRepository, DirectoryResult, SessionTypeRepository, UserRepository,
};
use crate::embedding::ports::{Embedder, EmbedderResult};
use crate::extraction::ports::{Extractor, ExtractionRequest, ExtractionResult, ExtractorResult};
use crate::graph::domain::{Edge, EntityNode, EpisodicNode};
use crate::graph::ports::{GraphStore, GraphStoreResult, SimilarEntity};
use crate::history::domain::StoredMessage;
use crate::history::ports::{HistoryRepository, HistoryRepositoryResult};
use crate::ids::{AgentGroupId, AgentId, SessionId, SessionTypeId, UserId};
use crate::ingest::services::IngestPipelineService;
use crate::message::domain::MessageId;
use crate::search::SearchService;
use crate::session::domain::Session;
use crate::session::ports::{SessionRepository, SessionRepositoryResult};
use crate::session::services::SessionLifecycleService;

#[async_trait]
impl SessionRepository for Arc<dyn SessionRepository> {
    async fn store(&self, session: &Session) -> SessionRepositoryResult<()> {
        (**self).store(session).await
    }

    async fn update(&self, session: &Session) -> SessionRepositoryResult<()> {
        (**self).update(session).await
    }

    async fn find_by_id(&self, id: SessionId) -> SessionRepositoryResult<Option<Session>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_user(&self, user_id: UserId) -> SessionRepositoryResult<Vec<Session>> {
        (**self).find_by_user(user_id).await
    }

    async fn list_all(&self) -> SessionRepositoryResult<Vec<Session>> {
        (**self).list_all().await
    }
}

#[async_trait]
impl HistoryRepository for Arc<dyn HistoryRepository> {
    async fn append_batch(&self, messages: &[StoredMessage]) -> HistoryRepositoryResult<()> {
        (**self).append_batch(messages).await
    }

    async fn find_by_session(&self, session_id: SessionId) -> HistoryRepositoryResult<Vec<StoredMessage>> {
        (**self).find_by_session(session_id).await
    }

    async fn find_by_id(&self, id: MessageId) -> HistoryRepositoryResult<Option<StoredMessage>> {
        (**self).find_by_id(id).await
    }

    async fn health_check(&self) -> HistoryRepositoryResult<()> {
        (**self).health_check().await
    }

    async fn delete_by_session(
        &self,
        session_id: SessionId,
        now: chrono::DateTime<chrono::Utc>,
    ) -> HistoryRepositoryResult<()> {
        (**self).delete_by_session(session_id, now).await
    }
}

#[async_trait]
impl GraphStore for Arc<dyn GraphStore> {
    async fn ensure_schema(&self) -> GraphStoreResult<()> {
        (**self).ensure_schema().await
    }

    async fn health_check(&self) -> GraphStoreResult<()> {
        (**self).health_check().await
    }

    async fn upsert_entity(&self, node: &EntityNode) -> GraphStoreResult<()> {
        (**self).upsert_entity(node).await
    }

    async fn upsert_edge(&self, edge: &Edge) -> GraphStoreResult<()> {
        (**self).upsert_edge(edge).await
    }

    async fn upsert_episodic(&self, node: &EpisodicNode) -> GraphStoreResult<()> {
        (**self).upsert_episodic(node).await
    }

    async fn search_similar_entities(
        &self,
        qvec: &[f32],
        group_ids: &[SessionId],
        k: usize,
    ) -> GraphStoreResult<Vec<SimilarEntity>> {
        (**self).search_similar_entities(qvec, group_ids, k).await
    }

    async fn get_edge_invalidation_candidates(
        &self,
        edges: &[Edge],
        group_ids: &[SessionId],
        min_score: f32,
        k: usize,
    ) -> GraphStoreResult<Vec<Vec<Edge>>> {
        (**self).get_edge_invalidation_candidates(edges, group_ids, min_score, k).await
    }

    async fn search_facts(
        &self,
        qvec: &[f32],
        group_id: SessionId,
        limit: usize,
    ) -> GraphStoreResult<Vec<(Edge, f32)>> {
        (**self).search_facts(qvec, group_id, limit).await
    }

    async fn delete_group(&self, group_id: SessionId) -> GraphStoreResult<()> {
        (**self).delete_group(group_id).await
    }
}

#[async_trait]
impl Embedder for Arc<dyn Embedder> {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    async fn embed(&self, texts: &[String]) -> EmbedderResult<Vec<Vec<f32>>> {
        (**self).embed(texts).await
    }
}

#[async_trait]
impl Extractor for Arc<dyn Extractor> {
    async fn extract(&self, request: ExtractionRequest) -> ExtractorResult<ExtractionResult> {
        (**self).extract(request).await
    }
}

#[async_trait]
impl AgentRepository for Arc<dyn AgentRepository> {
    async fn store(&self, agent: &Agent) -> DirectoryResult<()> {
        (**self).store(agent).await
    }

    async fn update(&self, agent: &Agent) -> DirectoryResult<()> {
        (**self).update(agent).await
    }

    async fn find_by_id(&self, id: AgentId) -> DirectoryResult<Option<Agent>> {
        (**self).find_by_id(id).await
    }

    async fn list_all(&self) -> DirectoryResult<Vec<Agent>> {
        (**self).list_all().await
    }
}

#[async_trait]
impl UserRepository for Arc<dyn UserRepository> {
    async fn store(&self, user: &User) -> DirectoryResult<()> {
        (**self).store(user).await
    }

    async fn update(&self, user: &User) -> DirectoryResult<()> {
        (**self).update(user).await
    }

    async fn find_by_id(&self, id: UserId) -> DirectoryResult<Option<User>> {
        (**self).find_by_id(id).await
    }

    async fn list_all(&self) -> DirectoryResult<Vec<User>> {
        (**self).list_all().await
    }
}

#[async_trait]
impl AgentGroupRepository for Arc<dyn AgentGroupRepository> {
    async fn store(&self, group: &AgentGroup) -> DirectoryResult<()> {
        (**self).store(group).await
    }

    async fn update(&self, group: &AgentGroup) -> DirectoryResult<()> {
        (**self).update(group).await
    }

    async fn find_by_id(&self, id: AgentGroupId) -> DirectoryResult<Option<AgentGroup>> {
        (**self).find_by_id(id).await
    }

    async fn list_all(&self) -> DirectoryResult<Vec<AgentGroup>> {
        (**self).list_all().await
    }

    async fn delete(&self, id: AgentGroupId) -> DirectoryResult<()> {
        (**self).delete(id).await
    }
}

#[async_trait]
impl SessionTypeRepository for Arc<dyn SessionTypeRepository> {
    async fn store(&self, session_type: &SessionType) -> DirectoryResult<()> {
        (**self).store(session_type).await
    }

    async fn update(&self, session_type: &SessionType) -> DirectoryResult<()> {
        (**self).update(session_type).await
    }

    async fn find_by_id(&self, id: SessionTypeId) -> DirectoryResult<Option<SessionType>> {
        (**self).find_by_id(id).await
    }

    async fn list_all(&self) -> DirectoryResult<Vec<SessionType>> {
        (**self).list_all().await
    }

    async fn delete(&self, id: SessionTypeId) -> DirectoryResult<()> {
        (**self).delete(id).await
    }
}

#[async_trait]
impl InteractionLogRepository for Arc<dyn InteractionLogRepository> {
    async fn record(&self, log: crate::audit::domain::AgentInteractionLog) -> InteractionLogRepositoryResult<()> {
        (**self).record(log).await
    }

    async fn find_by_agent(
        &self,
        agent_id: AgentId,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<crate::audit::domain::AgentInteractionLog>> {
        (**self).find_by_agent(agent_id, limit).await
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<crate::audit::domain::AgentInteractionLog>> {
        (**self).find_by_user(user_id, limit).await
    }

    async fn find_by_session(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<crate::audit::domain::AgentInteractionLog>> {
        (**self).find_by_session(session_id, limit).await
    }

    async fn find_by_time_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<crate::audit::domain::AgentInteractionLog>> {
        (**self).find_by_time_range(start, end, limit).await
    }
}

/// The ingest pipeline, specialised to type-erased ports.
pub type DynIngestPipeline = IngestPipelineService<
    Arc<dyn SessionRepository>,
    Arc<dyn HistoryRepository>,
    Arc<dyn GraphStore>,
    Arc<dyn Embedder>,
    Arc<dyn Extractor>,
    Arc<dyn AgentRepository>,
    Arc<dyn InteractionLogRepository>,
    DefaultClock,
>;

/// The search service, specialised to type-erased ports.
pub type DynSearchService = SearchService<Arc<dyn GraphStore>, Arc<dyn Embedder>>;

/// The session lifecycle service, specialised to type-erased ports.
pub type DynSessionLifecycle = SessionLifecycleService<Arc<dyn SessionRepository>, DefaultClock>;

/// Everything an HTTP handler needs: the orchestration services plus the
/// directory and audit repositories the developer-scope surface manages
/// directly.
#[derive(Clone)]
pub struct AppState {
    /// The ingest pipeline (`POST .../memories`, `POST`/`PUT .../knowledge`).
    pub ingest: Arc<DynIngestPipeline>,
    /// Session-scoped fact search.
    pub search: Arc<DynSearchService>,
    /// Session creation, rename, soft-deletion.
    pub session_lifecycle: Arc<DynSessionLifecycle>,
    /// Raw session repository, for the developer-scope list/get endpoints
    /// the lifecycle service does not itself expose.
    pub sessions: Arc<dyn SessionRepository>,
    /// Ingested-message history, for `GET .../memories`.
    pub history: Arc<dyn HistoryRepository>,
    /// The knowledge graph, for `DELETE .../knowledge` and health checks.
    pub graph: Arc<dyn GraphStore>,
    /// Developer-managed users.
    pub users: Arc<dyn UserRepository>,
    /// Registered agents.
    pub agents: Arc<dyn AgentRepository>,
    /// Agent groups.
    pub agent_groups: Arc<dyn AgentGroupRepository>,
    /// Session types.
    pub session_types: Arc<dyn SessionTypeRepository>,
    /// The append-only interaction log, for monitoring endpoints.
    pub audit: Arc<dyn InteractionLogRepository>,
    /// Developer-scope authentication settings.
    pub auth: AuthConfig,
}
