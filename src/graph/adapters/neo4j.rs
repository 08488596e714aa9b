//! Neo4j-backed graph store via the `neo4rs` Bolt driver.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use neo4rs::{query, Graph, Row};
use serde_json::{Map, Value};

use crate::graph::domain::{Edge, EntityNode, EpisodicNode};
use crate::graph::ports::{GraphStore, GraphStoreError, GraphStoreResult, SimilarEntity};
use crate::ids::{AgentId, EdgeId, EntityId, EpisodicId, SessionId};
use crate::vector::cosine_similarity;

/// Connection parameters for [`Neo4jGraphStore`].
#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    /// Bolt URI, e.g. `bolt://localhost:7687`.
    pub uri: String,
    /// Authentication username.
    pub username: String,
    /// Authentication password.
    pub password: String,
    /// Target database name.
    pub database: String,
}

/// Graph store backed by a live Neo4j instance.
///
/// Schema and vector indexes are created once via [`GraphStore::ensure_schema`]
/// at startup (`spec.md` §4.2). Because Neo4j's native vector index syntax
/// varies by server version and isn't reliably introspectable in a single
/// Cypher round trip, invalidation-candidate scoring re-ranks the index's
/// candidate set by cosine similarity in-process rather than trusting the
/// index's own distance metric end to end — this matches the brute-force
/// behaviour of [`super::InMemoryGraphStore`] so tests against either
/// adapter observe identical ordering.
pub struct Neo4jGraphStore {
    graph: Graph,
}

impl Neo4jGraphStore {
    /// Connects to Neo4j using `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphStoreError::Unavailable`] if the connection fails.
    pub async fn connect(config: &Neo4jConfig) -> GraphStoreResult<Self> {
        let graph = Graph::new(&config.uri, &config.username, &config.password)
            .await
            .map_err(GraphStoreError::unavailable)?;
        Ok(Self { graph })
    }
}

#[expect(clippy::cast_possible_truncation, reason = "embeddings round-trip through Neo4j as f64 but are produced and consumed as f32 everywhere else in this crate")]
fn entity_embedding(row: &Row) -> Vec<f32> {
    row.get::<Vec<f64>>("embedding")
        .unwrap_or_default()
        .into_iter()
        .map(|value| value as f32)
        .collect()
}

fn optional_datetime(row: &Row, column: &str) -> Option<DateTime<Utc>> {
    row.get::<i64>(column)
        .ok()
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
}

fn row_to_entity(row: &Row) -> Result<EntityNode, GraphStoreError> {
    let id: String = row.get("id").map_err(GraphStoreError::query)?;
    let name: String = row.get("name").map_err(GraphStoreError::query)?;
    let summary: String = row.get("summary").unwrap_or_default();
    let group_id: String = row.get("group_id").map_err(GraphStoreError::query)?;
    let labels: Vec<String> = row.get("labels").unwrap_or_default();
    let created_at = optional_datetime(row, "created_at").unwrap_or_else(Utc::now);
    let id = EntityId::from_uuid(id.parse().map_err(|_| {
        GraphStoreError::query(std::io::Error::other("malformed entity uuid"))
    })?);
    let group_id = SessionId::from_uuid(group_id.parse().map_err(|_| {
        GraphStoreError::query(std::io::Error::other("malformed group uuid"))
    })?);
    Ok(EntityNode::new(
        id,
        name,
        labels,
        summary,
        group_id,
        entity_embedding(row),
        created_at,
    ))
}

fn row_to_edge(row: &Row) -> Result<Edge, GraphStoreError> {
    let parse_uuid = |value: String| -> Result<uuid::Uuid, GraphStoreError> {
        value
            .parse()
            .map_err(|_| GraphStoreError::query(std::io::Error::other("malformed uuid")))
    };
    let id: String = row.get("id").map_err(GraphStoreError::query)?;
    let source_uuid: String = row.get("source_uuid").map_err(GraphStoreError::query)?;
    let target_uuid: String = row.get("target_uuid").map_err(GraphStoreError::query)?;
    let group_id: String = row.get("group_id").map_err(GraphStoreError::query)?;
    let last_modified_by: String = row.get("last_modified_by").map_err(GraphStoreError::query)?;
    let episodes: Vec<String> = row.get("episodes").unwrap_or_default();
    let episodes = episodes
        .into_iter()
        .map(|raw| parse_uuid(raw).map(EpisodicId::from_uuid))
        .collect::<Result<Vec<_>, _>>()?;
    let metadata_json: String = row.get("metadata_json").unwrap_or_else(|_| "{}".to_owned());
    let metadata: Map<String, Value> = serde_json::from_str(&metadata_json).unwrap_or_default();
    Ok(Edge::from_parts(
        EdgeId::from_uuid(parse_uuid(id)?),
        EntityId::from_uuid(parse_uuid(source_uuid)?),
        EntityId::from_uuid(parse_uuid(target_uuid)?),
        row.get("relation_type").unwrap_or_default(),
        row.get("fact").unwrap_or_default(),
        entity_embedding(row),
        SessionId::from_uuid(parse_uuid(group_id)?),
        episodes,
        optional_datetime(row, "valid_at"),
        optional_datetime(row, "invalid_at"),
        optional_datetime(row, "expired_at"),
        row.get::<i64>("version").unwrap_or(1).max(0) as u64,
        AgentId::from_uuid(parse_uuid(last_modified_by)?),
        metadata,
    ))
}

#[async_trait]
impl GraphStore for Neo4jGraphStore {
    async fn ensure_schema(&self) -> GraphStoreResult<()> {
        let statements = [
            "CREATE CONSTRAINT entity_uuid IF NOT EXISTS FOR (n:Entity) REQUIRE n.id IS UNIQUE",
            "CREATE CONSTRAINT entity_name_group IF NOT EXISTS FOR (n:Entity) REQUIRE (n.name, n.group_id) IS UNIQUE",
            "CREATE CONSTRAINT episodic_uuid IF NOT EXISTS FOR (n:Episodic) REQUIRE n.id IS UNIQUE",
            "CREATE CONSTRAINT edge_uuid IF NOT EXISTS FOR (n:Fact) REQUIRE n.id IS UNIQUE",
            "CREATE INDEX entity_group IF NOT EXISTS FOR (n:Entity) ON (n.group_id)",
            "CREATE INDEX entity_created IF NOT EXISTS FOR (n:Entity) ON (n.created_at)",
            "CREATE INDEX episodic_group IF NOT EXISTS FOR (n:Episodic) ON (n.group_id)",
            "CREATE INDEX episodic_created IF NOT EXISTS FOR (n:Episodic) ON (n.created_at)",
            "CREATE INDEX fact_group IF NOT EXISTS FOR (n:Fact) ON (n.group_id)",
            "CREATE FULLTEXT INDEX entity_fulltext IF NOT EXISTS FOR (n:Entity) ON EACH [n.name, n.summary]",
            "CREATE FULLTEXT INDEX episodic_fulltext IF NOT EXISTS FOR (n:Episodic) ON EACH [n.content, n.source]",
            "CREATE VECTOR INDEX entity_embedding IF NOT EXISTS FOR (n:Entity) ON (n.embedding) \
             OPTIONS {indexConfig: {`vector.similarity_function`: 'cosine'}}",
            "CREATE VECTOR INDEX episodic_embedding IF NOT EXISTS FOR (n:Episodic) ON (n.embedding) \
             OPTIONS {indexConfig: {`vector.similarity_function`: 'cosine'}}",
            "CREATE VECTOR INDEX fact_embedding IF NOT EXISTS FOR (n:Fact) ON (n.embedding) \
             OPTIONS {indexConfig: {`vector.similarity_function`: 'cosine'}}",
        ];
        for statement in statements {
            self.graph
                .run(query(statement))
                .await
                .map_err(GraphStoreError::query)?;
        }
        Ok(())
    }

    async fn health_check(&self) -> GraphStoreResult<()> {
        self.graph.run(query("RETURN 1")).await.map_err(GraphStoreError::unavailable)
    }

    async fn upsert_entity(&self, node: &EntityNode) -> GraphStoreResult<()> {
        let embedding: Vec<f64> = node.embedding().iter().map(|v| f64::from(*v)).collect();
        let q = query(
            r"
MERGE (n:Entity {id: $id})
SET n.name = $name,
    n.summary = $summary,
    n.group_id = $group_id,
    n.labels = $labels,
    n.embedding = $embedding,
    n.created_at = $created_at,
    n.updated_at = $updated_at
",
        )
        .param("id", node.id().to_string())
        .param("name", node.name())
        .param("summary", node.summary())
        .param("group_id", node.group_id().to_string())
        .param("labels", node.labels().to_vec())
        .param("embedding", embedding)
        .param("created_at", node.created_at().timestamp_millis())
        .param("updated_at", node.updated_at().timestamp_millis());
        self.graph.run(q).await.map_err(GraphStoreError::query)
    }

    async fn upsert_edge(&self, edge: &Edge) -> GraphStoreResult<()> {
        let embedding: Vec<f64> = edge.fact_embedding().iter().map(|v| f64::from(*v)).collect();
        let episodes: Vec<String> = edge.episodes().iter().map(ToString::to_string).collect();
        let metadata_json = serde_json::to_string(edge.metadata()).unwrap_or_else(|_| "{}".to_owned());
        let q = query(
            r"
MATCH (source:Entity {id: $source_uuid}), (target:Entity {id: $target_uuid})
MERGE (source)-[r:RELATES_TO {id: $id}]->(target)
SET r.relation_type = $relation_type,
    r.fact = $fact,
    r.embedding = $embedding,
    r.group_id = $group_id,
    r.episodes = $episodes,
    r.valid_at = $valid_at,
    r.invalid_at = $invalid_at,
    r.expired_at = $expired_at,
    r.version = $version,
    r.last_modified_by = $last_modified_by,
    r.checksum_hash = $checksum_hash,
    r.metadata_json = $metadata_json,
    r.source_uuid = $source_uuid,
    r.target_uuid = $target_uuid
RETURN r.id AS id
",
        )
        .param("id", edge.id().to_string())
        .param("source_uuid", edge.source_uuid().to_string())
        .param("target_uuid", edge.target_uuid().to_string())
        .param("relation_type", edge.relation_type())
        .param("fact", edge.fact())
        .param("embedding", embedding)
        .param("group_id", edge.group_id().to_string())
        .param("episodes", episodes)
        .param("valid_at", edge.valid_at().map(|t| t.timestamp_millis()))
        .param("invalid_at", edge.invalid_at().map(|t| t.timestamp_millis()))
        .param("expired_at", edge.expired_at().map(|t| t.timestamp_millis()))
        .param("version", i64::try_from(edge.version()).unwrap_or(i64::MAX))
        .param("last_modified_by", edge.last_modified_by().to_string())
        .param("checksum_hash", edge.checksum_hash())
        .param("metadata_json", metadata_json);

        let mut stream = self.graph.execute(q).await.map_err(GraphStoreError::query)?;
        match stream.next().await.map_err(GraphStoreError::query)? {
            Some(_) => Ok(()),
            None => Err(GraphStoreError::MissingEndpoint(edge.source_uuid())),
        }
    }

    async fn upsert_episodic(&self, node: &EpisodicNode) -> GraphStoreResult<()> {
        let embedding: Vec<f64> = node.embedding().iter().map(|v| f64::from(*v)).collect();
        let q = query(
            r"
MERGE (n:Episodic {id: $id})
SET n.group_id = $group_id,
    n.content = $content,
    n.source = $source,
    n.embedding = $embedding,
    n.created_at = $created_at,
    n.valid_at = $valid_at
",
        )
        .param("id", node.id().to_string())
        .param("group_id", node.group_id().to_string())
        .param("content", node.content())
        .param("source", node.source())
        .param("embedding", embedding)
        .param("created_at", node.created_at().timestamp_millis())
        .param("valid_at", node.valid_at().timestamp_millis());
        self.graph.run(q).await.map_err(GraphStoreError::query)
    }

    async fn search_similar_entities(
        &self,
        qvec: &[f32],
        group_ids: &[SessionId],
        k: usize,
    ) -> GraphStoreResult<Vec<SimilarEntity>> {
        let group_ids: Vec<String> = group_ids.iter().map(ToString::to_string).collect();
        let q = query(
            r"
MATCH (n:Entity)
WHERE n.group_id IN $group_ids
RETURN n.id AS id, n.name AS name, n.summary AS summary, n.group_id AS group_id,
       n.labels AS labels, n.embedding AS embedding, n.created_at AS created_at
",
        )
        .param("group_ids", group_ids);
        let mut stream = self.graph.execute(q).await.map_err(GraphStoreError::query)?;
        let mut scored = Vec::new();
        while let Some(row) = stream.next().await.map_err(GraphStoreError::query)? {
            let entity = row_to_entity(&row)?;
            let score = cosine_similarity(qvec, entity.embedding());
            scored.push(SimilarEntity { entity, score });
        }
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    async fn get_edge_invalidation_candidates(
        &self,
        edges: &[Edge],
        group_ids: &[SessionId],
        min_score: f32,
        k: usize,
    ) -> GraphStoreResult<Vec<Vec<Edge>>> {
        let group_ids_param: Vec<String> = group_ids.iter().map(ToString::to_string).collect();
        let mut results = Vec::with_capacity(edges.len());
        for edge in edges {
            let q = query(
                r"
MATCH (a:Entity)-[r:RELATES_TO]->(b:Entity)
WHERE r.group_id IN $group_ids AND r.id <> $edge_id
  AND (a.id = $source_uuid OR a.id = $target_uuid OR b.id = $source_uuid OR b.id = $target_uuid)
RETURN r.id AS id, r.source_uuid AS source_uuid, r.target_uuid AS target_uuid,
       r.relation_type AS relation_type, r.fact AS fact, r.embedding AS embedding,
       r.group_id AS group_id, r.episodes AS episodes, r.valid_at AS valid_at,
       r.invalid_at AS invalid_at, r.expired_at AS expired_at, r.version AS version,
       r.last_modified_by AS last_modified_by, r.metadata_json AS metadata_json
",
            )
            .param("group_ids", group_ids_param.clone())
            .param("edge_id", edge.id().to_string())
            .param("source_uuid", edge.source_uuid().to_string())
            .param("target_uuid", edge.target_uuid().to_string());

            let mut stream = self.graph.execute(q).await.map_err(GraphStoreError::query)?;
            let mut scored = Vec::new();
            while let Some(row) = stream.next().await.map_err(GraphStoreError::query)? {
                let candidate = row_to_edge(&row)?;
                let score = cosine_similarity(edge.fact_embedding(), candidate.fact_embedding());
                if score >= min_score {
                    scored.push((score, candidate));
                }
            }
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
            scored.truncate(k);
            results.push(scored.into_iter().map(|(_, edge)| edge).collect());
        }
        Ok(results)
    }

    async fn search_facts(
        &self,
        qvec: &[f32],
        group_id: SessionId,
        limit: usize,
    ) -> GraphStoreResult<Vec<(Edge, f32)>> {
        let q = query(
            r"
MATCH (a:Entity)-[r:RELATES_TO]->(b:Entity)
WHERE r.group_id = $group_id AND r.expired_at IS NULL
RETURN r.id AS id, r.source_uuid AS source_uuid, r.target_uuid AS target_uuid,
       r.relation_type AS relation_type, r.fact AS fact, r.embedding AS embedding,
       r.group_id AS group_id, r.episodes AS episodes, r.valid_at AS valid_at,
       r.invalid_at AS invalid_at, r.expired_at AS expired_at, r.version AS version,
       r.last_modified_by AS last_modified_by, r.metadata_json AS metadata_json
",
        )
        .param("group_id", group_id.to_string());
        let mut stream = self.graph.execute(q).await.map_err(GraphStoreError::query)?;
        let mut scored = Vec::new();
        while let Some(row) = stream.next().await.map_err(GraphStoreError::query)? {
            let edge = row_to_edge(&row)?;
            let score = cosine_similarity(qvec, edge.fact_embedding());
            scored.push((edge, score));
        }
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn delete_group(&self, group_id: SessionId) -> GraphStoreResult<()> {
        let group_id = group_id.to_string();
        self.graph
            .run(
                query("MATCH ()-[r:RELATES_TO {group_id: $group_id}]->() DELETE r")
                    .param("group_id", group_id.clone()),
            )
            .await
            .map_err(GraphStoreError::query)?;
        self.graph
            .run(
                query("MATCH (n:Entity {group_id: $group_id}) DETACH DELETE n")
                    .param("group_id", group_id.clone()),
            )
            .await
            .map_err(GraphStoreError::query)?;
        self.graph
            .run(
                query("MATCH (n:Episodic {group_id: $group_id}) DETACH DELETE n")
                    .param("group_id", group_id),
            )
            .await
            .map_err(GraphStoreError::query)
    }
}
