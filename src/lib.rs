//! Eion: shared-memory and knowledge-graph service for multi-agent AI systems.
//!
//! Multiple autonomous agents write conversational messages into per-session
//! history and read back both the raw history and a temporally-aware
//! knowledge graph of facts derived from it. This crate implements the
//! subsystem that does the hard part — the Knowledge Ingestion and Temporal
//! Resolution Pipeline — plus its immediate collaborators.
//!
//! # Architecture
//!
//! Every subsystem below follows hexagonal layering:
//!
//! - **domain**: pure business types, no infrastructure dependencies
//! - **ports**: trait interfaces the domain needs from storage or external
//!   services
//! - **adapters**: concrete implementations of those ports (`PostgreSQL`,
//!   Neo4j, HTTP, subprocess, or in-memory for tests)
//! - **services**: orchestration that composes ports into a use case
//!
//! # Modules
//!
//! - [`ids`]: identifier newtypes shared across subsystem boundaries
//! - [`vector`]: shared cosine-similarity arithmetic
//! - [`session`]: the per-user conversation scope and its version counter
//! - [`history`]: the relational record of ingested messages
//! - [`graph`]: the property graph of entities, edges, and episodes
//! - [`embedding`]: the deterministic text-to-vector port
//! - [`extraction`]: the out-of-process entity-extraction worker contract
//! - [`temporal`]: pure duplicate-detection, contradiction, and
//!   conflict-resolution logic
//! - [`ingest`]: the orchestration pipeline tying the above together
//! - [`search`]: session-scoped graph fact search
//! - [`directory`]: developer-scope users, agents, agent groups, and
//!   session types
//! - [`audit`]: the append-only agent interaction log and its analytics
//! - [`message`]: the richer multi-part conversation aggregate (handoffs,
//!   context snapshots, schema versioning) retained for callers that need
//!   it beyond the flat ingest record in [`history`]
//! - [`config`]: layered configuration loading
//! - [`logging`]: tracing-subscriber initialisation
//! - [`http`]: the thin developer-scope / agent-scope axum surface
//! - [`worker`]: shell-escaping helpers shared by the `pg_worker` binary

pub mod audit;
pub mod config;
pub mod directory;
pub mod embedding;
pub mod extraction;
pub mod graph;
pub mod history;
pub mod http;
pub mod ids;
pub mod ingest;
pub mod logging;
pub mod message;
pub mod search;
pub mod session;
pub mod temporal;
pub mod vector;
pub mod worker;
