//! The knowledge graph: entities, episodes, and bi-temporal facts.
//!
//! Grounded on `message::ports::repository` for the port/adapter split and
//! `message::adapters::memory` for the in-memory adapter shape; the Neo4j
//! client idiom (`neo4rs::{Graph, query}`, explicit transactions) is learned
//! from `examples/other_examples/f6b23b37_Christiantyemele-CoS__src-neo4j-writer.rs.rs`.

pub mod adapters;
pub mod domain;
pub mod ports;
