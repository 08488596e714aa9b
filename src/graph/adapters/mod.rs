//! Graph store adapters.

mod memory;
mod neo4j;

pub use memory::InMemoryGraphStore;
pub use neo4j::{Neo4jConfig, Neo4jGraphStore};
