//! Port definitions for the graph store.

mod store;

pub use store::{GraphStore, GraphStoreError, GraphStoreResult, SimilarEntity};
