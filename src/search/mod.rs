//! Session-scoped fact search (`spec.md` §4.4).
//!
//! Grounded on [`crate::ingest::services::pipeline::IngestPipelineService`]'s
//! generic `Service<R, C>` shape, reduced to the single port this operation
//! actually needs: [`crate::graph::ports::GraphStore`].

mod service;

pub use service::{Fact, SearchError, SearchResult, SearchService};
