//! Repository port for the interaction log.

mod repository;

pub use repository::{
    InteractionLogRepository, InteractionLogRepositoryError, InteractionLogRepositoryResult, DEFAULT_LIMIT,
};
