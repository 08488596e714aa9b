//! Repository port for the stored-message history.

mod repository;

pub use repository::{HistoryRepository, HistoryRepositoryError, HistoryRepositoryResult};
