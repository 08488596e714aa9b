//! History repository adapters.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryHistoryRepository;
pub use postgres::PostgresHistoryRepository;
