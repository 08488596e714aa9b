//! Repository ports for the directory subsystem.

pub mod repository;

pub use repository::{
    AgentGroupRepository, AgentRepository, DirectoryError, DirectoryResult, SessionTypeRepository,
    UserRepository,
};
