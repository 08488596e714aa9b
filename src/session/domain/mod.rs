//! Domain types for the session subsystem.

mod error;
mod session;

pub use error::SessionDomainError;
pub use session::{PersistedSessionData, Session};
