//! Application services for the session subsystem.

mod lifecycle;

pub use lifecycle::{SessionLifecycleError, SessionLifecycleService};
