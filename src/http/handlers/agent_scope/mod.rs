//! Agent-scope (`/sessions/v1/{sessionId}/{memories|knowledge}`) handlers
//! (`spec.md` §6).
//!
//! Every handler starts by calling
//! [`crate::http::auth::authorize_agent_scope`] with the request's method,
//! so the permission-letter check matches the verb actually being served.

pub mod common;
pub mod knowledge;
pub mod memories;
