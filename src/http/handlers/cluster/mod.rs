//! Developer-scope (`/cluster/v1/*`) resource handlers (`spec.md` §6).
//!
//! Every handler in this tree starts by calling
//! [`crate::http::auth::require_developer_auth`]; none of the services it
//! calls into know anything about HTTP.

pub mod agent_groups;
pub mod agents;
pub mod monitoring;
pub mod session_types;
pub mod sessions;
pub mod users;
