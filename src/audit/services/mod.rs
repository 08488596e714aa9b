//! Application services over the interaction log: analytics and enqueue.

mod analytics;
mod enqueue;

pub use analytics::{collaboration_flows, monitor_agent, monitor_session, AgentActivitySummary, HandoffPattern, SessionActivitySummary};
pub use enqueue::{enqueue_log, ENQUEUE_TIMEOUT};
