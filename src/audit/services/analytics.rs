//! In-memory analytics over interaction log entries (`spec.md` §4.5).
//!
//! Grounded on `message::domain::handoff`'s handoff-tracking conventions:
//! where that module records a single handoff's provenance inline on a
//! message, this module derives handoff-like transitions after the fact by
//! scanning a session's interaction log for consecutive entries with
//! distinct `agent_id`s.

use std::collections::HashMap;

use serde::Serialize;

use crate::audit::domain::AgentInteractionLog;
use crate::ids::{AgentId, SessionId};

/// Aggregate statistics for one agent's interactions (`MonitorAgent`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentActivitySummary {
    /// The agent these statistics describe.
    pub agent_id: AgentId,
    /// Total number of interactions observed.
    pub total_operations: usize,
    /// Fraction of interactions with `success = true`, in `[0.0, 1.0]`.
    /// `0.0` when there are no interactions, never `NaN`.
    pub success_rate: f64,
    /// Count of interactions per `operation` label.
    pub operation_breakdown: HashMap<String, usize>,
}

/// Aggregate statistics for one session's interactions (`MonitorSession`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionActivitySummary {
    /// The session these statistics describe.
    pub session_id: SessionId,
    /// Total number of interactions observed.
    pub total_operations: usize,
    /// Distinct agents that interacted with the session, in first-seen order.
    pub participating_agents: Vec<AgentId>,
    /// Count of interactions per `operation` label.
    pub operation_breakdown: HashMap<String, usize>,
}

/// A sequential transition between two distinct agents acting on the same
/// session, in consecutive log order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandoffPattern {
    /// The agent that acted first.
    pub from_agent: AgentId,
    /// The agent that acted next.
    pub to_agent: AgentId,
}

/// Computes `spec.md` §4.5's `MonitorAgent`: success rate and operation
/// breakdown for one agent's entries.
#[must_use]
pub fn monitor_agent(agent_id: AgentId, logs: &[AgentInteractionLog]) -> AgentActivitySummary {
    let matching: Vec<&AgentInteractionLog> =
        logs.iter().filter(|entry| entry.agent_id() == agent_id).collect();
    let total_operations = matching.len();
    let successes = matching.iter().filter(|entry| entry.success()).count();
    let success_rate = if total_operations == 0 {
        0.0
    } else {
        #[expect(clippy::cast_precision_loss, reason = "operation counts fit comfortably in f64's mantissa")]
        #[expect(clippy::float_arithmetic, reason = "success rate is a ratio reported as a score, not an integer quantity")]
        {
            successes as f64 / total_operations as f64
        }
    };
    AgentActivitySummary {
        agent_id,
        total_operations,
        success_rate,
        operation_breakdown: operation_breakdown(&matching),
    }
}

/// Computes `spec.md` §4.5's `MonitorSession`: operation breakdown and
/// participating-agent set for one session's entries, ordered by earliest
/// appearance in `logs`.
#[must_use]
pub fn monitor_session(session_id: SessionId, logs: &[AgentInteractionLog]) -> SessionActivitySummary {
    let matching: Vec<&AgentInteractionLog> = logs
        .iter()
        .filter(|entry| entry.session_id() == Some(session_id))
        .collect();
    let mut participating_agents = Vec::new();
    for entry in &matching {
        if !participating_agents.contains(&entry.agent_id()) {
            participating_agents.push(entry.agent_id());
        }
    }
    SessionActivitySummary {
        session_id,
        total_operations: matching.len(),
        participating_agents,
        operation_breakdown: operation_breakdown(&matching),
    }
}

/// Derives collaboration flows for a session: the ordered sequence of
/// [`HandoffPattern`]s between consecutive entries (sorted by timestamp)
/// whose `agent_id` differs from its predecessor.
#[must_use]
pub fn collaboration_flows(session_id: SessionId, logs: &[AgentInteractionLog]) -> Vec<HandoffPattern> {
    let mut matching: Vec<&AgentInteractionLog> = logs
        .iter()
        .filter(|entry| entry.session_id() == Some(session_id))
        .collect();
    matching.sort_by_key(|entry| entry.timestamp());
    matching
        .windows(2)
        .filter_map(|pair| {
            let [a, b] = pair else { return None };
            (a.agent_id() != b.agent_id()).then(|| HandoffPattern {
                from_agent: a.agent_id(),
                to_agent: b.agent_id(),
            })
        })
        .collect()
}

fn operation_breakdown(entries: &[&AgentInteractionLog]) -> HashMap<String, usize> {
    let mut breakdown = HashMap::new();
    for entry in entries {
        *breakdown.entry(entry.operation().to_owned()).or_insert(0) += 1;
    }
    breakdown
}
