//! In-memory [`InteractionLogRepository`], grounded on
//! `message::adapters::memory`'s in-memory-for-tests convention.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::audit::domain::AgentInteractionLog;
use crate::audit::ports::{InteractionLogRepository, InteractionLogRepositoryError, InteractionLogRepositoryResult};
use crate::ids::{AgentId, SessionId, UserId};

/// Thread-safe, process-local interaction log. Suitable for tests and for
/// running the service without a database.
#[derive(Debug, Default)]
pub struct InMemoryInteractionLogRepository {
    entries: RwLock<Vec<AgentInteractionLog>>,
}

impl InMemoryInteractionLogRepository {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> InteractionLogRepositoryResult<Vec<AgentInteractionLog>> {
        self.entries
            .read()
            .map(|guard| guard.clone())
            .map_err(|err| InteractionLogRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }
}

fn newest_first_bounded(
    mut entries: Vec<AgentInteractionLog>,
    limit: usize,
) -> Vec<AgentInteractionLog> {
    entries.sort_by_key(|entry| std::cmp::Reverse(entry.timestamp()));
    entries.truncate(limit);
    entries
}

#[async_trait]
impl InteractionLogRepository for InMemoryInteractionLogRepository {
    async fn record(&self, log: AgentInteractionLog) -> InteractionLogRepositoryResult<()> {
        let mut guard = self
            .entries
            .write()
            .map_err(|err| InteractionLogRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        guard.push(log);
        Ok(())
    }

    async fn find_by_agent(
        &self,
        agent_id: AgentId,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<AgentInteractionLog>> {
        let matches = self
            .snapshot()?
            .into_iter()
            .filter(|entry| entry.agent_id() == agent_id)
            .collect();
        Ok(newest_first_bounded(matches, limit))
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<AgentInteractionLog>> {
        let matches = self
            .snapshot()?
            .into_iter()
            .filter(|entry| entry.user_id() == user_id)
            .collect();
        Ok(newest_first_bounded(matches, limit))
    }

    async fn find_by_session(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<AgentInteractionLog>> {
        let matches = self
            .snapshot()?
            .into_iter()
            .filter(|entry| entry.session_id() == Some(session_id))
            .collect();
        Ok(newest_first_bounded(matches, limit))
    }

    async fn find_by_time_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> InteractionLogRepositoryResult<Vec<AgentInteractionLog>> {
        let matches = self
            .snapshot()?
            .into_iter()
            .filter(|entry| entry.timestamp() >= start && entry.timestamp() <= end)
            .collect();
        Ok(newest_first_bounded(matches, limit))
    }
}
