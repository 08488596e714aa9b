//! In-memory implementation of [`HistoryRepository`], grounded on
//! `message::adapters::memory::InMemoryMessageRepository`'s shape.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::history::domain::StoredMessage;
use crate::history::ports::{HistoryRepository, HistoryRepositoryError, HistoryRepositoryResult};
use crate::ids::SessionId;
use crate::message::domain::MessageId;

/// Thread-safe, process-local [`HistoryRepository`]. Suitable for tests and
/// for running the service without a database.
#[derive(Debug, Default)]
pub struct InMemoryHistoryRepository {
    messages: RwLock<HashMap<MessageId, StoredMessage>>,
}

impl InMemoryHistoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn append_batch(&self, messages: &[StoredMessage]) -> HistoryRepositoryResult<()> {
        let mut guard = self
            .messages
            .write()
            .map_err(|err| HistoryRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        for message in messages {
            if guard.contains_key(&message.id()) {
                return Err(HistoryRepositoryError::Duplicate(message.id()));
            }
        }
        for message in messages {
            guard.insert(message.id(), message.clone());
        }
        Ok(())
    }

    async fn find_by_session(
        &self,
        session_id: SessionId,
    ) -> HistoryRepositoryResult<Vec<StoredMessage>> {
        let guard = self
            .messages
            .read()
            .map_err(|err| HistoryRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        let mut found: Vec<StoredMessage> = guard
            .values()
            .filter(|message| message.session_id() == session_id && !message.is_deleted())
            .cloned()
            .collect();
        found.sort_by_key(StoredMessage::created_at);
        Ok(found)
    }

    async fn find_by_id(&self, id: MessageId) -> HistoryRepositoryResult<Option<StoredMessage>> {
        let guard = self
            .messages
            .read()
            .map_err(|err| HistoryRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(guard.get(&id).cloned())
    }

    async fn health_check(&self) -> HistoryRepositoryResult<()> {
        Ok(())
    }

    async fn delete_by_session(
        &self,
        session_id: SessionId,
        now: chrono::DateTime<chrono::Utc>,
    ) -> HistoryRepositoryResult<()> {
        let mut guard = self
            .messages
            .write()
            .map_err(|err| HistoryRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        for message in guard.values_mut() {
            if message.session_id() == session_id && !message.is_deleted() {
                *message = StoredMessage::from_persisted(
                    message.id(),
                    message.session_id(),
                    message.role(),
                    message.role_type(),
                    message.content(),
                    message.token_count(),
                    message.embedding().map(<[f32]>::to_vec),
                    message.metadata().clone(),
                    message.created_at(),
                    Some(now),
                );
            }
        }
        Ok(())
    }
}
