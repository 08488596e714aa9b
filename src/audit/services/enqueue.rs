//! Fire-and-forget audit enqueue (`spec.md` §4.5, §5).
//!
//! Writes happen on a background task bounded by a 5 s timeout; a failure
//! is logged but never propagated to the caller that triggered it.

use std::sync::Arc;
use std::time::Duration;

use crate::audit::domain::AgentInteractionLog;
use crate::audit::ports::InteractionLogRepository;

/// The bound `spec.md` §4.5 places on the background audit write.
pub const ENQUEUE_TIMEOUT: Duration = Duration::from_secs(5);

/// Spawns a detached task that writes `log` to `repository`, bounded by
/// [`ENQUEUE_TIMEOUT`]. Never returns an error to the caller; a timeout or
/// a repository failure is logged and otherwise ignored.
pub fn enqueue_log<R>(repository: Arc<R>, log: AgentInteractionLog)
where
    R: InteractionLogRepository + 'static,
{
    tokio::spawn(async move {
        match tokio::time::timeout(ENQUEUE_TIMEOUT, repository.record(log)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "interaction log write failed");
            }
            Err(_) => {
                tracing::warn!("interaction log write timed out after {:?}", ENQUEUE_TIMEOUT);
            }
        }
    });
}
