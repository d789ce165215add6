//! Irreversible commit of a resolved deferred action

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::error::CommitError;
use super::types::{ActionId, ItemId};
use crate::remote::RemoteService;

/// Proof of a successful commit
#[derive(Debug, Clone)]
pub struct CommitReceipt {
    pub action_id: ActionId,
    pub count: usize,
    pub committed_at: DateTime<Utc>,
}

/// Performs the single external delete call for an action.
///
/// No retries happen here; a failure is reported once and the caller decides
/// what to do with it.
#[derive(Clone)]
pub struct ActionExecutor {
    remote: Arc<dyn RemoteService>,
}

impl ActionExecutor {
    pub fn new(remote: Arc<dyn RemoteService>) -> Self {
        Self { remote }
    }

    pub async fn commit(
        &self,
        action_id: ActionId,
        target_ids: &[ItemId],
    ) -> Result<CommitReceipt, CommitError> {
        tracing::info!(%action_id, count = target_ids.len(), "Committing deferred action");

        match self.remote.delete_emails(target_ids).await {
            Ok(()) => Ok(CommitReceipt {
                action_id,
                count: target_ids.len(),
                committed_at: Utc::now(),
            }),
            Err(e) => {
                tracing::warn!(%action_id, "Commit failed: {:#}", e);
                Err(CommitError::new(format!("{:#}", e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::mock::MockRemote;

    #[tokio::test]
    async fn test_commit_calls_remote_once_with_targets() {
        let remote = Arc::new(MockRemote::new());
        let executor = ActionExecutor::new(remote.clone());
        let targets = vec![ItemId::from("a"), ItemId::from("b")];

        let receipt = executor.commit(ActionId(7), &targets).await.unwrap();

        assert_eq!(receipt.action_id, ActionId(7));
        assert_eq!(receipt.count, 2);
        assert_eq!(remote.delete_calls(), vec![targets]);
    }

    #[tokio::test]
    async fn test_commit_failure_carries_reason() {
        let remote = Arc::new(MockRemote::new());
        remote.fail_deletes("API error (500): upstream down");
        let executor = ActionExecutor::new(remote.clone());

        let err = executor
            .commit(ActionId(1), &[ItemId::from("a")])
            .await
            .unwrap_err();

        assert_eq!(err.reason, "API error (500): upstream down");
        assert_eq!(remote.delete_calls().len(), 1);
    }
}
