//! Processing task runner
//!
//! A run prepares the processed destination for a stored file, then invokes
//! the configured action. The action's output is reported, not written to the
//! processed file, which stays empty.

use std::sync::Arc;

use tracing::{debug, info};

use super::{ProcessingError, ProcessingOutcome, StoredFile};
use crate::ports::{ProcessingAction, StorageWriter};

pub struct ProcessingRunner<S, A> {
    storage: Arc<S>,
    action: A,
}

impl<S, A> ProcessingRunner<S, A>
where
    S: StorageWriter,
    A: ProcessingAction,
{
    pub fn new(storage: Arc<S>, action: A) -> Self {
        Self { storage, action }
    }

    /// Process one stored file
    ///
    /// The action is not invoked if the processed destination cannot be
    /// prepared.
    pub async fn run(&self, stored: &StoredFile) -> Result<ProcessingOutcome, ProcessingError> {
        let output_path = self.storage.prepare_output(stored).await?;
        debug!(
            output = %output_path.display(),
            "Processed file created, invoking action"
        );

        let command = self.action.invoke(&stored.file_id).await?;
        info!(
            program = %command.program,
            output = %command.output.trim_end(),
            "Command output"
        );

        Ok(ProcessingOutcome {
            output_path,
            command,
        })
    }

    pub fn action(&self) -> &A {
        &self.action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::FileId;
    use crate::testing::{FakeAction, InMemoryStorage};

    async fn stored(storage: &InMemoryStorage, name: &str) -> StoredFile {
        storage
            .store(&FileId::new(name).unwrap(), &b"0123456789"[..])
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_creates_output_then_invokes_action() {
        let storage = Arc::new(InMemoryStorage::new());
        let runner = ProcessingRunner::new(Arc::clone(&storage), FakeAction::succeeding());

        let file = stored(&storage, "report.txt").await;
        let outcome = runner.run(&file).await.unwrap();

        assert_eq!(outcome.output_path.to_str(), Some("processed/report.txt"));
        assert!(storage.has_output("report.txt"));
        assert_eq!(runner.action().invocations(), vec!["report.txt".to_string()]);
        assert!(outcome.command.output.contains("report.txt"));
    }

    #[tokio::test]
    async fn test_output_failure_skips_action() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.fail_outputs();
        let runner = ProcessingRunner::new(Arc::clone(&storage), FakeAction::succeeding());

        let file = stored(&storage, "report.txt").await;
        let err = runner.run(&file).await.unwrap_err();

        assert!(matches!(err, ProcessingError::Output(_)));
        assert!(runner.action().invocations().is_empty());
    }

    #[tokio::test]
    async fn test_action_failure_is_returned() {
        let storage = Arc::new(InMemoryStorage::new());
        let runner = ProcessingRunner::new(Arc::clone(&storage), FakeAction::failing());

        let file = stored(&storage, "report.txt").await;
        let err = runner.run(&file).await.unwrap_err();

        assert!(matches!(err, ProcessingError::NonZeroExit { .. }));
        // The destination exists even though the action failed
        assert!(storage.has_output("report.txt"));
    }
}
