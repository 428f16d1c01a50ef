//! Ingestion service - pipeline orchestration
//!
//! The service drives one upload through the pipeline:
//!
//! 1. Store the stream (synchronous for the caller)
//! 2. Publish `processing` in the status registry
//! 3. Hand a receipt back to the caller
//! 4. Run the processing step on the pool and publish the terminal status
//!
//! Failures before step 2 are returned to the caller and leave no registry
//! entry. Failures after it are logged and recorded as `error`.

use std::sync::Arc;

use chrono::Utc;
use tokio::io::AsyncRead;
use tracing::{error, info, info_span, warn, Instrument};

use super::pool::{ProcessingPool, DEFAULT_MAX_CONCURRENT_TASKS};
use super::runner::ProcessingRunner;
use super::{FileId, Result, RunId, UploadReceipt};
use crate::ports::{ProcessingAction, StorageWriter};
use crate::status::{FileStatus, StatusEntry, StatusRegistry};

/// Configuration for the ingestion service
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Maximum number of processing runs executing at once (default: 32)
    pub max_concurrent_tasks: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: DEFAULT_MAX_CONCURRENT_TASKS,
        }
    }
}

/// Service orchestrating storage, status tracking and processing
///
/// The service is generic over its storage and action adapters (static
/// dispatch). The status registry is injected so that it can be shared with
/// other readers, such as a status endpoint.
pub struct IngestionService<S, A> {
    storage: Arc<S>,
    runner: Arc<ProcessingRunner<S, A>>,
    registry: Arc<StatusRegistry>,
    pool: ProcessingPool,
}

impl<S, A> IngestionService<S, A>
where
    S: StorageWriter + 'static,
    A: ProcessingAction + 'static,
{
    /// Create a new IngestionService
    pub fn new(
        storage: S,
        action: A,
        registry: Arc<StatusRegistry>,
        config: IngestionConfig,
    ) -> Self {
        let storage = Arc::new(storage);
        Self {
            runner: Arc::new(ProcessingRunner::new(Arc::clone(&storage), action)),
            storage,
            registry,
            pool: ProcessingPool::new(config.max_concurrent_tasks),
        }
    }

    /// Create a new IngestionService with its own registry and default configuration
    pub fn with_adapters(storage: S, action: A) -> Self {
        Self::new(
            storage,
            action,
            Arc::new(StatusRegistry::new()),
            IngestionConfig::default(),
        )
    }

    /// Accept an upload
    ///
    /// Returns once the stream is stored and `processing` is visible in the
    /// registry. Processing continues in the background; its outcome is only
    /// observable through the registry.
    ///
    /// # Errors
    ///
    /// Returns `IngestionError::Storage` if the file cannot be stored. No
    /// registry entry is created in that case.
    pub async fn ingest<R>(
        &self,
        file_id: FileId,
        reader: R,
    ) -> Result<UploadReceipt>
    where
        R: AsyncRead + Unpin + Send,
    {
        let stored = match self.storage.store(&file_id, reader).await {
            Ok(stored) => stored,
            Err(err) => {
                error!(file_id = %file_id, error = %err, "Failed to store upload");
                return Err(err.into());
            }
        };

        let run_id = RunId::new();
        info!(
            file_id = %file_id,
            run_id = %run_id,
            size = stored.size_bytes,
            mime = %stored.mime_type,
            "Upload stored"
        );

        // Must be visible before the caller hears about the acceptance
        self.registry.set(&file_id, FileStatus::Processing);

        let receipt = UploadReceipt {
            file_id: file_id.clone(),
            run_id,
            size_bytes: stored.size_bytes,
            mime_type: stored.mime_type.clone(),
            status: FileStatus::Processing,
            accepted_at: Utc::now(),
        };

        let runner = Arc::clone(&self.runner);
        let registry = Arc::clone(&self.registry);
        let span = info_span!("processing", file_id = %file_id, run_id = %run_id);

        self.pool.spawn(
            async move {
                let status = match runner.run(&stored).await {
                    Ok(outcome) => {
                        info!(
                            output = %outcome.output_path.display(),
                            "Processing completed"
                        );
                        FileStatus::Completed
                    }
                    Err(err) => {
                        warn!(error = %err, "Processing failed");
                        FileStatus::Error
                    }
                };
                registry.set(&stored.file_id, status);
            }
            .instrument(span),
        );

        Ok(receipt)
    }

    /// Current status entry for a file
    pub fn status(&self, file_id: &FileId) -> Option<StatusEntry> {
        self.registry.get(file_id)
    }

    /// Storage adapter the service writes through
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Shared status registry
    pub fn registry(&self) -> &Arc<StatusRegistry> {
        &self.registry
    }

    /// Processing runs spawned and not yet finished
    pub fn in_flight(&self) -> usize {
        self.pool.in_flight()
    }

    /// Wait for every processing run spawned so far
    pub async fn drain(&self) {
        self.pool.drain().await;
    }
}
