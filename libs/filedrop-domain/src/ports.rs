//! Ports (trait definitions) for external dependencies
//!
//! The domain defines what it needs from the outside world; adapter crates
//! provide the implementations. Two capabilities are required by the pipeline:
//!
//! - [`StorageWriter`]: durable storage for uploads and processed files
//! - [`ProcessingAction`]: the post-processing command run for each upload
//!
//! ## Static Dispatch
//!
//! Both traits use `impl Future` return types instead of `async_trait`, so the
//! orchestrator is monomorphized over its adapters with no boxing.

use std::future::Future;
use std::path::PathBuf;

use tokio::io::AsyncRead;

use crate::ingestion::{CommandResult, FileId, ProcessingError, StorageError, StoredFile};

/// Port for storage operations
///
/// Implementations own two flat roots: one for uploaded files and one for
/// processed files. Both are keyed by [`FileId`].
pub trait StorageWriter: Send + Sync {
    /// Copy `reader` to the upload destination for `file_id`
    ///
    /// The whole stream must be written (or the write must fail) before the
    /// returned future resolves. The first bytes of the stream are used to
    /// sniff a MIME type; sniffing never fails the write.
    ///
    /// # Errors
    ///
    /// - `StorageError::Create` if the destination cannot be created
    /// - `StorageError::Copy` if reading the stream or writing the file fails
    fn store<R>(
        &self,
        file_id: &FileId,
        reader: R,
    ) -> impl Future<Output = Result<StoredFile, StorageError>> + Send
    where
        R: AsyncRead + Unpin + Send;

    /// Create (or truncate) the processed destination for a stored file
    ///
    /// The stored copy is reopened first so a vanished upload is reported
    /// before anything is created.
    ///
    /// # Errors
    ///
    /// - `StorageError::SourceOpen` if the stored copy cannot be opened
    /// - `StorageError::OutputCreate` if the processed file cannot be created
    fn prepare_output(
        &self,
        stored: &StoredFile,
    ) -> impl Future<Output = Result<PathBuf, StorageError>> + Send;
}

/// Port for the post-processing step
///
/// An action is selected once, when configuration is loaded, and then invoked
/// for every accepted upload.
pub trait ProcessingAction: Send + Sync {
    /// Run the action for `file_id`
    ///
    /// # Errors
    ///
    /// - `ProcessingError::MissingExecutable` if the action is not configured
    /// - `ProcessingError::Launch` if the command cannot be started
    /// - `ProcessingError::NonZeroExit` if the command reports failure
    fn invoke(
        &self,
        file_id: &FileId,
    ) -> impl Future<Output = Result<CommandResult, ProcessingError>> + Send;
}
