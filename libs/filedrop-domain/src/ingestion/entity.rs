//! Domain entities for file ingestion
//!
//! These types describe a file as it moves through the pipeline: stored by the
//! storage writer, accepted by the orchestrator, then processed by the runner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ingestion::ids::{FileId, RunId};
use crate::status::FileStatus;

/// A file that has been durably written to the uploads root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    /// Identifier the file was uploaded under
    pub file_id: FileId,

    /// Location of the stored copy
    pub path: PathBuf,

    /// Number of bytes written
    pub size_bytes: u64,

    /// MIME type sniffed from the first bytes of the stream
    pub mime_type: String,
}

/// Acknowledgement handed back to the uploader once the file is stored
///
/// The `file_id` is the key for later status polling; `run_id` only
/// correlates log lines of this particular run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub file_id: FileId,
    pub run_id: RunId,
    pub size_bytes: u64,
    pub mime_type: String,
    /// Status published before the receipt was returned (always `processing`)
    pub status: FileStatus,
    pub accepted_at: DateTime<Utc>,
}

/// Result of a successful external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Program that was launched
    pub program: String,

    /// Exit code, `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,

    /// Captured stdout followed by stderr
    pub output: String,
}

/// What a processing run produced
///
/// The processed file at `output_path` exists but is not written to; the
/// command output is only reported here and in the logs.
#[derive(Debug, Clone)]
pub struct ProcessingOutcome {
    pub output_path: PathBuf,
    pub command: CommandResult,
}
