//! Domain errors for ingestion operations
//!
//! Three families of failure exist in the pipeline:
//! - `StorageError`: writing or reopening files under the storage roots
//! - `ProcessingError`: anything that goes wrong in a detached processing run
//! - `IngestionError`: what the uploader can be told about a rejected upload

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by a storage writer
#[derive(Error, Debug)]
pub enum StorageError {
    /// The upload destination could not be created
    #[error("Unable to create destination {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },

    /// Copying the inbound stream to the destination failed
    #[error("Error copying stream to {}: {source}", .path.display())]
    Copy { path: PathBuf, source: io::Error },

    /// The stored copy could not be reopened for processing
    #[error("Unable to open stored file {}: {source}", .path.display())]
    SourceOpen { path: PathBuf, source: io::Error },

    /// The processed destination could not be created
    #[error("Unable to create processed file {}: {source}", .path.display())]
    OutputCreate { path: PathBuf, source: io::Error },
}

impl StorageError {
    /// Path the failing operation was working on
    pub fn path(&self) -> &Path {
        match self {
            Self::Create { path, .. }
            | Self::Copy { path, .. }
            | Self::SourceOpen { path, .. }
            | Self::OutputCreate { path, .. } => path,
        }
    }
}

/// Errors raised while running the post-processing step
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// The processed destination could not be prepared
    #[error("Output preparation failed: {0}")]
    Output(#[from] StorageError),

    /// No executable is configured for the current platform
    #[error("No executable configured ({variable} is not set)")]
    MissingExecutable { variable: String },

    /// The executable could not be started
    #[error("Failed to launch {program}: {source}")]
    Launch { program: String, source: io::Error },

    /// The command ran but reported failure
    #[error("{program} exited with {}: {output}", exit_label(.code))]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        output: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Errors that can reject an upload
///
/// Only failures of the synchronous phase appear here. Once an upload is
/// accepted, later failures are recorded in the status registry instead.
#[derive(Error, Debug)]
pub enum IngestionError {
    /// The request carried no `file` field
    #[error("Error retrieving the file: no file field in request")]
    MissingFile,

    /// The declared filename cannot be used as an identifier
    #[error("Invalid file name {name:?}: {reason}")]
    InvalidIdentifier { name: String, reason: String },

    /// The request body could not be read as an upload
    #[error("Malformed upload request: {0}")]
    InvalidRequest(String),

    /// The request body exceeds the configured limit
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    /// The file could not be stored
    #[error("Unable to save the file: {0}")]
    Storage(#[from] StorageError),
}

impl IngestionError {
    /// Create an invalid identifier error
    pub fn invalid_identifier(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid request error with a message
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Whether the caller is at fault (as opposed to the server)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestionError>;
