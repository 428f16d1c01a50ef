//! Ingestion domain module
//!
//! This module contains the pipeline that takes an upload from the wire to a
//! terminal status: identifiers, entities, errors, the processing runner, the
//! bounded pool running it, and the orchestrating service.

mod entity;
mod error;
mod ids;
mod pool;
mod runner;
mod service;

pub use entity::{CommandResult, ProcessingOutcome, StoredFile, UploadReceipt};
pub use error::{IngestionError, ProcessingError, Result, StorageError};
pub use ids::{FileId, RunId};
pub use pool::{ProcessingPool, DEFAULT_MAX_CONCURRENT_TASKS};
pub use runner::ProcessingRunner;
pub use service::{IngestionConfig, IngestionService};
