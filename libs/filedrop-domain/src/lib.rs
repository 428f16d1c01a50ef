//! # Filedrop Domain Layer
//!
//! This crate contains the business logic of the Filedrop upload pipeline.
//! It follows hexagonal architecture principles:
//!
//! - **Entities**: files as they move through the pipeline (StoredFile, UploadReceipt)
//! - **Ports**: trait definitions for external dependencies (StorageWriter, ProcessingAction)
//! - **Services**: the orchestrator, the processing runner and its bounded pool
//! - **Status**: the shared registry of per-file lifecycle states
//!
//! ## Architecture
//!
//! This layer has no knowledge of HTTP, filesystems or processes. Those are
//! expressed as ports implemented by adapter crates.
//!
//! ## Example
//!
//! ```rust
//! use filedrop_domain::ingestion::{FileId, IngestionService};
//! use filedrop_domain::ports::{ProcessingAction, StorageWriter};
//!
//! async fn example<S, A>(service: IngestionService<S, A>)
//! where
//!     S: StorageWriter + 'static,
//!     A: ProcessingAction + 'static,
//! {
//!     let file_id = FileId::new("report.txt").unwrap();
//!     let receipt = service.ingest(file_id.clone(), &b"hello"[..]).await.unwrap();
//!     println!("Accepted {} as run {}", receipt.file_id, receipt.run_id);
//!
//!     service.drain().await;
//!     println!("Final status: {:?}", service.status(&file_id));
//! }
//! ```

pub mod ingestion;
pub mod ports;
pub mod status;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use ingestion::{FileId, IngestionError, IngestionService, RunId, StoredFile, UploadReceipt};
pub use ports::{ProcessingAction, StorageWriter};
pub use status::{FileStatus, StatusEntry, StatusRegistry};
