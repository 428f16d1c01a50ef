//! Filedrop - upload service
//!
//! HTTP front for the Filedrop ingestion pipeline. Uploaded files are stored
//! synchronously, then processed in the background while their status is
//! tracked in a shared registry.

pub mod config;
pub mod dto;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use filedrop_domain::{
    ingestion::{IngestionConfig, IngestionService},
    StatusRegistry,
};
use filedrop_local::{FsStorageWriter, ShellAction};

use crate::config::Config;

/// Ingestion service wired to the local adapters
pub type FileIngestionService = IngestionService<FsStorageWriter, ShellAction>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ingestion_service: Arc<FileIngestionService>,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Wire storage, action and registry from configuration
    pub fn from_config(config: &Config) -> Self {
        let storage = FsStorageWriter::new(&config.uploads_dir, &config.processed_dir);
        let action = ShellAction::for_current_platform(&config.action);
        let registry = Arc::new(StatusRegistry::new());

        let service = IngestionService::new(
            storage,
            action,
            registry,
            IngestionConfig {
                max_concurrent_tasks: config.max_concurrent_tasks,
            },
        );

        Self {
            ingestion_service: Arc::new(service),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}
