//! DTOs for the status and health endpoints

use chrono::{DateTime, Utc};
use filedrop_domain::{FileId, StatusEntry};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Current status of one file
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "report.txt")]
    pub file_id: String,
    /// One of `processing`, `completed`, `error`
    #[schema(example = "completed")]
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

impl StatusResponse {
    pub fn new(file_id: &FileId, entry: StatusEntry) -> Self {
        Self {
            file_id: file_id.to_string(),
            status: entry.status.to_string(),
            updated_at: entry.updated_at,
        }
    }
}

/// Every tracked file
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusListResponse {
    pub files: Vec<StatusResponse>,
}

/// Service health and pipeline counters
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "OK")]
    pub status: String,
    pub processing: usize,
    pub completed: usize,
    pub error: usize,
    /// Processing runs spawned and not yet finished
    pub in_flight: usize,
}
