//! DTOs for the upload endpoint

use chrono::{DateTime, Utc};
use filedrop_domain::UploadReceipt;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Multipart form accepted by the upload endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadForm {
    /// File to upload; its filename becomes the identifier
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Response body for an accepted upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Identifier to poll `/status/{file_id}` with
    #[schema(example = "report.txt")]
    pub file_id: String,
    /// Identifier of this processing run
    #[schema(example = "01926f0e-5c3b-7b1e-9a43-2f1f0c0b7f55")]
    pub run_id: String,
    #[schema(example = "processing")]
    pub status: String,
    #[schema(example = 10)]
    pub size_bytes: u64,
    #[schema(example = "text/plain; charset=utf-8")]
    pub mime_type: String,
    /// When the file was stored
    pub accepted_at: DateTime<Utc>,
    #[schema(example = "File uploaded successfully")]
    pub message: String,
}

impl From<UploadReceipt> for UploadResponse {
    fn from(receipt: UploadReceipt) -> Self {
        Self {
            file_id: receipt.file_id.to_string(),
            run_id: receipt.run_id.to_string(),
            status: receipt.status.to_string(),
            size_bytes: receipt.size_bytes,
            mime_type: receipt.mime_type,
            accepted_at: receipt.accepted_at,
            message: "File uploaded successfully".to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error description
    #[schema(example = "Error retrieving the file: no file field in request")]
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
