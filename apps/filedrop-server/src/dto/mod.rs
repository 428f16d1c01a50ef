//! Request and response bodies

pub mod status;
pub mod upload;

pub use status::{HealthResponse, StatusListResponse, StatusResponse};
pub use upload::{ErrorResponse, UploadForm, UploadResponse};
