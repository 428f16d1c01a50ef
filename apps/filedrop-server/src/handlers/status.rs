//! Status handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use filedrop_domain::FileId;
use tracing::debug;

use crate::{
    dto::{ErrorResponse, StatusListResponse, StatusResponse},
    AppState,
};

/// Current status of an uploaded file
#[utoipa::path(
    get,
    path = "/status/{file_id}",
    params(
        ("file_id" = String, Path, description = "File name used at upload")
    ),
    responses(
        (status = 200, description = "Current status", body = StatusResponse),
        (status = 404, description = "No upload with this name", body = ErrorResponse)
    ),
    tag = "status"
)]
pub async fn status_handler(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Response {
    // Names that fail validation were never accepted, so they are simply unknown
    let entry = FileId::new(file_id.as_str())
        .ok()
        .and_then(|id| state.ingestion_service.status(&id).map(|entry| (id, entry)));

    match entry {
        Some((id, entry)) => {
            debug!(file_id = %id, status = %entry.status, "Status lookup");
            Json(StatusResponse::new(&id, entry)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("No status for file {file_id:?}"))),
        )
            .into_response(),
    }
}

/// Status of every uploaded file
#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "All tracked files", body = StatusListResponse)
    ),
    tag = "status"
)]
pub async fn list_status_handler(State(state): State<AppState>) -> Json<StatusListResponse> {
    let files = state
        .ingestion_service
        .registry()
        .snapshot()
        .into_iter()
        .map(|(id, entry)| StatusResponse::new(&id, entry))
        .collect();

    Json(StatusListResponse { files })
}
