//! Upload handler

use std::io;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use filedrop_domain::{
    ingestion::{IngestionError, StorageError},
    FileId, UploadReceipt,
};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use tracing::{error, info, warn};

use crate::{
    dto::{ErrorResponse, UploadResponse},
    AppState,
};

/// Multipart field carrying the file
pub const FILE_FIELD: &str = "file";

/// Handle file uploads
///
/// The file is stored before the response is sent; processing continues in
/// the background and is observable through `/status/{file_id}`.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = crate::dto::UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored, processing started", body = UploadResponse),
        (status = 400, description = "Missing file field or invalid file name", body = ErrorResponse),
        (status = 405, description = "Method not allowed"),
        (status = 413, description = "Payload too large", body = ErrorResponse),
        (status = 500, description = "File could not be stored", body = ErrorResponse)
    ),
    tag = "upload"
)]
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let result = match multipart {
        Ok(multipart) => receive_upload(&state, multipart).await,
        Err(rejection) => Err(IngestionError::invalid_request(rejection.body_text())),
    };

    match result {
        Ok(receipt) => {
            info!(file_id = %receipt.file_id, run_id = %receipt.run_id, "Upload accepted");
            (StatusCode::OK, Json(UploadResponse::from(receipt))).into_response()
        }
        Err(err) => {
            let status = match &err {
                IngestionError::MissingFile
                | IngestionError::InvalidIdentifier { .. }
                | IngestionError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                IngestionError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
                IngestionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };

            if err.is_client_error() {
                warn!(error = %err, "Upload rejected");
            } else {
                error!(error = %err, "Upload failed");
            }

            (status, Json(ErrorResponse::new(err.to_string()))).into_response()
        }
    }
}

/// Find the file field and stream it into the pipeline
async fn receive_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<UploadReceipt, IngestionError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_id = FileId::new(field.file_name().unwrap_or_default())?;
        info!(file_id = %file_id, content_type = ?field.content_type(), "Receiving upload");

        let reader = StreamReader::new(field.map_err(io::Error::other));
        tokio::pin!(reader);

        return state
            .ingestion_service
            .ingest(file_id, reader)
            .await
            .map_err(body_limit_error);
    }

    Err(IngestionError::MissingFile)
}

fn multipart_error(err: MultipartError) -> IngestionError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        IngestionError::PayloadTooLarge(err.body_text())
    } else {
        IngestionError::invalid_request(err.body_text())
    }
}

/// A body limit hit while streaming surfaces as a copy failure; report it as such
fn body_limit_error(err: IngestionError) -> IngestionError {
    let IngestionError::Storage(StorageError::Copy { source, .. }) = &err else {
        return err;
    };

    match source
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<MultipartError>())
    {
        Some(multipart) if multipart.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            IngestionError::PayloadTooLarge(multipart.body_text())
        }
        _ => err,
    }
}
