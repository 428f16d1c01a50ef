//! API routes

pub mod status;
pub mod upload;

use axum::{
    extract::{DefaultBodyLimit, State},
    Json, Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dto::{
        ErrorResponse, HealthResponse, StatusListResponse, StatusResponse, UploadForm,
        UploadResponse,
    },
    handlers, AppState,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::upload::upload_handler,
        handlers::status::status_handler,
        handlers::status::list_status_handler,
        health_handler
    ),
    components(
        schemas(
            UploadForm,
            UploadResponse,
            ErrorResponse,
            StatusResponse,
            StatusListResponse,
            HealthResponse
        )
    ),
    tags(
        (name = "upload", description = "File upload endpoints"),
        (name = "status", description = "Processing status endpoints"),
        (name = "health", description = "Health check endpoints")
    ),
    info(
        title = "Filedrop API",
        version = "0.1.0",
        description = "File upload service with asynchronous post-processing",
        contact(
            name = "Filedrop Team"
        )
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(upload::routes())
        .merge(status::routes())
        .route("/health", axum::routing::get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let summary = state.ingestion_service.registry().summary();

    Json(HealthResponse {
        status: "OK".to_string(),
        processing: summary.processing,
        completed: summary.completed,
        error: summary.error,
        in_flight: state.ingestion_service.in_flight(),
    })
}
