//! Status routes

use axum::{routing::get, Router};

use crate::{
    handlers::status::{list_status_handler, status_handler},
    AppState,
};

/// Create status routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(list_status_handler))
        .route("/status/:file_id", get(status_handler))
}
