//! HTTP route handlers for the prediction server.

pub mod predict;
pub mod schema;

use axum::Json;

use crate::dto::IndexResponse;

pub const RUNNING_MESSAGE: &str = "HybridRecovery ML API is running!";

/// Root endpoint confirming the API is up.
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse { message: RUNNING_MESSAGE })
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}
