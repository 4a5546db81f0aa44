//! Schema listing handler.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::SchemaResponse;
use crate::ServerState;

/// Returns the feature schema clients must satisfy.
pub async fn list(State(state): State<Arc<ServerState>>) -> Json<SchemaResponse> {
    Json(SchemaResponse {
        features: state.schema.iter().cloned().collect(),
    })
}
