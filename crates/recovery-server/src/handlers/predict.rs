//! Prediction HTTP handler.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};

use crate::dto::PredictResponse;
use crate::error::AppError;
use crate::services;
use crate::ServerState;

/// Validates the JSON body and runs it through the classifier.
///
/// The raw body is read regardless of content type so that an absent payload
/// gets the same response as an empty one.
pub async fn predict(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<Json<PredictResponse>, AppError> {
    let payload = services::predict::parse_payload(&body)?;
    let prediction = services::predict::run(&state, &payload)?;
    Ok(Json(prediction.into()))
}
