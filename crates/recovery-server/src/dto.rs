//! Data transfer objects for HTTP message serialization.

use recovery_core::{FeatureSpec, Prediction};
use serde::Serialize;

/// Response from the root liveness route.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
}

/// Successful prediction.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: i64,
    /// Sum of the submitted features, not a probability.
    pub confidence_score: f64,
}

impl From<Prediction> for PredictResponse {
    fn from(p: Prediction) -> Self {
        Self {
            prediction: p.label,
            confidence_score: p.confidence_score,
        }
    }
}

/// The input contract, in model column order.
#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub features: Vec<FeatureSpec>,
}
