//! HTTP server exposing the HybridRecovery classifier.
//!
//! Routes:
//!
//! | Route | Method | Description |
//! |-------|--------|-------------|
//! | `/` | GET | Liveness message |
//! | `/predict` | POST | Validate a feature payload and predict |
//! | `/schema` | GET | Feature schema in model column order |
//! | `/health` | GET | Plain-text health check |
//!
//! [`create_app`] builds the router around an injected [`ServerState`], so
//! tests can substitute their own classifier.

pub mod config;
mod dto;
pub mod error;
mod handlers;
mod services;

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use recovery_core::ModelError;
use recovery_model::{Classifier, LinearClassifier};
use recovery_schema::FeatureSchema;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub use config::ServerConfig;
pub use error::AppError;
pub use handlers::RUNNING_MESSAGE;

/// Shared server state accessible from all handlers.
pub struct ServerState {
    pub schema: FeatureSchema,
    pub classifier: Arc<dyn Classifier>,
}

impl ServerState {
    pub fn new(schema: FeatureSchema, classifier: Arc<dyn Classifier>) -> Self {
        Self { schema, classifier }
    }

    /// Loads the model artifact named by `config` and pairs it with the built-in schema.
    ///
    /// A model whose width or column names disagree with the schema is still
    /// served; requests will then fail at prediction time.
    pub fn load(config: &ServerConfig) -> Result<Self, ModelError> {
        let schema = FeatureSchema::hybrid_recovery();
        let model = LinearClassifier::from_file(&config.model_path)?;

        if let Some(n) = model.n_features() {
            if n != schema.len() {
                warn!("Model expects {} features but the schema declares {}", n, schema.len());
            }
        }
        if let Some(names) = model.feature_names() {
            if !names.iter().map(String::as_str).eq(schema.names()) {
                warn!("Model feature names differ from the schema order");
            }
        }

        info!("Schema has {} features, model has {} classes", schema.len(), model.classes().len());
        Ok(Self::new(schema, Arc::new(model)))
    }
}

/// Builds the application router.
pub fn create_app(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict::predict))
        .route("/schema", get(handlers::schema::list))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .with_state(state)
}

/// Turns a handler panic into the generic 500 error envelope.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    error!("Request handler panicked: {}", message);
    AppError::Internal(message).into_response()
}
