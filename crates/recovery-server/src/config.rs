//! Server configuration.
//!
//! The listen address and model location are fixed for a deployment; only the
//! log filter (`RUST_LOG`) comes from the environment.

use std::path::PathBuf;

/// Address the HTTP listener binds to.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Location of the serialized classifier, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "saved_model/linear_svc_model.json";

/// Startup configuration for the prediction server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub model_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}
