//! Core domain types and error definitions for the HybridRecovery API.
//!
//! This crate provides the types shared by the validator, the classifier
//! layer and the HTTP server:
//!
//! - [`FeatureKind`] and [`FeatureSpec`]: One typed entry of the input schema
//! - [`FeatureValue`] and [`FeatureVector`]: Validated, ordered model input
//! - [`Prediction`]: Classifier label plus the confidence placeholder
//! - [`ValidationIssue`]: Per-feature validation failure
//! - [`ModelError`]: Error type for artifact loading and prediction
//!
//! # Example
//!
//! ```rust
//! use recovery_core::{FeatureValue, FeatureVector};
//!
//! let vector = FeatureVector::new(vec![FeatureValue::Integer(3), FeatureValue::Real(0.5)]);
//! assert_eq!(vector.len(), 2);
//! assert_eq!(vector.sum(), 3.5);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Schema Types
// ============================================================================

/// Primitive kind a feature value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Whole number. Integral floats such as `4.0` are coerced.
    #[serde(rename = "int")]
    Integer,
    /// Floating point number.
    #[serde(rename = "float")]
    Real,
}

impl FeatureKind {
    /// Zero value used to fill absent optional features.
    pub fn zero(&self) -> FeatureValue {
        match self {
            FeatureKind::Integer => FeatureValue::Integer(0),
            FeatureKind::Real => FeatureValue::Real(0.0),
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Integer => "int",
            Self::Real => "float",
        };
        write!(f, "{}", s)
    }
}

/// A single named, typed entry of the input schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Key expected in the request payload.
    pub name: String,
    /// Kind the value must have after coercion.
    pub kind: FeatureKind,
    /// Whether a missing value is an error.
    pub required: bool,
}

impl FeatureSpec {
    /// Creates a required feature entry.
    pub fn required(name: impl Into<String>, kind: FeatureKind) -> Self {
        Self { name: name.into(), kind, required: true }
    }

    /// Creates an optional feature entry.
    pub fn optional(name: impl Into<String>, kind: FeatureKind) -> Self {
        Self { name: name.into(), kind, required: false }
    }
}

// ============================================================================
// Validated Input
// ============================================================================

/// A single validated feature value, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Integer(i64),
    Real(f64),
}

impl FeatureValue {
    /// Returns the value as a float for model input.
    pub fn as_f64(&self) -> f64 {
        match *self {
            FeatureValue::Integer(v) => v as f64,
            FeatureValue::Real(v) => v,
        }
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureValue::Integer(_) => FeatureKind::Integer,
            FeatureValue::Real(_) => FeatureKind::Real,
        }
    }
}

/// Ordered feature values matching the schema's declared order.
///
/// Only the validator produces these from request payloads, so a vector
/// always has one entry per schema field.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FeatureVector(Vec<FeatureValue>);

impl FeatureVector {
    pub fn new(values: Vec<FeatureValue>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[FeatureValue] {
        &self.0
    }

    /// Returns the values as floats, in schema order.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.0.iter().map(FeatureValue::as_f64).collect()
    }

    /// Arithmetic sum of all values.
    pub fn sum(&self) -> f64 {
        self.0.iter().map(FeatureValue::as_f64).sum()
    }
}

/// Result of dispatching one validated vector to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Discrete label produced by the classifier.
    pub label: i64,
    /// Sum of the input vector. A placeholder, not a calibrated probability.
    pub confidence_score: f64,
}

// ============================================================================
// Errors
// ============================================================================

/// A single feature that failed schema validation.
///
/// The `Display` output is the message returned to API clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Required feature absent from the payload.
    #[error("Missing required feature: '{name}'")]
    Missing { name: String },

    /// Feature present with the wrong JSON kind.
    #[error("Feature '{name}' should be {expected}, but got {actual}")]
    TypeMismatch {
        name: String,
        expected: FeatureKind,
        actual: &'static str,
    },

    /// Integral value that does not fit the integer representation.
    #[error("Feature '{name}' is out of range for {expected}")]
    OutOfRange { name: String, expected: FeatureKind },
}

impl ValidationIssue {
    /// Name of the feature this issue refers to.
    pub fn feature(&self) -> &str {
        match self {
            ValidationIssue::Missing { name }
            | ValidationIssue::TypeMismatch { name, .. }
            | ValidationIssue::OutOfRange { name, .. } => name,
        }
    }
}

/// Errors that can occur while loading a model artifact or predicting.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Failed to read the artifact from disk.
    #[error("Failed to read model artifact '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Artifact is not valid JSON for the expected format.
    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    /// Artifact parsed but its shapes are inconsistent.
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    /// Input column count differs from what the model was fitted on.
    #[error("X has {actual} features, but the model is expecting {expected} features as input")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Classifier produced no label for a single-row input.
    #[error("Classifier returned no prediction for the input row")]
    EmptyOutput,

    /// Sum of the input vector overflowed to infinity or NaN.
    #[error("confidence_score is not a finite number: {0}")]
    NonFiniteScore(f64),

    /// Any other failure raised by a classifier implementation.
    #[error("Prediction failed: {0}")]
    Prediction(String),
}

impl ModelError {
    /// Creates an IO error with path context.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Creates an invalid artifact error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArtifact(message.into())
    }
}
