//! Feature schema table and request payload validation.
//!
//! This crate defines the input contract of the prediction API:
//!
//! - [`FeatureSchema`]: Ordered, immutable list of typed features
//! - [`SchemaBuilder`]: Fluent API for building schemas programmatically
//! - [`FeatureSchema::validate`]: Checks a JSON object against the schema
//!
//! Validation walks the schema table in declared order and collects every
//! failing feature instead of stopping at the first one, so a client gets the
//! complete report in one round trip. Keys not declared by the schema are
//! ignored.
//!
//! # Example
//!
//! ```rust
//! use recovery_schema::FeatureSchema;
//! use serde_json::json;
//!
//! let schema = FeatureSchema::builder()
//!     .integer("priority")
//!     .real("requested_cpu")
//!     .build();
//!
//! let payload = json!({ "priority": 3.0, "requested_cpu": 0.5, "extra": 1 });
//! let vector = schema.validate(payload.as_object().unwrap()).unwrap();
//! assert_eq!(vector.to_f64_vec(), vec![3.0, 0.5]);
//! ```

use recovery_core::{FeatureKind, FeatureSpec, FeatureValue, FeatureVector, ValidationIssue};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::debug;

/// Features accepted by the HybridRecovery classifier, in model column order.
const HYBRID_RECOVERY_FEATURES: &[(&str, FeatureKind)] = &[
    ("event_type_x", FeatureKind::Integer),
    ("scheduling_class_x", FeatureKind::Integer),
    ("priority", FeatureKind::Integer),
    ("requested_cpu", FeatureKind::Real),
    ("requested_ram", FeatureKind::Real),
    ("requested_disk_space", FeatureKind::Real),
    ("diff_machine_constraint", FeatureKind::Integer),
    ("event_type_y", FeatureKind::Integer),
    ("scheduling_class_y", FeatureKind::Integer),
    ("mean_cpu_usage", FeatureKind::Real),
    ("canonical_memory_usage", FeatureKind::Real),
    ("assigned_memory_usage", FeatureKind::Real),
    ("unmapped_page_cache", FeatureKind::Real),
    ("total_page_cache", FeatureKind::Real),
    ("max_memory_usage", FeatureKind::Real),
    ("mean_disk_io_time", FeatureKind::Real),
    ("mean_local_disk_space", FeatureKind::Real),
    ("max_cpu_usage", FeatureKind::Real),
    ("max_disk_io_time", FeatureKind::Real),
    ("cpi", FeatureKind::Real),
    ("mai", FeatureKind::Real),
    ("sample_portion", FeatureKind::Real),
    ("aggregation_type", FeatureKind::Integer),
    ("sampled_cpu_usage", FeatureKind::Real),
    ("job_duration", FeatureKind::Real),
    ("cpu_utilization_ratio", FeatureKind::Real),
    ("memory_utilization_ratio", FeatureKind::Real),
    ("job_occurrences", FeatureKind::Integer),
    ("access_frequency", FeatureKind::Real),
    ("data_size", FeatureKind::Real),
    ("latency_sensitivity", FeatureKind::Real),
    ("read_write_ratio", FeatureKind::Real),
];

/// Ordered feature table. Declared order is the model's column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSchema {
    features: Vec<FeatureSpec>,
}

impl FeatureSchema {
    /// Creates a new builder for constructing a schema programmatically.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// The schema the HybridRecovery classifier was trained on.
    pub fn hybrid_recovery() -> Self {
        let features = HYBRID_RECOVERY_FEATURES
            .iter()
            .map(|(name, kind)| FeatureSpec::required(*name, *kind))
            .collect();
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterates features in declared order.
    pub fn iter(&self) -> impl Iterator<Item = &FeatureSpec> {
        self.features.iter()
    }

    /// Returns feature names in declared order.
    pub fn names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    /// Gets a feature by name.
    pub fn get(&self, name: &str) -> Option<&FeatureSpec> {
        self.features.iter().find(|f| f.name == name)
    }

    /// Validates a payload and builds the ordered feature vector.
    ///
    /// Every feature is checked; on failure all issues are returned in schema
    /// order and no vector is produced.
    pub fn validate(&self, payload: &Map<String, Value>) -> Result<FeatureVector, Vec<ValidationIssue>> {
        let mut slots: Vec<Option<FeatureValue>> = vec![None; self.features.len()];
        let mut issues = Vec::new();

        for (idx, spec) in self.features.iter().enumerate() {
            let Some(raw) = payload.get(&spec.name) else {
                if spec.required {
                    issues.push(ValidationIssue::Missing { name: spec.name.clone() });
                } else {
                    slots[idx] = Some(spec.kind.zero());
                }
                continue;
            };

            match coerce(spec, raw) {
                Ok(value) => slots[idx] = Some(value),
                Err(issue) => issues.push(issue),
            }
        }

        if !issues.is_empty() {
            debug!("Payload rejected with {} issue(s)", issues.len());
            return Err(issues);
        }

        let values: Vec<FeatureValue> = slots.into_iter().flatten().collect();
        debug_assert_eq!(values.len(), self.features.len());
        Ok(FeatureVector::new(values))
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::hybrid_recovery()
    }
}

/// Checks one present value against its spec, applying integer coercion.
fn coerce(spec: &FeatureSpec, value: &Value) -> Result<FeatureValue, ValidationIssue> {
    let mismatch = || ValidationIssue::TypeMismatch {
        name: spec.name.clone(),
        expected: spec.kind,
        actual: json_kind(value),
    };
    let out_of_range = || ValidationIssue::OutOfRange {
        name: spec.name.clone(),
        expected: spec.kind,
    };

    let Value::Number(number) = value else {
        return Err(mismatch());
    };

    match spec.kind {
        FeatureKind::Integer => {
            if let Some(v) = number.as_i64() {
                return Ok(FeatureValue::Integer(v));
            }
            if number.is_u64() {
                return Err(out_of_range());
            }
            let v = float_of(number).ok_or_else(mismatch)?;
            if !is_integral(v) {
                return Err(mismatch());
            }
            integral_to_i64(v).map(FeatureValue::Integer).ok_or_else(out_of_range)
        }
        FeatureKind::Real => float_of(number).map(FeatureValue::Real).ok_or_else(mismatch),
    }
}

/// The float value of a JSON number written as a float literal.
fn float_of(number: &Number) -> Option<f64> {
    number.as_f64().filter(|_| number.is_f64())
}

/// Whether a float has no fractional part, e.g. `4.0`.
pub fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

/// Converts an integral float to `i64` when it is representable.
fn integral_to_i64(value: f64) -> Option<i64> {
    // 2^63 is exactly representable; i64::MAX is not.
    const UPPER: f64 = 9_223_372_036_854_775_808.0;
    (value >= -UPPER && value < UPPER).then_some(value as i64)
}

/// Name of a JSON value's kind as reported in mismatch messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Builder API
// ============================================================================

/// Builder for constructing a [`FeatureSchema`].
///
/// Use [`FeatureSchema::builder()`] to create a new builder.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    features: Vec<FeatureSpec>,
}

impl SchemaBuilder {
    /// Appends a required feature of the given kind.
    pub fn feature(mut self, name: impl Into<String>, kind: FeatureKind) -> Self {
        self.features.push(FeatureSpec::required(name, kind));
        self
    }

    /// Appends a required integer feature.
    pub fn integer(self, name: impl Into<String>) -> Self {
        self.feature(name, FeatureKind::Integer)
    }

    /// Appends a required real feature.
    pub fn real(self, name: impl Into<String>) -> Self {
        self.feature(name, FeatureKind::Real)
    }

    /// Marks the most recently added feature as optional.
    pub fn optional(mut self) -> Self {
        if let Some(last) = self.features.pop() {
            self.features.push(FeatureSpec::optional(last.name, last.kind));
        }
        self
    }

    /// Builds the final [`FeatureSchema`].
    pub fn build(self) -> FeatureSchema {
        FeatureSchema { features: self.features }
    }
}
