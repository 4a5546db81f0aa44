//! Classifier abstraction and prediction dispatch.
//!
//! This crate connects validated feature vectors to a pre-trained model:
//!
//! - [`Classifier`]: Trait for any model exposing batch label prediction
//! - [`LinearClassifier`]: Linear decision model loaded from a JSON artifact
//! - [`dispatch`]: Runs one vector through a classifier and packages the result
//!
//! # Implementing a Custom Classifier
//!
//! ```rust
//! use recovery_model::{Classifier, ArrayView2};
//! use recovery_core::ModelError;
//!
//! struct AlwaysZero;
//!
//! impl Classifier for AlwaysZero {
//!     fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError> {
//!         Ok(vec![0; rows.nrows()])
//!     }
//! }
//! ```
//!
//! # Loading the Artifact
//!
//! ```rust,ignore
//! use recovery_model::LinearClassifier;
//!
//! let model = LinearClassifier::from_file("saved_model/linear_svc_model.json")?;
//! println!("{} classes", model.classes().len());
//! ```

mod linear;

pub use linear::LinearClassifier;
pub use ndarray::{Array2, ArrayView2};

use recovery_core::{FeatureVector, ModelError, Prediction};
use tracing::debug;

/// A pre-trained model that assigns one discrete label per input row.
///
/// Implementations are loaded once and shared read-only across requests.
pub trait Classifier: Send + Sync {
    /// Predicts a label for each row of `rows` (shape `[n_samples, n_features]`).
    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError>;

    /// Number of input columns the model was fitted on, if known.
    fn n_features(&self) -> Option<usize> {
        None
    }
}

/// Runs a single validated vector through the classifier.
///
/// The vector becomes a one-row matrix and the first returned label is the
/// prediction. `confidence_score` is the sum of the vector's values: a
/// placeholder that does not come from the classifier. A sum that overflows to
/// a non-finite value is an error. Classifier errors are returned unchanged.
pub fn dispatch(classifier: &dyn Classifier, vector: &FeatureVector) -> Result<Prediction, ModelError> {
    let row = Array2::from_shape_vec((1, vector.len()), vector.to_f64_vec())
        .map_err(|e| ModelError::Prediction(e.to_string()))?;

    let labels = classifier.predict(row.view())?;
    let label = labels.first().copied().ok_or(ModelError::EmptyOutput)?;
    let confidence_score = vector.sum();
    if !confidence_score.is_finite() {
        return Err(ModelError::NonFiniteScore(confidence_score));
    }

    debug!(label, confidence_score, "Dispatched {} features", vector.len());
    Ok(Prediction { label, confidence_score })
}

#[cfg(test)]
mod tests {
    use super::*;
    use recovery_core::FeatureValue;

    /// Returns the row width as the label so tests can see what was passed in.
    struct WidthEcho;

    impl Classifier for WidthEcho {
        fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError> {
            assert_eq!(rows.nrows(), 1);
            Ok(vec![rows.ncols() as i64])
        }
    }

    struct Silent;

    impl Classifier for Silent {
        fn predict(&self, _rows: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError> {
            Ok(Vec::new())
        }
    }

    struct Failing;

    impl Classifier for Failing {
        fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError> {
            Err(ModelError::DimensionMismatch { expected: 32, actual: rows.ncols() })
        }
    }

    fn sample_vector() -> FeatureVector {
        FeatureVector::new(vec![
            FeatureValue::Integer(1),
            FeatureValue::Integer(2),
            FeatureValue::Real(0.5),
            FeatureValue::Real(1.25),
        ])
    }

    #[test]
    fn dispatch_reshapes_to_single_row_and_sums() {
        let prediction = dispatch(&WidthEcho, &sample_vector()).unwrap();
        assert_eq!(prediction.label, 4);
        assert_eq!(prediction.confidence_score, 4.75);
    }

    #[test]
    fn overflowing_sum_is_an_error() {
        let vector = FeatureVector::new(vec![FeatureValue::Real(1e308), FeatureValue::Real(1e308)]);
        let err = dispatch(&WidthEcho, &vector).unwrap_err();
        assert!(matches!(err, ModelError::NonFiniteScore(score) if score == f64::INFINITY));
        assert_eq!(err.to_string(), "confidence_score is not a finite number: inf");
    }

    #[test]
    fn empty_classifier_output_is_an_error() {
        let err = dispatch(&Silent, &sample_vector()).unwrap_err();
        assert!(matches!(err, ModelError::EmptyOutput));
    }

    #[test]
    fn classifier_errors_propagate_unchanged() {
        let err = dispatch(&Failing, &sample_vector()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "X has 4 features, but the model is expecting 32 features as input"
        );
    }
}
