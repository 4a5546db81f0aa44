//! One-vs-rest linear decision model loaded from a JSON artifact.
//!
//! Artifact format:
//!
//! ```json
//! {
//!   "classes": [0, 1],
//!   "coef": [[0.1, -0.2, 0.3]],
//!   "intercept": [0.05],
//!   "feature_names": ["a", "b", "c"]
//! }
//! ```
//!
//! With two classes `coef` holds a single row and a positive score selects
//! `classes[1]`. With more classes there is one row per class and the highest
//! score wins.

use std::fs;
use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use recovery_core::ModelError;
use serde::Deserialize;
use tracing::info;

use crate::Classifier;

/// On-disk representation of a fitted linear model.
#[derive(Debug, Deserialize)]
struct LinearArtifact {
    classes: Vec<i64>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
}

/// Linear classifier with one weight row per decision function.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    classes: Vec<i64>,
    coef: Array2<f64>,
    intercept: Array1<f64>,
    feature_names: Option<Vec<String>>,
}

impl LinearClassifier {
    /// Creates a classifier, checking that the shapes agree.
    pub fn new(classes: Vec<i64>, coef: Array2<f64>, intercept: Array1<f64>) -> Result<Self, ModelError> {
        if classes.len() < 2 {
            return Err(ModelError::invalid("at least two classes are required"));
        }
        if coef.ncols() == 0 {
            return Err(ModelError::invalid("coef has no feature columns"));
        }

        let expected_rows = if classes.len() == 2 { 1 } else { classes.len() };
        if coef.nrows() != expected_rows {
            return Err(ModelError::invalid(format!(
                "{} classes need {} coef row(s), found {}",
                classes.len(),
                expected_rows,
                coef.nrows()
            )));
        }
        if intercept.len() != coef.nrows() {
            return Err(ModelError::invalid(format!(
                "intercept has {} entries, expected {}",
                intercept.len(),
                coef.nrows()
            )));
        }

        Ok(Self { classes, coef, intercept, feature_names: None })
    }

    /// Loads a classifier from a JSON artifact file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ModelError::io(path.display().to_string(), e))?;
        let model = Self::from_json(&content)?;
        info!(
            "Loaded linear model from {} ({} classes, {} features)",
            path.display(),
            model.classes.len(),
            model.coef.ncols()
        );
        Ok(model)
    }

    /// Parses a classifier from a JSON artifact string.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: LinearArtifact = serde_json::from_str(json)?;

        let n_rows = artifact.coef.len();
        let n_cols = artifact.coef.first().map_or(0, Vec::len);
        if artifact.coef.iter().any(|row| row.len() != n_cols) {
            return Err(ModelError::invalid("coef rows have different lengths"));
        }
        let flat: Vec<f64> = artifact.coef.into_iter().flatten().collect();
        let coef = Array2::from_shape_vec((n_rows, n_cols), flat)
            .map_err(|e| ModelError::invalid(e.to_string()))?;

        let mut model = Self::new(artifact.classes, coef, Array1::from(artifact.intercept))?;

        if let Some(names) = artifact.feature_names {
            if names.len() != n_cols {
                return Err(ModelError::invalid(format!(
                    "{} feature names for {} coef columns",
                    names.len(),
                    n_cols
                )));
            }
            model.feature_names = Some(names);
        }

        Ok(model)
    }

    /// Class labels in the order the model emits them.
    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    /// Column names recorded at fit time, if the artifact carried them.
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// Raw scores, one column per decision function.
    pub fn decision_function(&self, rows: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError> {
        if rows.ncols() != self.coef.ncols() {
            return Err(ModelError::DimensionMismatch {
                expected: self.coef.ncols(),
                actual: rows.ncols(),
            });
        }
        Ok(rows.dot(&self.coef.t()) + &self.intercept)
    }

    fn label_for(&self, scores: ArrayView1<'_, f64>) -> i64 {
        if scores.len() == 1 {
            return if scores[0] > 0.0 { self.classes[1] } else { self.classes[0] };
        }

        let mut best = 0;
        for (idx, &score) in scores.iter().enumerate() {
            if score > scores[best] {
                best = idx;
            }
        }
        self.classes[best]
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError> {
        let scores = self.decision_function(rows)?;
        Ok(scores.outer_iter().map(|row| self.label_for(row)).collect())
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coef.ncols())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;

    fn binary() -> LinearClassifier {
        LinearClassifier::new(vec![0, 1], array![[1.0, -1.0]], array![0.0]).unwrap()
    }

    #[test]
    fn binary_uses_sign_of_score() {
        let model = binary();
        let rows = array![[2.0, 1.0], [1.0, 2.0], [1.0, 1.0]];
        // A score of exactly zero falls to the first class.
        assert_eq!(model.predict(rows.view()).unwrap(), vec![1, 0, 0]);
    }

    #[test]
    fn multiclass_picks_highest_score() {
        let model = LinearClassifier::new(
            vec![10, 20, 30],
            array![[1.0, 0.0], [0.0, 1.0], [-1.0, -1.0]],
            array![0.0, 0.0, 0.5],
        )
        .unwrap();

        let rows = array![[3.0, 1.0], [0.0, 2.0], [-2.0, -2.0]];
        assert_eq!(model.predict(rows.view()).unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn wrong_width_is_rejected() {
        let err = binary().predict(array![[1.0, 2.0, 3.0]].view()).unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { expected: 2, actual: 3 }));
    }

    #[test]
    fn inconsistent_artifacts_are_rejected() {
        let cases = [
            r#"{"classes": [1], "coef": [[1.0]], "intercept": [0.0]}"#,
            r#"{"classes": [0, 1], "coef": [[1.0], [2.0]], "intercept": [0.0, 0.0]}"#,
            r#"{"classes": [0, 1, 2], "coef": [[1.0, 2.0], [3.0]], "intercept": [0.0, 0.0, 0.0]}"#,
            r#"{"classes": [0, 1], "coef": [[1.0, 2.0]], "intercept": [0.0, 1.0]}"#,
            r#"{"classes": [0, 1], "coef": [[1.0, 2.0]], "intercept": [0.0], "feature_names": ["a"]}"#,
            r#"{"classes": [0, 1], "coef": [[]], "intercept": [0.0]}"#,
        ];

        for json in cases {
            let err = LinearClassifier::from_json(json).unwrap_err();
            assert!(matches!(err, ModelError::InvalidArtifact(_)), "accepted {}", json);
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = LinearClassifier::from_json("{\"classes\": [0, 1]").unwrap_err();
        assert!(matches!(err, ModelError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"classes": [0, 1], "coef": [[0.5, 0.5]], "intercept": [-1.0], "feature_names": ["a", "b"]}}"#
        )
        .unwrap();

        let model = LinearClassifier::from_file(file.path()).unwrap();
        assert_eq!(model.classes(), &[0, 1]);
        assert_eq!(model.n_features(), Some(2));
        assert_eq!(model.feature_names().unwrap(), &["a".to_string(), "b".to_string()]);
        assert_eq!(model.predict(array![[4.0, 0.0]].view()).unwrap(), vec![1]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = LinearClassifier::from_file("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/model.json"));
    }
}
