use ndarray::{Array1, ArrayView1};
use serde::Deserialize;
use std::path::Path;

use crate::artifacts::{check_feature_names, check_format_version, read_json};
use crate::error::{PredictError, Result};
use crate::features::FEATURE_LAYOUT;
use crate::types::ProbabilityPair;

/// A fitted binary classifier that scores a normalized feature vector.
pub trait ProbabilisticClassifier: Send + Sync {
    fn predict_proba(&self, x: &[f64]) -> Result<ProbabilityPair>;

    fn n_features(&self) -> usize;

    fn name(&self) -> &str {
        "classifier"
    }
}

#[derive(Deserialize)]
struct LogisticJson {
    format_version: u32,
    feature_names: Vec<String>,
    classes: Vec<i64>,
    coef: Vec<f64>,
    intercept: f64,
}

/// Binary logistic regression: `p(delayed) = sigmoid(coef . x + intercept)`.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    coef: Array1<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn load(path: &Path) -> Result<Self> {
        let raw: LogisticJson = read_json(path)?;
        check_format_version(path, raw.format_version)?;
        check_feature_names(path, &raw.feature_names, FEATURE_LAYOUT)?;
        // column 1 of predict_proba must be the "delayed" class
        if raw.classes != [0_i64, 1] {
            return Err(PredictError::model_load(
                path,
                format!("expected binary classes [0, 1], got {:?}", raw.classes),
            ));
        }
        Self::new(raw.coef, raw.intercept).map_err(|reason| PredictError::model_load(path, reason))
    }

    pub fn new(coef: Vec<f64>, intercept: f64) -> std::result::Result<Self, String> {
        if coef.is_empty() {
            return Err("coef is empty".into());
        }
        if !intercept.is_finite() || coef.iter().any(|w| !w.is_finite()) {
            return Err("coefficients must be finite".into());
        }
        Ok(Self {
            coef: Array1::from(coef),
            intercept,
        })
    }

    fn decision_function(&self, x: &[f64]) -> f64 {
        self.coef.dot(&ArrayView1::from(x)) + self.intercept
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn predict_proba(&self, x: &[f64]) -> Result<ProbabilityPair> {
        if x.len() != self.coef.len() {
            return Err(PredictError::Inference(format!(
                "expected {} features, got {}",
                self.coef.len(),
                x.len()
            )));
        }
        if let Some(i) = x.iter().position(|v| !v.is_finite()) {
            return Err(PredictError::Inference(format!(
                "feature {} ({}) is not finite: {}",
                i,
                FEATURE_LAYOUT.get(i).copied().unwrap_or("?"),
                x[i]
            )));
        }
        let z = self.decision_function(x);
        if !z.is_finite() {
            return Err(PredictError::Inference(format!(
                "decision score is not finite: {z}"
            )));
        }
        Ok(ProbabilityPair::from_delayed(sigmoid(z)))
    }

    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}

// Branches keep exp() from overflowing for large |z|.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
