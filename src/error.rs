use std::path::PathBuf;

use thiserror::Error;

/// Every way a prediction (or loading the artifacts behind it) can fail.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("unknown carrier code {0:?}: not in the fitted vocabulary")]
    UnknownCategory(String),

    #[error("feature vector has {got} values, scaler was fitted on {expected}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("classifier rejected input: {0}")]
    Inference(String),

    #[error("failed to load artifact {}: {reason}", .path.display())]
    ModelLoad { path: PathBuf, reason: String },

    #[error("predictor has no loaded model")]
    NotLoaded,

    #[error("airport {0:?} is not in the coordinate table")]
    UnknownAirport(String),

    #[error("invalid flight record: {0}")]
    InvalidInput(String),
}

impl PredictError {
    pub(crate) fn model_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ModelLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PredictError>;
