//! Locations and on-disk format of the pre-fitted model artifacts.
//!
//! Each artifact is a JSON document holding the parameters captured at
//! training time. Documents carry a `format_version`; anything other than
//! [`FORMAT_VERSION`] is refused at load time.

use serde::de::DeserializeOwned;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{PredictError, Result};

pub const FORMAT_VERSION: u32 = 1;

pub const DEFAULT_MODEL_NAME: &str = "logistic_regression.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";
pub const SCALER_FILE: &str = "min_max_scaler.json";
pub const AIRPORTS_FILE: &str = "airport_lat_long.json";

/// Where `Predictor::load` reads its four artifacts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub encoder: PathBuf,
    pub scaler: PathBuf,
    pub airports: PathBuf,
}

impl ArtifactPaths {
    /// Standard layout: all artifacts side by side in `dir`, the classifier
    /// under `model_name`.
    pub fn in_dir(dir: impl AsRef<Path>, model_name: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            classifier: dir.join(model_name),
            encoder: dir.join(LABEL_ENCODER_FILE),
            scaler: dir.join(SCALER_FILE),
            airports: dir.join(AIRPORTS_FILE),
        }
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let txt = fs::read_to_string(path).map_err(|e| PredictError::model_load(path, e))?;
    serde_json::from_str(&txt).map_err(|e| PredictError::model_load(path, e))
}

pub(crate) fn check_format_version(path: &Path, found: u32) -> Result<()> {
    if found != FORMAT_VERSION {
        return Err(PredictError::model_load(
            path,
            format!("unsupported format_version {found}, expected {FORMAT_VERSION}"),
        ));
    }
    Ok(())
}

/// Artifacts fitted on a feature table must name its columns in the order
/// the builder emits them.
pub(crate) fn check_feature_names(path: &Path, names: &[String], expected: &[&str]) -> Result<()> {
    if names.len() != expected.len() || names.iter().zip(expected).any(|(a, b)| a != b) {
        return Err(PredictError::model_load(
            path,
            format!("feature layout {names:?} does not match {expected:?}"),
        ));
    }
    Ok(())
}
