use ndarray::{Array1, ArrayView1, Zip};
use serde::Deserialize;
use std::path::Path;

use crate::artifacts::{check_feature_names, check_format_version, read_json};
use crate::error::{PredictError, Result};
use crate::features::FEATURE_LAYOUT;
use crate::types::FeatureVector;

#[derive(Deserialize)]
struct ScalerJson {
    format_version: u32,
    feature_names: Vec<String>,
    data_min: Vec<f64>,
    data_max: Vec<f64>,
    #[serde(default = "unit_range")]
    feature_range: (f64, f64),
    #[serde(default)]
    clip: bool,
}

fn unit_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Per-feature min-max scaling with parameters captured at training time.
///
/// `out = (x - data_min) * scale + lo`, where
/// `scale = (hi - lo) / (data_max - data_min)`. Constant features (zero
/// range) use a scale of 1 so they map to `lo` instead of dividing by zero.
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    data_min: Array1<f64>,
    scale: Array1<f64>,
    range: (f64, f64),
    clip: bool,
}

impl MinMaxScaler {
    pub fn load(path: &Path) -> Result<Self> {
        let raw: ScalerJson = read_json(path)?;
        check_format_version(path, raw.format_version)?;
        check_feature_names(path, &raw.feature_names, FEATURE_LAYOUT)?;
        Self::fit_params(raw.data_min, raw.data_max, raw.feature_range, raw.clip)
            .map_err(|reason| PredictError::model_load(path, reason))
    }

    pub fn fit_params(
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        feature_range: (f64, f64),
        clip: bool,
    ) -> std::result::Result<Self, String> {
        if data_min.len() != data_max.len() {
            return Err(format!(
                "data_min has {} values but data_max has {}",
                data_min.len(),
                data_max.len()
            ));
        }
        let (lo, hi) = feature_range;
        if lo.is_nan() || hi.is_nan() || lo >= hi {
            return Err(format!("feature_range ({lo}, {hi}) is empty"));
        }
        if data_min.iter().chain(&data_max).any(|v| !v.is_finite()) {
            return Err("scaler parameters must be finite".into());
        }

        let data_min = Array1::from(data_min);
        let data_max = Array1::from(data_max);
        let scale = Zip::from(&data_min)
            .and(&data_max)
            .map_collect(|&mn, &mx| {
                let span = mx - mn;
                if span == 0.0 {
                    1.0
                } else {
                    (hi - lo) / span
                }
            });

        Ok(Self {
            data_min,
            scale,
            range: feature_range,
            clip,
        })
    }

    pub fn n_features(&self) -> usize {
        self.data_min.len()
    }

    pub fn normalize(&self, x: &[f64]) -> Result<FeatureVector> {
        if x.len() != self.n_features() {
            return Err(PredictError::ShapeMismatch {
                expected: self.n_features(),
                got: x.len(),
            });
        }
        let (lo, hi) = self.range;
        let mut out = (&ArrayView1::from(x) - &self.data_min) * &self.scale + lo;
        if self.clip {
            out.mapv_inplace(|v| v.clamp(lo, hi));
        }
        Ok(FeatureVector::new(out.to_vec()))
    }
}
