use serde::Deserialize;
use std::path::Path;

use crate::artifacts::{check_format_version, read_json};
use crate::error::{PredictError, Result};

#[derive(Deserialize)]
struct EncoderJson {
    format_version: u32,
    classes: Vec<String>,
}

/// Fitted label encoder for carrier codes. `classes` is sorted and unique,
/// so a code's id is its position in the vocabulary.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn load(path: &Path) -> Result<Self> {
        let raw: EncoderJson = read_json(path)?;
        check_format_version(path, raw.format_version)?;
        Self::from_classes(raw.classes).map_err(|reason| PredictError::model_load(path, reason))
    }

    pub fn from_classes(classes: Vec<String>) -> std::result::Result<Self, String> {
        if classes.is_empty() {
            return Err("empty vocabulary".into());
        }
        if let Some(w) = classes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(format!(
                "vocabulary must be sorted and unique, found {:?} before {:?}",
                w[0], w[1]
            ));
        }
        Ok(Self { classes })
    }

    pub fn encode(&self, carrier: &str) -> Result<u32> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(carrier))
            .map(|i| i as u32)
            .map_err(|_| PredictError::UnknownCategory(carrier.to_string()))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}
