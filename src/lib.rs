//! Flight delay prediction: encodes a flight record into a feature vector,
//! scales it with fitted min-max parameters and scores it with a fitted
//! logistic regression.

pub mod airports;
pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod encoder;
pub mod error;
pub mod features;
pub mod form;
pub mod predictor;
pub mod scaler;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{PredictError, Result};
pub use features::{MissingCoordinates, FEATURE_COUNT, FEATURE_LAYOUT};
pub use predictor::{Predictor, PredictorStatus};
pub use types::{FeatureVector, ProbabilityPair, RawFlightRecord};
