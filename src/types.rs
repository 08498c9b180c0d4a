use serde::{Deserialize, Serialize};

use crate::error::{PredictError, Result};

/// One flight as the pipeline sees it. Times are hhmm integers (e.g. 1955).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFlightRecord {
    pub month: u8,
    pub day_of_month: u8,
    pub day_of_week: u8, // 0 = Monday
    pub dep_time: u16,
    pub arr_time: u16,
    pub carrier: String,
    pub elapsed_time: f64, // minutes
    pub distance: f64,
    pub origin_airport: String,
    pub dest_airport: String,
}

impl RawFlightRecord {
    /// Trims and upper-cases the carrier and airport codes so lookups match
    /// the fitted vocabulary and the reference table keys.
    pub fn normalize_codes(&mut self) {
        for code in [
            &mut self.carrier,
            &mut self.origin_airport,
            &mut self.dest_airport,
        ] {
            *code = code.trim().to_ascii_uppercase();
        }
    }

    /// Range checks applied at the input boundary. The pipeline itself
    /// trusts whatever record it is handed.
    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.month) {
            return Err(invalid(format!("month {} outside 1..=12", self.month)));
        }
        if !(1..=31).contains(&self.day_of_month) {
            return Err(invalid(format!(
                "day_of_month {} outside 1..=31",
                self.day_of_month
            )));
        }
        if self.day_of_week > 6 {
            return Err(invalid(format!(
                "day_of_week {} outside 0..=6",
                self.day_of_week
            )));
        }
        for (name, t) in [("dep_time", self.dep_time), ("arr_time", self.arr_time)] {
            if t > 2400 || t % 100 > 59 {
                return Err(invalid(format!("{name} {t} is not a valid hhmm time")));
            }
        }
        if !self.elapsed_time.is_finite() || self.elapsed_time < 0.0 {
            return Err(invalid(format!(
                "elapsed_time {} must be a non-negative number",
                self.elapsed_time
            )));
        }
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(invalid(format!(
                "distance {} must be a non-negative number",
                self.distance
            )));
        }
        for (name, code) in [
            ("carrier", &self.carrier),
            ("origin_airport", &self.origin_airport),
            ("dest_airport", &self.dest_airport),
        ] {
            if code.trim().is_empty() {
                return Err(invalid(format!("{name} is empty")));
            }
        }
        Ok(())
    }
}

fn invalid(msg: String) -> PredictError {
    PredictError::InvalidInput(msg)
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub long: f64,
}

/// Ordered model input; see `features::FEATURE_LAYOUT` for the slot names.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Classifier output ordered (not delayed, delayed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityPair {
    pub not_delayed: f64,
    pub delayed: f64,
}

impl ProbabilityPair {
    /// Builds the pair from the positive-class probability so the two
    /// components always sum to one.
    pub fn from_delayed(delayed: f64) -> Self {
        let delayed = delayed.clamp(0.0, 1.0);
        Self {
            not_delayed: 1.0 - delayed,
            delayed,
        }
    }

    /// Delay probability as a percentage rounded to one decimal, the way the
    /// web form reports it.
    pub fn delayed_percent(&self) -> String {
        format!("{:.1}", self.delayed * 100.0)
    }
}
