//! Feature layout and the builder that turns a flight record into model input.
//!
//! [`FEATURE_LAYOUT`] is the authoritative column order. The fitted scaler
//! and classifier artifacts declare the columns they were trained on and are
//! refused at load time if they disagree with it.

use std::str::FromStr;

use crate::airports::AirportTable;
use crate::encoder::LabelEncoder;
use crate::error::{PredictError, Result};
use crate::types::{Coordinate, FeatureVector, RawFlightRecord};

pub const FEATURE_LAYOUT: &[&str] = &[
    "month",        // 0
    "day_of_month", // 1
    "day_of_week",  // 2
    "dep_time",     // 3
    "arr_time",     // 4
    "carrier_id",   // 5
    "elapsed_time", // 6
    "distance",     // 7
    "origin_lat",   // 8
    "origin_long",  // 9
    "dest_lat",     // 10
    "dest_long",    // 11
];

pub const FEATURE_COUNT: usize = 12;

/// What to put in the coordinate slots when an airport is not in the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MissingCoordinates {
    /// Write this value into both the latitude and longitude slots.
    Sentinel(f64),
    /// Fail the prediction with `PredictError::UnknownAirport`.
    Reject,
}

impl Default for MissingCoordinates {
    fn default() -> Self {
        Self::Sentinel(0.0)
    }
}

impl FromStr for MissingCoordinates {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("reject") {
            return Ok(Self::Reject);
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Self::Sentinel(v)),
            _ => Err(format!(
                "expected \"reject\" or a finite number for missing coordinates, got {s:?}"
            )),
        }
    }
}

impl MissingCoordinates {
    fn resolve(&self, code: &str, found: Option<Coordinate>) -> Result<(f64, f64)> {
        match (found, self) {
            (Some(c), _) => Ok((c.lat, c.long)),
            (None, Self::Sentinel(v)) => Ok((*v, *v)),
            (None, Self::Reject) => Err(PredictError::UnknownAirport(code.to_string())),
        }
    }
}

/// Assembles the 12-slot vector. Numeric fields are copied as-is; only the
/// carrier and the two airports go through a lookup.
pub fn build(
    record: &RawFlightRecord,
    airports: &AirportTable,
    encoder: &LabelEncoder,
    missing: MissingCoordinates,
) -> Result<FeatureVector> {
    let carrier_id = encoder.encode(&record.carrier)?;
    let (origin_lat, origin_long) =
        missing.resolve(&record.origin_airport, airports.lookup(&record.origin_airport))?;
    let (dest_lat, dest_long) =
        missing.resolve(&record.dest_airport, airports.lookup(&record.dest_airport))?;

    let values = vec![
        f64::from(record.month),
        f64::from(record.day_of_month),
        f64::from(record.day_of_week),
        f64::from(record.dep_time),
        f64::from(record.arr_time),
        f64::from(carrier_id),
        record.elapsed_time,
        record.distance,
        origin_lat,
        origin_long,
        dest_lat,
        dest_long,
    ];
    debug_assert_eq!(values.len(), FEATURE_COUNT);
    Ok(FeatureVector::new(values))
}
