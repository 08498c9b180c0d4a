//! Conversion of the web form submission into a `RawFlightRecord`.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::Deserialize;

use crate::error::{PredictError, Result};
use crate::types::RawFlightRecord;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Fields as the browser posts them: date `YYYY-MM-DD`, times `HH:MM`.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightForm {
    pub airline: String,
    pub date: String,
    pub dep_time: String,
    pub arr_time: String,
    pub origin_airport: String,
    pub dest_airport: String,
    pub distance: String,
}

impl FlightForm {
    /// Derives month, day of month and weekday from the date, hhmm integers
    /// and the scheduled duration from the two clock times, then validates
    /// the result. An arrival earlier than departure is an overnight flight.
    pub fn into_record(self) -> Result<RawFlightRecord> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|e| bad(format!("date {:?}: {e}", self.date)))?;
        let dep = parse_clock("dep_time", &self.dep_time)?;
        let arr = parse_clock("arr_time", &self.arr_time)?;

        let dep_total = dep.hour() * 60 + dep.minute();
        let arr_total = arr.hour() * 60 + arr.minute();
        let elapsed = if arr_total >= dep_total {
            arr_total - dep_total
        } else {
            arr_total + MINUTES_PER_DAY - dep_total
        };

        let distance: f64 = self
            .distance
            .trim()
            .parse()
            .map_err(|_| bad(format!("distance {:?} is not a number", self.distance)))?;

        let mut record = RawFlightRecord {
            month: date.month() as u8,
            day_of_month: date.day() as u8,
            day_of_week: date.weekday().num_days_from_monday() as u8,
            dep_time: hhmm(dep),
            arr_time: hhmm(arr),
            carrier: self.airline,
            elapsed_time: f64::from(elapsed),
            distance,
            origin_airport: self.origin_airport,
            dest_airport: self.dest_airport,
        };
        record.normalize_codes();
        record.validate()?;
        Ok(record)
    }
}

fn parse_clock(field: &str, s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|e| bad(format!("{field} {s:?} is not HH:MM: {e}")))
}

fn hhmm(t: NaiveTime) -> u16 {
    (t.hour() * 100 + t.minute()) as u16
}

fn bad(msg: String) -> PredictError {
    PredictError::InvalidInput(msg)
}
