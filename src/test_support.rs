//! In-memory fixtures shared by the unit tests.

use std::collections::HashMap;

use crate::airports::AirportTable;
use crate::classifier::LogisticRegression;
use crate::encoder::LabelEncoder;
use crate::predictor::LoadedModel;
use crate::scaler::MinMaxScaler;
use crate::types::{Coordinate, RawFlightRecord};

pub(crate) fn smoke_record() -> RawFlightRecord {
    RawFlightRecord {
        month: 1,
        day_of_month: 3,
        day_of_week: 3,
        dep_time: 1955,
        arr_time: 2215,
        carrier: "CO".into(),
        elapsed_time: 150.0,
        distance: 810.0,
        origin_airport: "IAD".into(),
        dest_airport: "TPA".into(),
    }
}

pub(crate) fn encoder() -> LabelEncoder {
    LabelEncoder::from_classes(
        ["AA", "CO", "DL", "UA", "WN"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    )
    .unwrap()
}

pub(crate) fn airports() -> AirportTable {
    let entries = [
        ("IAD", 38.9445, -77.4558),
        ("TPA", 27.9755, -82.5332),
        ("ORD", 41.9786, -87.9048),
    ];
    AirportTable::from_map(HashMap::from(entries.map(|(code, lat, long)| {
        (code.to_string(), Coordinate { lat, long })
    })))
}

pub(crate) fn loaded_model() -> LoadedModel {
    let scaler = MinMaxScaler::fit_params(
        vec![1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 15.0, 31.0, 17.7, -176.6, 17.7, -176.6],
        vec![12.0, 31.0, 6.0, 2400.0, 2400.0, 4.0, 700.0, 4983.0, 71.3, -64.8, 71.3, -64.8],
        (0.0, 1.0),
        false,
    )
    .unwrap();
    let classifier = LogisticRegression::new(
        vec![0.08, 0.02, -0.05, 0.9, 0.6, 0.1, 0.3, -0.2, 0.15, 0.05, -0.1, 0.12],
        -1.4,
    )
    .unwrap();
    LoadedModel::new(
        "test_model",
        Box::new(classifier),
        encoder(),
        scaler,
        airports(),
    )
    .unwrap()
}
