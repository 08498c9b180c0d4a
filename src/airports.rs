use std::{collections::HashMap, path::Path};

use crate::artifacts::read_json;
use crate::error::Result;
use crate::types::Coordinate;

/// Airport code -> coordinate reference table, read once and kept in memory.
#[derive(Debug, Clone, Default)]
pub struct AirportTable {
    coords: HashMap<String, Coordinate>,
}

impl AirportTable {
    /// Reads a JSON object of the form `{"IAD": {"lat": .., "long": ..}, ..}`.
    pub fn load(path: &Path) -> Result<Self> {
        let coords: HashMap<String, Coordinate> = read_json(path)?;
        Ok(Self { coords })
    }

    pub fn from_map(coords: HashMap<String, Coordinate>) -> Self {
        Self { coords }
    }

    /// Unknown codes are a soft miss: `None`, never an error.
    pub fn lookup(&self, code: &str) -> Option<Coordinate> {
        self.coords.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredictError;

    #[test]
    fn lookup_hit_and_soft_miss() {
        let table = AirportTable::from_map(HashMap::from([(
            "IAD".to_string(),
            Coordinate {
                lat: 38.94,
                long: -77.46,
            },
        )]));

        let c = table.lookup("IAD").unwrap();
        assert_eq!(c.lat, 38.94);
        assert_eq!(c.long, -77.46);
        assert_eq!(table.lookup("XXX"), None);
        assert_eq!(table.lookup("iad"), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn parses_reference_table_format() {
        let coords: HashMap<String, Coordinate> =
            serde_json::from_str(r#"{"TPA": {"lat": 27.98, "long": -82.53}}"#).unwrap();
        let table = AirportTable::from_map(coords);
        assert_eq!(table.lookup("TPA").map(|c| c.long), Some(-82.53));
    }

    #[test]
    fn missing_table_fails_to_load() {
        let err = AirportTable::load(Path::new("/no/such/airports.json")).unwrap_err();
        assert!(matches!(err, PredictError::ModelLoad { .. }));
    }
}
