//! The orchestrator: owns the loaded artifacts and runs the pipeline
//! record -> feature vector -> normalized vector -> probability pair.
//!
//! Loaded artifacts live in an immutable snapshot. `forward` clones the
//! snapshot handle under a short read lock and computes without holding it;
//! `load` builds a complete new snapshot before swapping it in, so callers
//! never see a half-loaded model.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

use crate::airports::AirportTable;
use crate::artifacts::ArtifactPaths;
use crate::classifier::{LogisticRegression, ProbabilisticClassifier};
use crate::encoder::LabelEncoder;
use crate::error::{PredictError, Result};
use crate::features::{self, MissingCoordinates, FEATURE_COUNT};
use crate::scaler::MinMaxScaler;
use crate::types::{ProbabilityPair, RawFlightRecord};

/// Everything a prediction needs, fixed for the lifetime of one load.
pub struct LoadedModel {
    classifier: Box<dyn ProbabilisticClassifier>,
    encoder: LabelEncoder,
    scaler: MinMaxScaler,
    airports: AirportTable,
    model_name: String,
    loaded_at: DateTime<Utc>,
}

impl LoadedModel {
    /// Checks that scaler and classifier agree with the feature layout.
    pub fn new(
        model_name: impl Into<String>,
        classifier: Box<dyn ProbabilisticClassifier>,
        encoder: LabelEncoder,
        scaler: MinMaxScaler,
        airports: AirportTable,
    ) -> std::result::Result<Self, String> {
        if scaler.n_features() != FEATURE_COUNT {
            return Err(format!(
                "scaler fitted on {} features, pipeline produces {}",
                scaler.n_features(),
                FEATURE_COUNT
            ));
        }
        if classifier.n_features() != scaler.n_features() {
            return Err(format!(
                "classifier expects {} features, scaler produces {}",
                classifier.n_features(),
                scaler.n_features()
            ));
        }
        Ok(Self {
            classifier,
            encoder,
            scaler,
            airports,
            model_name: model_name.into(),
            loaded_at: Utc::now(),
        })
    }

    fn from_paths(paths: &ArtifactPaths) -> Result<Self> {
        let classifier = LogisticRegression::load(&paths.classifier)?;
        let encoder = LabelEncoder::load(&paths.encoder)?;
        let scaler = MinMaxScaler::load(&paths.scaler)?;
        let airports = AirportTable::load(&paths.airports)?;

        let model_name = paths
            .classifier
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| paths.classifier.display().to_string());

        Self::new(model_name, Box::new(classifier), encoder, scaler, airports)
            .map_err(|reason| PredictError::model_load(&paths.classifier, reason))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictorStatus {
    pub loaded: bool,
    pub model_name: Option<String>,
    pub classifier: Option<String>,
    pub n_features: usize,
    pub carriers: usize,
    pub airports: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}

pub struct Predictor {
    model: RwLock<Option<Arc<LoadedModel>>>,
    missing: MissingCoordinates,
}

impl Predictor {
    /// Starts out unloaded; `forward` fails with `NotLoaded` until `load`
    /// or `install` succeeds.
    pub fn new(missing: MissingCoordinates) -> Self {
        Self {
            model: RwLock::new(None),
            missing,
        }
    }

    /// Reads all artifacts and swaps them in. On error the previous
    /// snapshot (if any) stays in place.
    pub fn load(&self, paths: &ArtifactPaths) -> Result<()> {
        let loaded = LoadedModel::from_paths(paths)?;
        tracing::info!(
            "loaded model {} ({}): {} carriers, {} airports, {} features",
            loaded.model_name,
            loaded.classifier.name(),
            loaded.encoder.classes().len(),
            loaded.airports.len(),
            loaded.scaler.n_features()
        );
        self.install(loaded);
        Ok(())
    }

    pub fn install(&self, loaded: LoadedModel) {
        *self.model.write() = Some(Arc::new(loaded));
    }

    pub fn is_loaded(&self) -> bool {
        self.model.read().is_some()
    }

    fn snapshot(&self) -> Result<Arc<LoadedModel>> {
        self.model.read().clone().ok_or(PredictError::NotLoaded)
    }

    pub fn forward(&self, record: &RawFlightRecord) -> Result<ProbabilityPair> {
        let m = self.snapshot()?;
        let raw = features::build(record, &m.airports, &m.encoder, self.missing)?;
        tracing::debug!("data point = {:?}", raw.as_slice());
        let scaled = m.scaler.normalize(raw.as_slice())?;
        m.classifier.predict_proba(scaled.as_slice())
    }

    /// Runs the scaler and classifier once on an all-zero vector.
    pub fn warmup(&self) -> Result<ProbabilityPair> {
        let m = self.snapshot()?;
        let scaled = m.scaler.normalize(&[0.0; FEATURE_COUNT])?;
        m.classifier.predict_proba(scaled.as_slice())
    }

    pub fn status(&self) -> PredictorStatus {
        match self.model.read().as_ref() {
            Some(m) => PredictorStatus {
                loaded: true,
                model_name: Some(m.model_name.clone()),
                classifier: Some(m.classifier.name().to_string()),
                n_features: m.scaler.n_features(),
                carriers: m.encoder.classes().len(),
                airports: m.airports.len(),
                loaded_at: Some(m.loaded_at),
            },
            None => PredictorStatus {
                loaded: false,
                model_name: None,
                classifier: None,
                n_features: FEATURE_COUNT,
                carriers: 0,
                airports: 0,
                loaded_at: None,
            },
        }
    }
}

impl Default for Predictor {
    fn default() -> Self {
        Self::new(MissingCoordinates::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{loaded_model, smoke_record};
    use std::path::Path;

    fn loaded_predictor(missing: MissingCoordinates) -> Predictor {
        let p = Predictor::new(missing);
        p.install(loaded_model());
        p
    }

    #[test]
    fn forward_before_load_is_not_loaded() {
        let p = Predictor::default();
        assert!(!p.is_loaded());
        for _ in 0..100 {
            assert!(matches!(
                p.forward(&smoke_record()),
                Err(PredictError::NotLoaded)
            ));
        }
        assert!(matches!(p.warmup(), Err(PredictError::NotLoaded)));
        assert!(!p.status().loaded);
    }

    #[test]
    fn smoke_record_yields_valid_pair() {
        let p = loaded_predictor(MissingCoordinates::default());
        let pair = p.forward(&smoke_record()).unwrap();
        assert!((0.0..=1.0).contains(&pair.delayed));
        assert!((0.0..=1.0).contains(&pair.not_delayed));
        assert!((pair.delayed + pair.not_delayed - 1.0).abs() < 1e-6);
    }

    #[test]
    fn forward_is_deterministic() {
        let p = loaded_predictor(MissingCoordinates::default());
        let a = p.forward(&smoke_record()).unwrap();
        let b = p.forward(&smoke_record()).unwrap();
        assert_eq!(a.delayed.to_bits(), b.delayed.to_bits());
        assert_eq!(a.not_delayed.to_bits(), b.not_delayed.to_bits());
    }

    #[test]
    fn unknown_carrier_fails_without_touching_state() {
        let p = loaded_predictor(MissingCoordinates::default());
        let before = p.forward(&smoke_record()).unwrap();

        let mut r = smoke_record();
        r.carrier = "ZZ".into();
        assert!(matches!(p.forward(&r), Err(PredictError::UnknownCategory(_))));

        assert!(p.is_loaded());
        assert_eq!(p.forward(&smoke_record()).unwrap(), before);
    }

    #[test]
    fn unknown_airport_completes_with_sentinel_and_fails_with_reject() {
        let mut r = smoke_record();
        r.origin_airport = "XXX".into();

        let pair = loaded_predictor(MissingCoordinates::default())
            .forward(&r)
            .unwrap();
        assert!((pair.delayed + pair.not_delayed - 1.0).abs() < 1e-6);

        assert!(matches!(
            loaded_predictor(MissingCoordinates::Reject).forward(&r),
            Err(PredictError::UnknownAirport(_))
        ));
    }

    #[test]
    fn failed_reload_keeps_previous_model() {
        let p = loaded_predictor(MissingCoordinates::default());
        let before = p.forward(&smoke_record()).unwrap();

        let err = p
            .load(&ArtifactPaths::in_dir(Path::new("/no/such/dir"), "lr.json"))
            .unwrap_err();
        assert!(matches!(err, PredictError::ModelLoad { .. }));
        assert_eq!(p.forward(&smoke_record()).unwrap(), before);
    }

    #[test]
    fn width_mismatch_is_refused() {
        let scaler =
            MinMaxScaler::fit_params(vec![0.0; 12], vec![1.0; 12], (0.0, 1.0), false).unwrap();
        let short = LogisticRegression::new(vec![0.1; 11], 0.0).unwrap();
        let r = LoadedModel::new(
            "short",
            Box::new(short),
            crate::test_support::encoder(),
            scaler,
            crate::test_support::airports(),
        );
        assert!(r.is_err());
    }

    #[test]
    fn status_reports_loaded_model() {
        let s = loaded_predictor(MissingCoordinates::default()).status();
        assert!(s.loaded);
        assert_eq!(s.model_name.as_deref(), Some("test_model"));
        assert_eq!(s.classifier.as_deref(), Some("logistic_regression"));
        assert_eq!(s.n_features, FEATURE_COUNT);
        assert!(s.carriers > 0 && s.airports > 0);
        assert!(s.loaded_at.is_some());
    }

    #[test]
    fn concurrent_forward_calls_agree() {
        let p = Arc::new(loaded_predictor(MissingCoordinates::default()));
        let expected = p.forward(&smoke_record()).unwrap();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let p = Arc::clone(&p);
                std::thread::spawn(move || p.forward(&smoke_record()).unwrap())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    }
}
