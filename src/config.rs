use anyhow::{Context, Result};
use std::{net::SocketAddr, path::PathBuf};

use crate::artifacts::{ArtifactPaths, DEFAULT_MODEL_NAME};
use crate::features::MissingCoordinates;

pub const DEFAULT_PORT: u16 = 3030;

/// Service settings, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub artifact_dir: PathBuf,
    pub model_name: String,
    pub bind_addr: String,
    pub port: u16,
    pub log_predictions: bool,
    pub missing_coords: MissingCoordinates,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `get` returns the raw value for a variable name, `None` when unset.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match get("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .with_context(|| format!("PORT {p:?} is not a valid port"))?,
            None => DEFAULT_PORT,
        };
        let missing_coords = match get("MISSING_COORDS") {
            Some(v) => v
                .parse::<MissingCoordinates>()
                .map_err(anyhow::Error::msg)
                .context("invalid MISSING_COORDS")?,
            None => MissingCoordinates::default(),
        };

        Ok(Self {
            artifact_dir: get("ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("artifacts")),
            model_name: get("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            log_predictions: get("LOG_PRED").as_deref() == Some("1"),
            missing_coords,
        })
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::in_dir(&self.artifact_dir, &self.model_name)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.bind_addr, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let c = cfg(&[]).unwrap();
        assert_eq!(c.artifact_dir, PathBuf::from("artifacts"));
        assert_eq!(c.model_name, "logistic_regression.json");
        assert_eq!(c.port, 3030);
        assert!(!c.log_predictions);
        assert_eq!(c.missing_coords, MissingCoordinates::Sentinel(0.0));
        assert_eq!(c.socket_addr().unwrap().to_string(), "0.0.0.0:3030");
        assert_eq!(
            c.artifact_paths().classifier,
            PathBuf::from("artifacts/logistic_regression.json")
        );
    }

    #[test]
    fn overrides() {
        let c = cfg(&[
            ("ARTIFACT_DIR", "/srv/models"),
            ("MODEL_NAME", "lr_v2.json"),
            ("PORT", "8080"),
            ("BIND_ADDR", "127.0.0.1"),
            ("LOG_PRED", "1"),
            ("MISSING_COORDS", "reject"),
        ])
        .unwrap();
        assert_eq!(c.artifact_paths().classifier, PathBuf::from("/srv/models/lr_v2.json"));
        assert_eq!(c.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert!(c.log_predictions);
        assert_eq!(c.missing_coords, MissingCoordinates::Reject);
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(cfg(&[("PORT", "eighty")]).is_err());
        assert!(cfg(&[("MISSING_COORDS", "maybe")]).is_err());
        assert!(cfg(&[("BIND_ADDR", "not an ip")]).unwrap().socket_addr().is_err());
    }
}
