//! Simulator configuration.
//!
//! Values come from three layers, highest precedence first:
//! 1. Environment variables (`QOMP_BACKEND`, `QOMP_SHOTS`, `QOMP_SEED`,
//!    `QOMP_MAX_QUBITS`)
//! 2. A YAML configuration file
//! 3. Default values

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::BackendKind;
use crate::error::{HalError, HalResult};

/// Largest register a configuration may allow.
pub const MAX_CONFIGURABLE_QUBITS: u32 = 24;

/// Settings a builder picks up when constructed from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Backend name, resolved with [`BackendKind::from_str`](std::str::FromStr).
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Shots used by `run` when the caller does not give a count.
    #[serde(default = "default_shots")]
    pub default_shots: u32,

    /// Seed for the runner's random source; OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Largest register a builder will allocate.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,
}

fn default_backend() -> String {
    BackendKind::StateVector.name().to_string()
}

fn default_shots() -> u32 {
    1
}

fn default_max_qubits() -> u32 {
    20
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            default_shots: default_shots(),
            seed: None,
            max_qubits: default_max_qubits(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> HalResult<Self> {
        let config: SimConfig = serde_yaml_ng::from_str(yaml)
            .map_err(|e| HalError::Configuration(format!("invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> HalResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            HalError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Defaults, then `config_file` if given, then the environment.
    pub fn load(config_file: Option<&Path>) -> HalResult<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        debug!(
            "Loaded simulator config: backend={}, shots={}, max_qubits={}",
            config.backend, config.default_shots, config.max_qubits
        );
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its
    /// value. Set variables that fail to parse are errors.
    pub fn merge_env_with<F>(mut self, lookup: F) -> HalResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("QOMP_BACKEND") {
            self.backend = v;
        }
        if let Some(v) = lookup("QOMP_SHOTS") {
            self.default_shots = parse_var("QOMP_SHOTS", &v)?;
        }
        if let Some(v) = lookup("QOMP_SEED") {
            self.seed = Some(parse_var("QOMP_SEED", &v)?);
        }
        if let Some(v) = lookup("QOMP_MAX_QUBITS") {
            self.max_qubits = parse_var("QOMP_MAX_QUBITS", &v)?;
        }
        Ok(self)
    }

    /// Resolve the backend name.
    pub fn backend_kind(&self) -> HalResult<BackendKind> {
        self.backend.parse()
    }

    /// Check every field.
    pub fn validate(&self) -> HalResult<()> {
        self.backend_kind()?;
        if self.default_shots == 0 {
            return Err(HalError::Configuration(
                "default_shots must be at least 1".into(),
            ));
        }
        if !(1..=MAX_CONFIGURABLE_QUBITS).contains(&self.max_qubits) {
            return Err(HalError::Configuration(format!(
                "max_qubits must be in 1..={MAX_CONFIGURABLE_QUBITS}, got {}",
                self.max_qubits
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> HalResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| HalError::Configuration(format!("{key}={value:?} is not a valid value")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SimConfig::default();
        assert_eq!(config.backend_kind().unwrap(), BackendKind::StateVector);
        assert_eq!(config.default_shots, 1);
        assert_eq!(config.seed, None);
        assert_eq!(config.max_qubits, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_fills_missing_fields() {
        let config = SimConfig::from_yaml_str("backend: stabilizer\nseed: 7\n").unwrap();
        assert_eq!(config.backend_kind().unwrap(), BackendKind::Stabilizer);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.default_shots, 1);
    }

    #[test]
    fn test_env_overrides_file() {
        let config = SimConfig::from_yaml_str("backend: stabilizer\ndefault_shots: 5\n")
            .unwrap()
            .merge_env_with(env(&[("QOMP_BACKEND", "state_vector"), ("QOMP_SEED", "42")]))
            .unwrap();
        assert_eq!(config.backend_kind().unwrap(), BackendKind::StateVector);
        assert_eq!(config.default_shots, 5);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            SimConfig::from_yaml_str("max_qubits: 30\n"),
            Err(HalError::Configuration(_))
        ));
        assert!(matches!(
            SimConfig::from_yaml_str("default_shots: 0\n"),
            Err(HalError::Configuration(_))
        ));
        assert!(matches!(
            SimConfig::from_yaml_str("backend: photonic\n"),
            Err(HalError::BackendNotSupported(_))
        ));
        assert!(matches!(
            SimConfig::from_yaml_str("max_qubits: [1, 2]\n"),
            Err(HalError::Configuration(_))
        ));
        assert!(matches!(
            SimConfig::default().merge_env_with(env(&[("QOMP_SHOTS", "many")])),
            Err(HalError::Configuration(_))
        ));
    }
}
