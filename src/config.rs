//! Evaluation settings: thresholds, perturbation constants and column roles.
//!
//! Every field has a default, so a JSON document only needs to name what it
//! overrides. A handful of settings can also be overridden from the
//! environment with the `SURVIVAL_AUDIT_` prefix.
use crate::model::DEFAULT_FEATURES;
use crate::store::{Cell, Label};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid value for '{field}': {msg}")]
    Invalid { field: &'static str, msg: String },
    #[error("Environment variable {key}={value} is not valid")]
    Env { key: String, value: String },
}

/// Overwrite one cell before predicting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellInjection {
    pub column: String,
    pub row: usize,
    pub value: Cell,
}

impl CellInjection {
    pub fn new(column: &str, row: usize, value: impl Into<Cell>) -> Self {
        Self { column: column.to_string(), row, value: value.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// A single feature at or above this importance share fails.
    pub max_importance: f64,
    /// The majority label at or above this share fails.
    pub max_class_share: f64,
    /// Per-group bound on |actual rate - predicted rate|.
    pub group_gap: f64,
    /// Bound on |actual disparity - predicted disparity|.
    pub disparity_gap: f64,
    /// Prediction budget in seconds per 10,000 rows.
    pub seconds_per_10k: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_importance: 0.95,
            max_class_share: 0.99,
            group_gap: 0.20,
            disparity_gap: 0.15,
            seconds_per_10k: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub seed: u64,
    /// Per-cell probability of a missing-value injection.
    pub missing_rate: f64,
    pub batch_size: usize,
    /// How many copies of the feature frame the throughput check predicts.
    pub replication: usize,
    pub label_column: String,
    pub sensitive_column: String,
    pub positive_label: Label,
    pub fallback_features: Vec<String>,
    pub outliers: Vec<CellInjection>,
    pub categorical_anomalies: Vec<CellInjection>,
    pub thresholds: Thresholds,
    /// Run checks on the rayon pool.
    pub parallel: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            missing_rate: 0.1,
            batch_size: 10,
            replication: 10,
            label_column: "Survived".to_string(),
            sensitive_column: "Sex".to_string(),
            positive_label: 1,
            fallback_features: DEFAULT_FEATURES.iter().map(|s| s.to_string()).collect(),
            outliers: vec![CellInjection::new("Age", 0, 120.0), CellInjection::new("Fare", 1, 10_000.0)],
            categorical_anomalies: vec![
                CellInjection::new("Sex", 0, "unknown"),
                CellInjection::new("Pclass", 1, 10.0),
            ],
            thresholds: Thresholds::default(),
            parallel: false,
        }
    }
}

impl EvalConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Applies `SURVIVAL_AUDIT_*` overrides from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(std::env::vars())
    }

    /// Applies overrides from any `(key, value)` source. Unknown keys are ignored.
    pub fn with_overrides<I, K, V>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            let bad = || ConfigError::Env { key: key.to_string(), value: value.to_string() };
            match key {
                "SURVIVAL_AUDIT_SEED" => self.seed = value.parse().map_err(|_| bad())?,
                "SURVIVAL_AUDIT_BATCH_SIZE" => self.batch_size = value.parse().map_err(|_| bad())?,
                "SURVIVAL_AUDIT_PARALLEL" => {
                    self.parallel = match value {
                        "1" | "true" => true,
                        "0" | "false" => false,
                        _ => return Err(bad()),
                    }
                }
                "SURVIVAL_AUDIT_LABEL" => self.label_column = value.to_string(),
                "SURVIVAL_AUDIT_SENSITIVE" => self.sensitive_column = value.to_string(),
                _ => {}
            }
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, msg: &str| Err(ConfigError::Invalid { field, msg: msg.to_string() });
        if !(0.0..=1.0).contains(&self.missing_rate) {
            return invalid("missing_rate", "must be within [0, 1]");
        }
        if self.batch_size == 0 {
            return invalid("batch_size", "must be at least 1");
        }
        if self.replication == 0 {
            return invalid("replication", "must be at least 1");
        }
        let t = &self.thresholds;
        for (field, value) in [
            ("thresholds.max_importance", t.max_importance),
            ("thresholds.max_class_share", t.max_class_share),
            ("thresholds.group_gap", t.group_gap),
            ("thresholds.disparity_gap", t.disparity_gap),
            ("thresholds.seconds_per_10k", t.seconds_per_10k),
        ] {
            if !(value > 0.0) {
                return invalid(field, "must be positive");
            }
        }
        Ok(())
    }
}
