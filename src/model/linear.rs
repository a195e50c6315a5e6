//! A logistic scorer over numeric and one-hot categorical features.
//!
//! The model is described in JSON:
//!
//! ```json
//! {
//!   "intercept": -0.4,
//!   "threshold": 0.5,
//!   "features": [
//!     { "name": "Age", "kind": "numeric", "weight": -0.03, "impute": 28.0, "scale": 14.5 },
//!     { "name": "Sex", "kind": "categorical", "levels": { "female": 2.6 } }
//!   ]
//! }
//! ```
//!
//! It tolerates missing cells, unseen categories and stray text, which makes
//! it a convenient reference model for the robustness battery.
use super::{Model, PredictError};
use crate::store::{Cell, Dataset, Label};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSpec {
    Numeric {
        name: String,
        weight: f64,
        #[serde(default)]
        impute: f64,
        /// Typical spread of the raw values, used to size importances.
        #[serde(default = "one")]
        scale: f64,
    },
    Categorical {
        name: String,
        levels: BTreeMap<String, f64>,
    },
}

fn one() -> f64 {
    1.0
}

fn half() -> f64 {
    0.5
}

impl FeatureSpec {
    pub fn name(&self) -> &str {
        match self {
            FeatureSpec::Numeric { name, .. } | FeatureSpec::Categorical { name, .. } => name,
        }
    }

    fn contribution(&self, cell: &Cell) -> f64 {
        match self {
            FeatureSpec::Numeric { weight, impute, .. } => weight * cell.as_number().unwrap_or(*impute),
            FeatureSpec::Categorical { levels, .. } => cell
                .group_key()
                .and_then(|key| levels.get(&key).copied())
                .unwrap_or(0.0),
        }
    }

    fn raw_importance(&self) -> f64 {
        match self {
            FeatureSpec::Numeric { weight, scale, .. } => (weight * scale).abs(),
            FeatureSpec::Categorical { levels, .. } => {
                // Unseen levels score 0, so 0 is always part of the range.
                let (lo, hi) = levels
                    .values()
                    .fold((0.0_f64, 0.0_f64), |(lo, hi), &w| (lo.min(w), hi.max(w)));
                hi - lo
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub intercept: f64,
    #[serde(default = "half")]
    pub threshold: f64,
    pub features: Vec<FeatureSpec>,
}

impl LinearModel {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PredictError> {
        let text = std::fs::read_to_string(path).map_err(|e| PredictError::Backend(e.to_string()))?;
        Self::from_json_str(&text).map_err(|e| PredictError::Backend(e.to_string()))
    }

    /// Probability of the positive class for every row.
    pub fn predict_proba(&self, rows: &Dataset) -> Result<Vec<f64>, PredictError> {
        let mut scores = vec![self.intercept; rows.n_rows()];
        for spec in &self.features {
            let column = rows
                .column(spec.name())
                .ok_or_else(|| PredictError::MissingFeature(spec.name().to_string()))?;
            for (score, cell) in scores.iter_mut().zip(&column.cells) {
                *score += spec.contribution(cell);
            }
        }
        Ok(scores.into_iter().map(sigmoid).collect())
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Model for LinearModel {
    fn predict(&self, rows: &Dataset) -> Result<Vec<Label>, PredictError> {
        let proba = self.predict_proba(rows)?;
        Ok(proba.into_iter().map(|p| Label::from(p >= self.threshold)).collect())
    }

    fn feature_names(&self) -> Option<Vec<String>> {
        Some(self.features.iter().map(|f| f.name().to_string()).collect())
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        let raw: Vec<f64> = self.features.iter().map(FeatureSpec::raw_importance).collect();
        let total: f64 = raw.iter().sum();
        if total > 0.0 {
            Some(raw.into_iter().map(|r| r / total).collect())
        } else {
            Some(raw)
        }
    }
}
