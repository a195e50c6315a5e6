//! The boundary between the evaluator and a trained classifier.
//!
//! A model is opaque: the evaluator only ever calls `predict` and the two
//! capability queries, and never mutates it.
pub mod linear;

use crate::store::{Dataset, Label};
use thiserror::Error;

pub use self::linear::LinearModel;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error("Missing feature column '{0}'")]
    MissingFeature(String),
    #[error("Model backend error: {0}")]
    Backend(String),
    #[error("Model returned {found} predictions for {expected} rows")]
    OutputLength { expected: usize, found: usize },
}

/// A trained classifier exposing a batch `predict` over tabular rows.
///
/// Implementations must be safe to call from several checks at once.
pub trait Model: Send + Sync {
    fn predict(&self, rows: &Dataset) -> Result<Vec<Label>, PredictError>;

    /// Ordered input columns the model was fitted on, if it records them.
    fn feature_names(&self) -> Option<Vec<String>> {
        None
    }

    /// Per-feature importances, if this model family exposes them.
    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }
}

impl<M: Model + ?Sized> Model for &M {
    fn predict(&self, rows: &Dataset) -> Result<Vec<Label>, PredictError> {
        (**self).predict(rows)
    }
    fn feature_names(&self) -> Option<Vec<String>> {
        (**self).feature_names()
    }
    fn feature_importances(&self) -> Option<Vec<f64>> {
        (**self).feature_importances()
    }
}

impl<M: Model + ?Sized> Model for Box<M> {
    fn predict(&self, rows: &Dataset) -> Result<Vec<Label>, PredictError> {
        (**self).predict(rows)
    }
    fn feature_names(&self) -> Option<Vec<String>> {
        (**self).feature_names()
    }
    fn feature_importances(&self) -> Option<Vec<f64>> {
        (**self).feature_importances()
    }
}

/// Columns used when a model does not record its own feature names.
pub const DEFAULT_FEATURES: [&str; 7] = ["Pclass", "Sex", "Age", "Fare", "SibSp", "Parch", "Embarked"];

/// The ordered column set a model expects as input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredFeatures(pub Vec<String>);

impl RequiredFeatures {
    /// The model's own feature names when it reports any, otherwise `fallback`.
    pub fn resolve(model: &dyn Model, fallback: &[String]) -> Self {
        match model.feature_names() {
            Some(names) if !names.is_empty() => Self(names),
            _ => Self(fallback.to_vec()),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}
