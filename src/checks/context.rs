use super::result::CheckResult;
use crate::config::EvalConfig;
use crate::model::{Model, PredictError, RequiredFeatures};
use crate::store::{Dataset, Label};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Intermediate result inside a check: `Err` carries the final (skip or fail)
/// result so checks can bail out with `?`.
pub type Step<T> = Result<T, CheckResult>;

/// Read-only inputs shared by every check in a run.
pub struct CheckContext<'a> {
    pub model: &'a dyn Model,
    pub dataset: &'a Dataset,
    pub config: &'a EvalConfig,
    required: RequiredFeatures,
}

impl<'a> CheckContext<'a> {
    pub fn new(model: &'a dyn Model, dataset: &'a Dataset, config: &'a EvalConfig) -> Self {
        let required = RequiredFeatures::resolve(model, &config.fallback_features);
        Self { model, dataset, config, required }
    }

    pub fn required_features(&self) -> &RequiredFeatures {
        &self.required
    }

    /// The dataset without its label column, projected onto the required
    /// features. Skips when any required column is absent.
    pub fn feature_frame(&self, check: &str) -> Step<Dataset> {
        let features = self.dataset.without(&self.config.label_column);
        let missing = features.missing_columns(self.required.names());
        if !missing.is_empty() {
            return Err(CheckResult::skip(
                check,
                format!("Required features missing from dataset: {:?}", missing),
            ));
        }
        features
            .select(self.required.names())
            .map_err(|e| CheckResult::fail(check, format!("Could not build feature frame: {}", e)))
    }

    /// Calls the model, converting errors, panics and wrongly sized output
    /// into a failed result for `check`.
    pub fn predict(&self, check: &str, rows: &Dataset) -> Step<Vec<Label>> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.model.predict(rows)));
        let labels = match outcome {
            Ok(Ok(labels)) => labels,
            Ok(Err(err)) => {
                log::warn!("{}: predict failed: {}", check, err);
                return Err(CheckResult::fail(check, format!("Prediction raised an error: {}", err)));
            }
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                log::warn!("{}: model panicked: {}", check, msg);
                return Err(CheckResult::fail(check, format!("Prediction panicked: {}", msg)));
            }
        };
        if labels.len() != rows.n_rows() {
            let err = PredictError::OutputLength { expected: rows.n_rows(), found: labels.len() };
            return Err(CheckResult::fail(check, err.to_string()));
        }
        Ok(labels)
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
