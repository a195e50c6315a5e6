//! Categorical-anomaly tolerance: unseen categories and out-of-range ordinals.
use super::outliers::apply_injections;
use crate::checks::{Check, CheckContext, CheckResult, Step};
use crate::config::CellInjection;

pub const NAME: &str = "categorical_anomalies";

pub struct CategoricalAnomalies {
    injections: Vec<CellInjection>,
}

impl CategoricalAnomalies {
    pub fn new(injections: Vec<CellInjection>) -> Self {
        Self { injections }
    }

    fn probe(&self, ctx: &CheckContext<'_>) -> Step<CheckResult> {
        let mut frame = ctx.feature_frame(NAME)?;
        let applied = apply_injections(&mut frame, &self.injections);
        if applied.is_empty() {
            return Err(CheckResult::skip(NAME, "No categorical or ordinal feature to perturb"));
        }
        ctx.predict(NAME, &frame)?;
        Ok(CheckResult::pass(NAME, format!("Predicted {} rows with anomalies in {:?}", frame.n_rows(), applied))
            .measured(applied.len() as f64))
    }
}

impl Check for CategoricalAnomalies {
    fn name(&self) -> &'static str {
        NAME
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckResult {
        self.probe(ctx).unwrap_or_else(|r| r)
    }
}
