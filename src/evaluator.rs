//! Runs the check registry against one model and one dataset.
use crate::checks::{self, Check, CheckContext, CheckResult, Summary};
use crate::config::{ConfigError, EvalConfig};
use crate::model::Model;
use crate::store::Dataset;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// A fixed battery of independent checks.
///
/// Results come back in registry order whether the checks ran sequentially
/// or on the rayon pool.
pub struct RobustnessEvaluator {
    config: EvalConfig,
    checks: Vec<Box<dyn Check>>,
}

impl RobustnessEvaluator {
    /// The default eight-check battery. Rejects configs that fail
    /// [`EvalConfig::validate`].
    pub fn new(config: EvalConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let checks = checks::default_checks(&config);
        Ok(Self { config, checks })
    }

    pub fn with_checks(config: EvalConfig, checks: Vec<Box<dyn Check>>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, checks })
    }

    pub fn register(&mut self, check: Box<dyn Check>) -> &mut Self {
        self.checks.push(check);
        self
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn evaluate(&self, model: &dyn Model, dataset: &Dataset) -> Vec<CheckResult> {
        let selected: Vec<&dyn Check> = self.checks.iter().map(|c| &**c).collect();
        self.run_selected(model, dataset, &selected)
    }

    /// Runs only the named checks. Unknown names are ignored.
    pub fn evaluate_only(&self, model: &dyn Model, dataset: &Dataset, names: &[&str]) -> Vec<CheckResult> {
        let selected: Vec<&dyn Check> = self
            .checks
            .iter()
            .filter(|c| names.contains(&c.name()))
            .map(|c| &**c)
            .collect();
        self.run_selected(model, dataset, &selected)
    }

    fn run_selected(&self, model: &dyn Model, dataset: &Dataset, selected: &[&dyn Check]) -> Vec<CheckResult> {
        let ctx = CheckContext::new(model, dataset, &self.config);
        log::info!(
            "Evaluating {} checks on {} rows x {} columns (required features: {:?})",
            selected.len(),
            dataset.n_rows(),
            dataset.n_columns(),
            ctx.required_features().names()
        );

        let results: Vec<CheckResult> = if self.config.parallel {
            selected.par_iter().map(|check| run_isolated(*check, &ctx)).collect()
        } else {
            selected.iter().map(|check| run_isolated(*check, &ctx)).collect()
        };

        let summary = Summary::of(&results);
        log::info!(
            "Evaluation finished: {} passed, {} failed, {} skipped",
            summary.passed,
            summary.failed,
            summary.skipped
        );
        results
    }
}

/// Runs one check, turning a panic into a failed result.
fn run_isolated(check: &dyn Check, ctx: &CheckContext<'_>) -> CheckResult {
    let start = Instant::now();
    let result = match panic::catch_unwind(AssertUnwindSafe(|| check.run(ctx))) {
        Ok(result) => result,
        Err(payload) => {
            let msg = checks::panic_message(payload.as_ref());
            log::warn!("{}: check panicked: {}", check.name(), msg);
            CheckResult::fail(check.name(), format!("Check panicked: {}", msg))
        }
    };
    log::debug!("{}: {} in {:?} ({})", result.name, result.status, start.elapsed(), result.message);
    result
}
