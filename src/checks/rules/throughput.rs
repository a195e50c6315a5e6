//! Throughput under load: one predict call over a replicated frame.
use crate::analysis::stats::time_per_10k;
use crate::checks::{Check, CheckContext, CheckResult, Step};
use std::time::Instant;

pub const NAME: &str = "throughput";

pub struct Throughput {
    replication: usize,
    budget_secs: f64,
}

impl Throughput {
    pub fn new(replication: usize, budget_secs: f64) -> Self {
        Self { replication: replication.max(1), budget_secs }
    }

    fn probe(&self, ctx: &CheckContext<'_>) -> Step<CheckResult> {
        let frame = ctx.feature_frame(NAME)?;
        if frame.is_empty() {
            return Err(CheckResult::skip(NAME, "Dataset has no rows"));
        }
        let large = frame.repeat(self.replication);

        let start = Instant::now();
        ctx.predict(NAME, &large)?;
        let elapsed = start.elapsed();

        let per_10k = time_per_10k(elapsed, large.n_rows());
        log::debug!("{}: {} rows in {:?}", NAME, large.n_rows(), elapsed);
        Ok(CheckResult::verdict(
            NAME,
            per_10k < self.budget_secs,
            format!("{:.4}s per 10,000 rows over {} rows (budget {:.1}s)", per_10k, large.n_rows(), self.budget_secs),
        )
        .measured(per_10k))
    }
}

impl Check for Throughput {
    fn name(&self) -> &'static str {
        NAME
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckResult {
        self.probe(ctx).unwrap_or_else(|r| r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvalConfig;
    use crate::model::{Model, PredictError};
    use crate::store::{Cell, Column, Dataset, Label};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Sleeps a fixed time per call and records the batch sizes it saw.
    struct Sleepy {
        per_call: Duration,
        sizes: Mutex<Vec<usize>>,
    }

    impl Model for Sleepy {
        fn predict(&self, rows: &Dataset) -> Result<Vec<Label>, PredictError> {
            std::thread::sleep(self.per_call);
            self.sizes.lock().unwrap().push(rows.n_rows());
            Ok(vec![1; rows.n_rows()])
        }
        fn feature_names(&self) -> Option<Vec<String>> {
            Some(vec!["Age".into()])
        }
    }

    fn dataset(rows: usize) -> Dataset {
        Dataset::new(vec![Column::new("Age", vec![Cell::Number(1.0); rows])]).unwrap()
    }

    #[test]
    fn test_fast_model_passes_with_single_call_on_replicated_frame() {
        let (cfg, ds) = (EvalConfig::default(), dataset(30));
        let model = Sleepy { per_call: Duration::ZERO, sizes: Mutex::new(vec![]) };
        let res = Throughput::new(10, 5.0).run(&CheckContext::new(&model, &ds, &cfg));
        assert!(res.passed, "{}", res.message);
        assert_eq!(*model.sizes.lock().unwrap(), vec![300]);
    }

    #[test]
    fn test_slow_model_fails_budget() {
        // 300 rows in at least 200 ms is over 6.6 s per 10k rows
        let (cfg, ds) = (EvalConfig::default(), dataset(30));
        let model = Sleepy { per_call: Duration::from_millis(200), sizes: Mutex::new(vec![]) };
        let res = Throughput::new(10, 5.0).run(&CheckContext::new(&model, &ds, &cfg));
        assert!(res.is_failed());
        assert!(res.measured_value.unwrap() >= 6.6);
    }

    #[test]
    fn test_empty_dataset_skips() {
        let (cfg, ds) = (EvalConfig::default(), dataset(0));
        let model = Sleepy { per_call: Duration::ZERO, sizes: Mutex::new(vec![]) };
        assert!(Throughput::new(10, 5.0).run(&CheckContext::new(&model, &ds, &cfg)).is_skipped());
    }
}
