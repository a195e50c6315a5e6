//! Batch-size consistency.
//!
//! `predict(X)` must equal the concatenation of `predict` over contiguous
//! chunks of `X`, in order.
use crate::analysis::stats::mismatches;
use crate::checks::{Check, CheckContext, CheckResult, Step};
use crate::store::{Dataset, Label};

pub const NAME: &str = "batch_consistency";

pub struct BatchConsistency {
    batch_size: usize,
}

impl BatchConsistency {
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size: batch_size.max(1) }
    }

    fn probe(&self, ctx: &CheckContext<'_>) -> Step<CheckResult> {
        let frame = ctx.feature_frame(NAME)?;
        let full = ctx.predict(NAME, &frame)?;
        let batched = predict_in_chunks(ctx, &frame, self.batch_size)?;

        let diff = mismatches(&full, &batched);
        let chunks = frame.n_rows().div_ceil(self.batch_size);
        let message = if diff == 0 {
            format!("{} rows identical across {} chunks of {}", frame.n_rows(), chunks, self.batch_size)
        } else {
            format!("Batched predictions differ at {} of {} rows (chunk size {})", diff, frame.n_rows(), self.batch_size)
        };
        Ok(CheckResult::verdict(NAME, diff == 0, message).measured(diff as f64))
    }
}

impl Check for BatchConsistency {
    fn name(&self) -> &'static str {
        NAME
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckResult {
        self.probe(ctx).unwrap_or_else(|r| r)
    }
}

fn predict_in_chunks(ctx: &CheckContext<'_>, frame: &Dataset, size: usize) -> Step<Vec<Label>> {
    let mut out = Vec::with_capacity(frame.n_rows());
    for chunk in frame.chunks(size) {
        out.extend(ctx.predict(NAME, &chunk)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvalConfig;
    use crate::model::{Model, PredictError};
    use crate::store::{Cell, Column};
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn dataset(rows: usize) -> Dataset {
        Dataset::new(vec![Column::new("Age", (0..rows).map(|i| Cell::Number(i as f64)).collect())]).unwrap()
    }

    /// Stateless: each label depends only on its own row.
    struct Parity;

    impl Model for Parity {
        fn predict(&self, rows: &Dataset) -> Result<Vec<Label>, PredictError> {
            let ages = rows.numeric_values("Age").map_err(|e| PredictError::Backend(e.to_string()))?;
            Ok(ages.into_iter().map(|a| a.map_or(0, |v| v as Label % 2)).collect())
        }
        fn feature_names(&self) -> Option<Vec<String>> {
            Some(vec!["Age".into()])
        }
    }

    /// Normalises by the batch mean, so labels depend on batch composition.
    struct BatchRelative;

    impl Model for BatchRelative {
        fn predict(&self, rows: &Dataset) -> Result<Vec<Label>, PredictError> {
            let ages: Vec<f64> = rows
                .numeric_values("Age")
                .map_err(|e| PredictError::Backend(e.to_string()))?
                .into_iter()
                .flatten()
                .collect();
            let mean = ages.iter().sum::<f64>() / ages.len().max(1) as f64;
            Ok(ages.iter().map(|&a| Label::from(a > mean)).collect())
        }
        fn feature_names(&self) -> Option<Vec<String>> {
            Some(vec!["Age".into()])
        }
    }

    /// Counts calls; labels depend on how often it has been invoked.
    #[derive(Default)]
    struct Drifting(AtomicUsize);

    impl Model for Drifting {
        fn predict(&self, rows: &Dataset) -> Result<Vec<Label>, PredictError> {
            let call = self.0.fetch_add(1, Ordering::SeqCst);
            Ok(vec![(call % 2) as Label; rows.n_rows()])
        }
        fn feature_names(&self) -> Option<Vec<String>> {
            Some(vec!["Age".into()])
        }
    }

    proptest! {
        #[test]
        fn test_stateless_model_is_consistent_for_any_partition(rows in 0usize..300, size in 1usize..80) {
            let (cfg, ds) = (EvalConfig::default(), dataset(rows));
            let res = BatchConsistency::new(size).run(&CheckContext::new(&Parity, &ds, &cfg));
            prop_assert!(res.passed, "rows={} size={}: {}", rows, size, res.message);
            prop_assert_eq!(res.measured_value, Some(0.0));
        }
    }

    #[test]
    fn test_batch_dependent_model_fails() {
        let (cfg, ds) = (EvalConfig::default(), dataset(30));
        let res = BatchConsistency::new(10).run(&CheckContext::new(&BatchRelative, &ds, &cfg));
        assert!(res.is_failed());
        // whole-frame mean is 14.5; per chunk the upper half of each chunk is positive,
        // so rows 5..10 and 20..25 disagree
        assert_eq!(res.measured_value, Some(10.0));
    }

    #[test]
    fn test_stateful_model_fails() {
        let (cfg, ds) = (EvalConfig::default(), dataset(20));
        let model = Drifting::default();
        let res = BatchConsistency::new(10).run(&CheckContext::new(&model, &ds, &cfg));
        assert!(res.is_failed());
    }
}
