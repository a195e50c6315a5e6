//! Prediction-distribution balance over the full dataset.
use crate::analysis::stats::{label_histogram, majority_share};
use crate::checks::{Check, CheckContext, CheckResult, Step};

pub const NAME: &str = "prediction_distribution";

pub struct PredictionDistribution {
    max_share: f64,
}

impl PredictionDistribution {
    pub fn new(max_share: f64) -> Self {
        Self { max_share }
    }

    fn probe(&self, ctx: &CheckContext<'_>) -> Step<CheckResult> {
        let frame = ctx.feature_frame(NAME)?;
        let labels = ctx.predict(NAME, &frame)?;
        let hist = label_histogram(&labels);
        let Some(share) = majority_share(&hist) else {
            return Ok(CheckResult::fail(NAME, "Model returned no predictions"));
        };

        if hist.len() < 2 {
            return Ok(CheckResult::fail(NAME, format!("Model predicts a single class: {}", hist[0].0))
                .measured(share));
        }
        Ok(CheckResult::verdict(
            NAME,
            share < self.max_share,
            format!("{} classes, majority share {:.2}% (limit {:.0}%)", hist.len(), share * 100.0, self.max_share * 100.0),
        )
        .measured(share))
    }
}

impl Check for PredictionDistribution {
    fn name(&self) -> &'static str {
        NAME
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckResult {
        self.probe(ctx).unwrap_or_else(|r| r)
    }
}
