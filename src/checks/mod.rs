//! The robustness battery: a registry of independent, named checks.
//!
//! Each check receives a read-only [`CheckContext`] and produces exactly one
//! [`CheckResult`]. Checks never return errors: an unmet precondition is a
//! skip, anything else that goes wrong is a failure carrying the message.

// --- MODULE DECLARATIONS ---
mod context;
mod result;
pub mod rules {
    pub mod batch;
    pub mod categorical;
    pub mod distribution;
    pub mod fairness;
    pub mod importance;
    pub mod missing;
    pub mod outliers;
    pub mod throughput;
}

pub use self::context::{CheckContext, Step};
pub(crate) use self::context::panic_message;
pub use self::result::{CheckResult, CheckStatus, Summary};

use crate::config::EvalConfig;

pub trait Check: Send + Sync {
    /// Stable identifier used for selection and reporting.
    fn name(&self) -> &'static str;

    fn run(&self, ctx: &CheckContext<'_>) -> CheckResult;
}

/// The full battery, in reporting order.
pub fn default_checks(cfg: &EvalConfig) -> Vec<Box<dyn Check>> {
    use self::rules::*;
    vec![
        Box::new(missing::MissingValues::new(cfg.missing_rate, cfg.seed)),
        Box::new(outliers::Outliers::new(cfg.outliers.clone())),
        Box::new(categorical::CategoricalAnomalies::new(cfg.categorical_anomalies.clone())),
        Box::new(importance::FeatureImportance::new(cfg.thresholds.max_importance)),
        Box::new(distribution::PredictionDistribution::new(cfg.thresholds.max_class_share)),
        Box::new(batch::BatchConsistency::new(cfg.batch_size)),
        Box::new(fairness::GroupFairness::new(
            cfg.sensitive_column.clone(),
            cfg.positive_label,
            cfg.thresholds.group_gap,
            cfg.thresholds.disparity_gap,
        )),
        Box::new(throughput::Throughput::new(cfg.replication, cfg.thresholds.seconds_per_10k)),
    ]
}
