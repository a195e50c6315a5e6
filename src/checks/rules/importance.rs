//! Feature-importance stability: no all-zero importances, no single-feature dominance.
use crate::checks::{Check, CheckContext, CheckResult};

pub const NAME: &str = "feature_importance";

pub struct FeatureImportance {
    max_share: f64,
}

impl FeatureImportance {
    pub fn new(max_share: f64) -> Self {
        Self { max_share }
    }
}

impl Check for FeatureImportance {
    fn name(&self) -> &'static str {
        NAME
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckResult {
        let importances = match ctx.model.feature_importances() {
            Some(imp) if !imp.is_empty() => imp,
            _ => return CheckResult::skip(NAME, "Model does not expose feature importances"),
        };
        if importances.iter().any(|v| !v.is_finite()) {
            return CheckResult::fail(NAME, "Feature importances contain non-finite values");
        }

        let total: f64 = importances.iter().sum();
        let (top_idx, top) = importances
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, v)| if v > best.1 { (i, v) } else { best });

        if total <= 0.0 {
            return CheckResult::fail(NAME, "All feature importances are zero").measured(top);
        }

        let features = ctx.required_features().names();
        let label = features.get(top_idx).cloned().unwrap_or_else(|| format!("#{}", top_idx));
        CheckResult::verdict(
            NAME,
            top < self.max_share,
            format!("Largest importance {:.3} on '{}' (limit {:.2})", top, label, self.max_share),
        )
        .measured(top)
    }
}
