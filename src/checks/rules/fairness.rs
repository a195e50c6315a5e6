//! Group fairness across a sensitive attribute.
//!
//! For every group the predicted positive rate must stay close to the
//! observed one, and the spread of predicted rates across groups must stay
//! close to the observed spread.
use crate::analysis::stats::{disparity, group_rates, GroupRates};
use crate::checks::{Check, CheckContext, CheckResult, Step};
use crate::store::Label;

pub const NAME: &str = "group_fairness";

pub struct GroupFairness {
    sensitive: String,
    positive: Label,
    max_group_gap: f64,
    max_disparity_gap: f64,
}

impl GroupFairness {
    pub fn new(sensitive: String, positive: Label, max_group_gap: f64, max_disparity_gap: f64) -> Self {
        Self { sensitive, positive, max_group_gap, max_disparity_gap }
    }

    fn probe(&self, ctx: &CheckContext<'_>) -> Step<CheckResult> {
        let label = &ctx.config.label_column;
        if !ctx.dataset.has_column(label) {
            return Err(CheckResult::skip(NAME, format!("Label column '{}' not in dataset", label)));
        }
        let Some(groups) = ctx.dataset.column(&self.sensitive) else {
            return Err(CheckResult::skip(NAME, format!("Sensitive column '{}' not in dataset", self.sensitive)));
        };

        let observed = ctx
            .dataset
            .numeric_values(label)
            .map_err(|e| CheckResult::fail(NAME, format!("Malformed label column: {}", e)))?;
        let frame = ctx.feature_frame(NAME)?;
        let predicted = ctx.predict(NAME, &frame)?;

        let keys: Vec<Option<String>> = groups.cells.iter().map(|c| c.group_key()).collect();
        let rates = group_rates(&keys, &observed, &predicted, self.positive);
        if rates.is_empty() {
            return Err(CheckResult::skip(NAME, "No rows carry both a group and a label"));
        }

        let report = FairnessReport::from_rates(rates);
        let violations: Vec<String> = report
            .groups
            .iter()
            .filter(|g| g.gap() >= self.max_group_gap)
            .map(|g| format!("'{}' gap {:.2}", g.group, g.gap()))
            .collect();
        let disparity_ok = report.disparity_gap() < self.max_disparity_gap;
        let ok = violations.is_empty() && disparity_ok;

        let message = if ok {
            format!(
                "{} groups within {:.2}; disparity actual {:.2} vs predicted {:.2}",
                report.groups.len(),
                self.max_group_gap,
                report.actual_disparity,
                report.predicted_disparity
            )
        } else {
            let mut parts = violations;
            if !disparity_ok {
                parts.push(format!(
                    "disparity actual {:.2} vs predicted {:.2} differs by {:.2}",
                    report.actual_disparity,
                    report.predicted_disparity,
                    report.disparity_gap()
                ));
            }
            parts.join("; ")
        };
        Ok(CheckResult::verdict(NAME, ok, message).measured(report.disparity_gap()))
    }
}

impl Check for GroupFairness {
    fn name(&self) -> &'static str {
        NAME
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckResult {
        self.probe(ctx).unwrap_or_else(|r| r)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FairnessReport {
    pub groups: Vec<GroupRates>,
    pub actual_disparity: f64,
    pub predicted_disparity: f64,
}

impl FairnessReport {
    pub fn from_rates(groups: Vec<GroupRates>) -> Self {
        let actual_disparity = disparity(groups.iter().map(|g| g.actual));
        let predicted_disparity = disparity(groups.iter().map(|g| g.predicted));
        Self { groups, actual_disparity, predicted_disparity }
    }

    pub fn disparity_gap(&self) -> f64 {
        (self.actual_disparity - self.predicted_disparity).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvalConfig;
    use crate::model::{Model, PredictError};
    use crate::store::{Cell, Column, Dataset};

    /// Women: 8 of 10 survive. Men: 2 of 10 survive.
    fn dataset() -> Dataset {
        let sex = (0..20).map(|i| Cell::from(if i < 10 { "female" } else { "male" })).collect();
        let survived = (0..20)
            .map(|i| Cell::Number(if (i < 8) || (10..12).contains(&i) { 1.0 } else { 0.0 }))
            .collect();
        let idx = (0..20).map(|i| Cell::Number(i as f64)).collect();
        Dataset::new(vec![
            Column::new("Idx", idx),
            Column::new("Sex", sex),
            Column::new("Survived", survived),
        ])
        .unwrap()
    }

    /// Predicts 1 for the rows in `positives`, read from the `Idx` column.
    struct ByIndex(Vec<usize>);

    impl Model for ByIndex {
        fn predict(&self, rows: &Dataset) -> Result<Vec<Label>, PredictError> {
            let idx = rows.numeric_values("Idx").map_err(|e| PredictError::Backend(e.to_string()))?;
            Ok(idx
                .into_iter()
                .map(|i| Label::from(i.is_some_and(|i| self.0.contains(&(i as usize)))))
                .collect())
        }
        fn feature_names(&self) -> Option<Vec<String>> {
            Some(vec!["Idx".into(), "Sex".into()])
        }
    }

    fn run(model: &ByIndex, ds: &Dataset) -> CheckResult {
        let cfg = EvalConfig::default();
        GroupFairness::new("Sex".into(), 1, 0.20, 0.15).run(&CheckContext::new(model, ds, &cfg))
    }

    #[test]
    fn test_faithful_model_passes() {
        let model = ByIndex(vec![0, 1, 2, 3, 4, 5, 6, 10, 11]);
        let res = run(&model, &dataset());
        assert!(res.passed, "{}", res.message);
    }

    #[test]
    fn test_group_gap_fails() {
        // women predicted at 0.5 against an observed 0.8
        let model = ByIndex(vec![0, 1, 2, 3, 4, 10, 11]);
        let res = run(&model, &dataset());
        assert!(res.is_failed());
        assert!(res.message.contains("'female' gap 0.30"), "{}", res.message);
    }

    #[test]
    fn test_disparity_gap_fails_even_when_groups_are_close() {
        // women 0.7 (gap 0.1), men 0.3 (gap 0.1): predicted disparity 0.4 vs observed 0.6
        let model = ByIndex(vec![0, 1, 2, 3, 4, 5, 6, 10, 11, 12]);
        let res = run(&model, &dataset());
        assert!(res.is_failed());
        assert!(res.message.contains("disparity"), "{}", res.message);
        assert!((res.measured_value.unwrap() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_skips_without_label_or_sensitive_column() {
        let model = ByIndex(vec![]);
        assert!(run(&model, &dataset().without("Survived")).is_skipped());

        let cfg = EvalConfig::default();
        let ds = dataset();
        let res = GroupFairness::new("Pclass".into(), 1, 0.2, 0.15).run(&CheckContext::new(&model, &ds, &cfg));
        assert!(res.is_skipped());
    }

    #[test]
    fn test_skips_when_no_row_has_group_and_label() {
        let mut no_groups = dataset();
        let mut no_labels = dataset();
        for row in 0..20 {
            no_groups.set(row, "Sex", Cell::Missing).unwrap();
            no_labels.set(row, "Survived", Cell::Missing).unwrap();
        }
        for ds in [no_groups, no_labels] {
            let res = run(&ByIndex(vec![0, 1]), &ds);
            assert!(res.is_skipped(), "{}", res.message);
            assert_eq!(res.message, "No rows carry both a group and a label");
        }
    }

    #[test]
    fn test_text_labels_fail_as_malformed() {
        let mut ds = dataset();
        ds.set(3, "Survived", Cell::from("yes")).unwrap();
        let res = run(&ByIndex(vec![]), &ds);
        assert!(res.is_failed());
        assert!(res.message.starts_with("Malformed label column"));
    }
}
