use crate::store::Label;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::time::Duration;

/// Label counts, sorted by label. Classifiers rarely have more than a handful
/// of classes, so this stays inline.
pub type LabelHistogram = SmallVec<[(Label, usize); 4]>;

pub fn label_histogram(labels: &[Label]) -> LabelHistogram {
    let mut hist = LabelHistogram::new();
    for &label in labels {
        match hist.binary_search_by_key(&label, |&(l, _)| l) {
            Ok(pos) => hist[pos].1 += 1,
            Err(pos) => hist.insert(pos, (label, 1)),
        }
    }
    hist
}

/// Share of the most frequent label, or `None` for an empty slice.
pub fn majority_share(hist: &LabelHistogram) -> Option<f64> {
    let total: usize = hist.iter().map(|&(_, n)| n).sum();
    let max = hist.iter().map(|&(_, n)| n).max()?;
    Some(max as f64 / total as f64)
}

/// Number of positions at which two label sequences differ. A length
/// difference counts every unmatched tail position.
pub fn mismatches(lhs: &[Label], rhs: &[Label]) -> usize {
    let paired = lhs.iter().zip(rhs).filter(|(a, b)| a != b).count();
    paired + lhs.len().abs_diff(rhs.len())
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupRates {
    pub group: String,
    pub rows: usize,
    /// Observed positive-outcome rate.
    pub actual: f64,
    /// Predicted positive-outcome rate.
    pub predicted: f64,
}

impl GroupRates {
    pub fn gap(&self) -> f64 {
        (self.actual - self.predicted).abs()
    }
}

/// Per-group actual and predicted positive rates, ordered by group key.
///
/// Rows with a missing group key or a missing observed label are excluded.
pub fn group_rates(
    keys: &[Option<String>],
    observed: &[Option<f64>],
    predicted: &[Label],
    positive: Label,
) -> Vec<GroupRates> {
    // (rows, actual positives, predicted positives)
    let mut acc: BTreeMap<&str, (usize, usize, usize)> = BTreeMap::new();
    for ((key, obs), &pred) in keys.iter().zip(observed).zip(predicted) {
        let (Some(key), Some(obs)) = (key, obs) else { continue };
        let entry = acc.entry(key.as_str()).or_default();
        entry.0 += 1;
        if *obs == positive as f64 {
            entry.1 += 1;
        }
        if pred == positive {
            entry.2 += 1;
        }
    }
    acc.into_iter()
        .map(|(group, (rows, actual, predicted))| GroupRates {
            group: group.to_string(),
            rows,
            actual: actual as f64 / rows as f64,
            predicted: predicted as f64 / rows as f64,
        })
        .collect()
}

/// Spread between the highest and lowest rate. Zero for fewer than two rates.
pub fn disparity(rates: impl IntoIterator<Item = f64>) -> f64 {
    let (lo, hi) = rates
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| (lo.min(r), hi.max(r)));
    if hi >= lo { hi - lo } else { 0.0 }
}

/// Prediction time normalised to seconds per 10,000 rows.
pub fn time_per_10k(elapsed: Duration, rows: usize) -> f64 {
    if rows == 0 {
        return 0.0;
    }
    elapsed.as_secs_f64() / rows as f64 * 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_histogram_is_sorted_and_counted() {
        let hist = label_histogram(&[1, 0, 1, 2, 1]);
        assert_eq!(hist.as_slice(), &[(0, 1), (1, 3), (2, 1)]);
        assert_eq!(majority_share(&hist), Some(0.6));
        assert_eq!(majority_share(&label_histogram(&[])), None);
    }

    #[rstest]
    #[case(&[0, 1, 1], &[0, 1, 1], 0)]
    #[case(&[0, 1, 1], &[1, 1, 0], 2)]
    #[case(&[0, 1, 1], &[0], 2)]
    fn test_mismatches(#[case] lhs: &[Label], #[case] rhs: &[Label], #[case] expected: usize) {
        assert_eq!(mismatches(lhs, rhs), expected);
    }

    #[test]
    fn test_group_rates_skip_missing_rows() {
        let keys = vec![
            Some("female".to_string()),
            Some("female".to_string()),
            Some("male".to_string()),
            Some("male".to_string()),
            None,
            Some("male".to_string()),
        ];
        let observed = vec![Some(1.0), Some(1.0), Some(0.0), Some(1.0), Some(1.0), None];
        let predicted = vec![1, 0, 0, 0, 1, 1];
        let rates = group_rates(&keys, &observed, &predicted, 1);
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0], GroupRates { group: "female".into(), rows: 2, actual: 1.0, predicted: 0.5 });
        assert_eq!(rates[1], GroupRates { group: "male".into(), rows: 2, actual: 0.5, predicted: 0.0 });
        assert_eq!(rates[0].gap(), 0.5);
    }

    #[test]
    fn test_disparity() {
        assert_eq!(disparity([0.25, 0.75, 0.5]), 0.5);
        assert_eq!(disparity([0.4]), 0.0);
        assert_eq!(disparity(Vec::new()), 0.0);
    }

    #[test]
    fn test_time_per_10k_for_replicated_frame() {
        // 30 rows replicated 10 times, predicted in 0.03 s
        let t = time_per_10k(Duration::from_millis(30), 300);
        assert!((t - 1.0).abs() < 1e-9);
        assert_eq!(time_per_10k(Duration::from_secs(1), 0), 0.0);
    }
}
