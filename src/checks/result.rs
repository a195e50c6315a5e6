use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Failed,
    /// A precondition was unmet; this is not a failure.
    Skipped,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            CheckStatus::Passed => "PASS",
            CheckStatus::Failed => "FAIL",
            CheckStatus::Skipped => "SKIP",
        };
        f.write_str(tag)
    }
}

/// The outcome of one check in one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    /// `true` only for `CheckStatus::Passed`.
    pub passed: bool,
    pub message: String,
    pub measured_value: Option<f64>,
}

impl CheckResult {
    fn with_status(name: &str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            passed: status == CheckStatus::Passed,
            message: message.into(),
            measured_value: None,
        }
    }

    pub fn pass(name: &str, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Passed, message)
    }

    pub fn fail(name: &str, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Failed, message)
    }

    pub fn skip(name: &str, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Skipped, message)
    }

    /// Pass or fail on `ok`, with the same message either way.
    pub fn verdict(name: &str, ok: bool, message: impl Into<String>) -> Self {
        if ok { Self::pass(name, message) } else { Self::fail(name, message) }
    }

    pub fn measured(mut self, value: f64) -> Self {
        self.measured_value = Some(value);
        self
    }

    pub fn is_skipped(&self) -> bool {
        self.status == CheckStatus::Skipped
    }

    pub fn is_failed(&self) -> bool {
        self.status == CheckStatus::Failed
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    pub fn of(results: &[CheckResult]) -> Self {
        results.iter().fold(Self::default(), |mut s, r| {
            match r.status {
                CheckStatus::Passed => s.passed += 1,
                CheckStatus::Failed => s.failed += 1,
                CheckStatus::Skipped => s.skipped += 1,
            }
            s
        })
    }

    /// Skips do not count against a run.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passed_flag_tracks_status() {
        assert!(CheckResult::pass("a", "").passed);
        assert!(!CheckResult::fail("a", "").passed);
        assert!(!CheckResult::skip("a", "").passed);
        assert!(CheckResult::verdict("a", false, "x").is_failed());
    }

    #[test]
    fn test_summary_ignores_skips() {
        let results = vec![
            CheckResult::pass("a", ""),
            CheckResult::skip("b", ""),
            CheckResult::pass("c", "").measured(0.5),
        ];
        let summary = Summary::of(&results);
        assert_eq!(summary, Summary { passed: 2, failed: 0, skipped: 1 });
        assert!(summary.all_passed());
    }

    #[test]
    fn test_serialises_status_in_snake_case() {
        let json = serde_json::to_value(CheckResult::skip("fairness", "no label").measured(1.0)).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["passed"], false);
        assert_eq!(json["measured_value"], 1.0);
    }
}
