use crate::checks::{CheckResult, Summary};
use serde::Serialize;
use std::fmt::Write;

/// Aligned plain-text table with one line per check and a summary footer.
pub fn format_report(results: &[CheckResult]) -> String {
    let mut out = String::new();
    let width = results.iter().map(|r| r.name.len()).max().unwrap_or(0).max(5);

    let _ = writeln!(out, "ROBUSTNESS REPORT");
    let _ = writeln!(out, "--------------------------------------------------");
    for r in results {
        let measured = r.measured_value.map(|v| format!(" [{:.4}]", v)).unwrap_or_default();
        let _ = writeln!(out, "[{}] {:<width$}{} {}", r.status, r.name, measured, r.message, width = width);
    }
    let summary = Summary::of(results);
    let _ = writeln!(out, "--------------------------------------------------");
    let _ = writeln!(
        out,
        "{} passed, {} failed, {} skipped",
        summary.passed, summary.failed, summary.skipped
    );
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: Summary,
    results: &'a [CheckResult],
}

/// Pretty JSON with a `summary` block and the `results` array.
pub fn to_json(results: &[CheckResult]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport { summary: Summary::of(results), results })
}
