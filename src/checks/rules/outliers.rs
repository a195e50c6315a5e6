//! Outlier tolerance: implausibly large numeric values.
use crate::checks::{Check, CheckContext, CheckResult, Step};
use crate::config::CellInjection;
use crate::store::{Cell, ColumnKind, Dataset};

pub const NAME: &str = "outliers";

pub struct Outliers {
    injections: Vec<CellInjection>,
}

impl Outliers {
    pub fn new(injections: Vec<CellInjection>) -> Self {
        Self { injections }
    }

    fn probe(&self, ctx: &CheckContext<'_>) -> Step<CheckResult> {
        let mut frame = ctx.feature_frame(NAME)?;
        if frame.is_empty() {
            return Err(CheckResult::skip(NAME, "Dataset has no rows"));
        }

        let mut applied = apply_injections(&mut frame, &self.injections);
        if applied.is_empty() {
            match extreme_fallback(&frame) {
                Some(injection) => applied = apply_injections(&mut frame, &[injection]),
                None => return Err(CheckResult::skip(NAME, "No numeric feature column to perturb")),
            }
        }

        ctx.predict(NAME, &frame)?;
        Ok(CheckResult::pass(NAME, format!("Predicted {} rows with outliers in {:?}", frame.n_rows(), applied))
            .measured(applied.len() as f64))
    }
}

impl Check for Outliers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckResult {
        self.probe(ctx).unwrap_or_else(|r| r)
    }
}

/// Writes every injection whose column exists and whose row is in range.
/// Returns the columns that were touched, in injection order.
pub(crate) fn apply_injections(frame: &mut Dataset, injections: &[CellInjection]) -> Vec<String> {
    let mut applied = Vec::new();
    for inj in injections {
        if frame.set(inj.row, &inj.column, inj.value.clone()).is_ok() {
            applied.push(inj.column.clone());
        }
    }
    applied
}

/// Row 0 of the first numeric column, set to a hundred times its largest magnitude.
fn extreme_fallback(frame: &Dataset) -> Option<CellInjection> {
    let column = frame.columns().iter().find(|c| c.kind() == ColumnKind::Numeric)?;
    let max_abs = column
        .cells
        .iter()
        .filter_map(Cell::as_number)
        .fold(0.0_f64, |m, v| m.max(v.abs()));
    let value = if max_abs > 0.0 { max_abs * 100.0 } else { 1e6 };
    Some(CellInjection::new(&column.name, 0, value))
}
