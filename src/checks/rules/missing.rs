//! Missing-value tolerance.
use crate::checks::{Check, CheckContext, CheckResult, Step};
use crate::store::{Cell, Dataset};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const NAME: &str = "missing_values";

/// Blanks each feature cell independently with probability `rate`, then
/// requires the model to still return one label per row.
pub struct MissingValues {
    rate: f64,
    seed: u64,
}

impl MissingValues {
    pub fn new(rate: f64, seed: u64) -> Self {
        Self { rate, seed }
    }

    fn probe(&self, ctx: &CheckContext<'_>) -> Step<CheckResult> {
        if !(0.0..=1.0).contains(&self.rate) {
            return Err(CheckResult::fail(NAME, format!("Missing-value rate {} is outside [0, 1]", self.rate)));
        }
        let mut frame = ctx.feature_frame(NAME)?;
        let cells = frame.n_rows() * frame.n_columns();
        let injected = inject_missing(&mut frame, self.rate, self.seed);
        ctx.predict(NAME, &frame)?;

        let fraction = if cells == 0 { 0.0 } else { injected as f64 / cells as f64 };
        Ok(CheckResult::pass(
            NAME,
            format!("Predicted {} rows with {} of {} cells blanked", frame.n_rows(), injected, cells),
        )
        .measured(fraction))
    }
}

impl Check for MissingValues {
    fn name(&self) -> &'static str {
        NAME
    }

    fn run(&self, ctx: &CheckContext<'_>) -> CheckResult {
        self.probe(ctx).unwrap_or_else(|r| r)
    }
}

/// Replaces cells with [`Cell::Missing`] column by column, row by row, drawing
/// from a generator seeded with `seed`. Returns how many cells were blanked.
pub fn inject_missing(frame: &mut Dataset, rate: f64, seed: u64) -> usize {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut injected = 0;
    for column in frame.columns_mut() {
        for cell in column.cells.iter_mut() {
            if rng.gen_bool(rate) {
                *cell = Cell::Missing;
                injected += 1;
            }
        }
    }
    injected
}
