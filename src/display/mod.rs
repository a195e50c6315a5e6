//! Rendering of evaluation results for terminals and reporting layers.
pub mod report;

pub use self::report::{format_report, to_json};
