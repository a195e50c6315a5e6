// Crate root. The Rust API lives in the modules below; with the `python`
// feature this file also defines the `_core` extension module.

// --- MODULE DECLARATIONS ---
pub mod analysis;
pub mod checks;
pub mod config;
pub mod display;
pub mod evaluator;
pub mod model;
pub mod store;
#[cfg(feature = "python")]
mod bindings {
    pub mod python;
}

pub use checks::{Check, CheckContext, CheckResult, CheckStatus, Summary};
pub use config::{ConfigError, EvalConfig};
pub use evaluator::RobustnessEvaluator;
pub use model::{LinearModel, Model, PredictError};
pub use store::{Dataset, DatasetError};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Version string reported to Python callers.
#[cfg(feature = "python")]
#[pyfunction]
fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// --- Module Definition ---
/// Defines the `_core` Python module.
#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(core_version, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::python::evaluate, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::python::evaluate_text, m)?)?;
    Ok(())
}
