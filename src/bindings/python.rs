//! Python surface: run the battery against a fitted scikit-learn style estimator.
use crate::checks::CheckResult;
use crate::config::EvalConfig;
use crate::display::report;
use crate::evaluator::RobustnessEvaluator;
use crate::model::{Model, PredictError};
use crate::store::{csv, Cell, Dataset, Label};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyFloat, PyList, PyString};

/// Adapts any Python object with a `predict(DataFrame)` method.
///
/// Feature names and importances are read from the estimator itself or, for
/// a `Pipeline`, from its steps.
pub struct PyModel {
    inner: Py<PyAny>,
}

impl PyModel {
    pub fn new(inner: Py<PyAny>) -> Self {
        Self { inner }
    }
}

impl Model for PyModel {
    fn predict(&self, rows: &Dataset) -> Result<Vec<Label>, PredictError> {
        Python::attach(|py| {
            let frame = to_dataframe(py, rows).map_err(backend)?;
            let out = self.inner.bind(py).call_method1("predict", (frame,)).map_err(backend)?;
            extract_labels(&out).map_err(backend)
        })
    }

    fn feature_names(&self) -> Option<Vec<String>> {
        Python::attach(|py| {
            let model = self.inner.bind(py);
            let names = list_attr(model, "feature_names_in_").or_else(|| {
                let (_, first) = pipeline_steps(model).into_iter().next()?;
                list_attr(&first, "feature_names_in_")
            })?;
            names.extract::<Vec<String>>().ok()
        })
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        Python::attach(|py| {
            let model = self.inner.bind(py);
            let values = list_attr(model, "feature_importances_").or_else(|| {
                let (_, step) = pipeline_steps(model)
                    .into_iter()
                    .find(|(name, step)| name == "classifier" || step.hasattr("feature_importances_").unwrap_or(false))?;
                list_attr(&step, "feature_importances_")
            })?;
            values.extract::<Vec<f64>>().ok()
        })
    }
}

fn backend(err: PyErr) -> PredictError {
    PredictError::Backend(err.to_string())
}

/// Reads `obj.attr`, converting numpy arrays to Python lists.
fn list_attr<'py>(obj: &Bound<'py, PyAny>, attr: &str) -> Option<Bound<'py, PyAny>> {
    let value = obj.getattr(attr).ok()?;
    if value.hasattr("tolist").unwrap_or(false) {
        value.call_method0("tolist").ok()
    } else {
        Some(value)
    }
}

fn pipeline_steps<'py>(model: &Bound<'py, PyAny>) -> Vec<(String, Bound<'py, PyAny>)> {
    model
        .getattr("steps")
        .ok()
        .and_then(|steps| steps.extract::<Vec<(String, Bound<'py, PyAny>)>>().ok())
        .unwrap_or_default()
}

fn to_dataframe<'py>(py: Python<'py>, rows: &Dataset) -> PyResult<Bound<'py, PyAny>> {
    let columns = PyDict::new(py);
    for col in rows.columns() {
        let cells: Vec<Bound<'py, PyAny>> = col.cells.iter().map(|c| cell_to_py(py, c)).collect();
        columns.set_item(&col.name, PyList::new(py, cells)?)?;
    }
    py.import("pandas")?.call_method1("DataFrame", (columns,))
}

/// Missing cells become NaN, as `read_csv` produces, so imputers that test
/// `x != x` see them in object columns too.
fn cell_to_py<'py>(py: Python<'py>, cell: &Cell) -> Bound<'py, PyAny> {
    match cell {
        Cell::Number(v) => PyFloat::new(py, *v).into_any(),
        Cell::Text(s) => PyString::new(py, s).into_any(),
        Cell::Missing => PyFloat::new(py, f64::NAN).into_any(),
    }
}

/// Accepts integer, boolean or integral float labels.
fn extract_labels(out: &Bound<'_, PyAny>) -> PyResult<Vec<Label>> {
    let list = if out.hasattr("tolist")? { out.call_method0("tolist")? } else { out.clone() };
    let mut labels = Vec::new();
    for item in list.try_iter()? {
        let item = item?;
        let label = match item.extract::<Label>() {
            Ok(v) => v,
            Err(_) => {
                let v: f64 = item.extract()?;
                if v.fract() != 0.0 {
                    return Err(PyValueError::new_err(format!("Prediction {} is not a class label", v)));
                }
                v as Label
            }
        };
        labels.push(label);
    }
    Ok(labels)
}

fn run(model: Py<PyAny>, csv_path: &str, config_json: Option<&str>) -> PyResult<Vec<CheckResult>> {
    let config = match config_json {
        Some(json) => EvalConfig::from_json_str(json),
        None => Ok(EvalConfig::default()),
    }
    .map_err(|e| PyValueError::new_err(e.to_string()))?;
    // The estimator is called under the GIL, so parallel checks would only contend for it.
    let config = EvalConfig { parallel: false, ..config };
    let evaluator = RobustnessEvaluator::new(config).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let dataset = csv::read_path(csv_path).map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(evaluator.evaluate(&PyModel::new(model), &dataset))
}

/// Runs the battery and returns the JSON report.
#[pyfunction]
#[pyo3(signature = (model, csv_path, config_json=None))]
pub fn evaluate(model: Py<PyAny>, csv_path: &str, config_json: Option<&str>) -> PyResult<String> {
    let results = run(model, csv_path, config_json)?;
    report::to_json(&results).map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

/// Runs the battery and returns the plain-text report.
#[pyfunction]
#[pyo3(signature = (model, csv_path, config_json=None))]
pub fn evaluate_text(model: Py<PyAny>, csv_path: &str, config_json: Option<&str>) -> PyResult<String> {
    let results = run(model, csv_path, config_json)?;
    Ok(report::format_report(&results))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cell_is_nan_not_none() {
        Python::initialize();
        Python::attach(|py| {
            let value = cell_to_py(py, &Cell::Missing);
            assert!(!value.is_none());
            assert!(value.extract::<f64>().unwrap().is_nan());
            // the self-inequality test imputers use to find missing entries
            assert!(value.ne(&value).unwrap());
        });
    }

    #[test]
    fn test_present_cells_keep_their_python_types() {
        Python::initialize();
        Python::attach(|py| {
            assert_eq!(cell_to_py(py, &Cell::Number(22.0)).extract::<f64>().unwrap(), 22.0);
            assert_eq!(cell_to_py(py, &Cell::from("male")).extract::<String>().unwrap(), "male");
        });
    }
}
