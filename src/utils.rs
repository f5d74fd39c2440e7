//! utils — PyO3 conversion helpers for the Python bindings.
//!
//! Only compiled with the `python-bindings` feature. Converts Python
//! array-likes into owned `ndarray` matrices and result records into Python
//! dicts keyed by the spreadsheet header names.

#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray2;

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::{PyAny, PyDict},
};

#[cfg(feature = "python-bindings")]
use crate::revealed_preference::{RPOutcome, SubjectOutcome};

/// Extract a 2-D `float64` matrix from a numpy array, a pandas DataFrame
/// (via `to_numpy`), or a nested sequence of floats.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(
    _py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err(
            "expected a 2-D numpy.ndarray, pandas.DataFrame, or nested sequence of float64",
        )
    })?;
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != n_cols) {
        return Err(PyValueError::new_err("all rows must have the same number of columns"));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| PyValueError::new_err(format!("could not build matrix: {e}")))
}

/// Python dict with the four result fields.
#[cfg(feature = "python-bindings")]
pub fn outcome_to_dict<'py>(py: Python<'py>, outcome: &RPOutcome) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("WARP_Violations", outcome.warp_violations)?;
    dict.set_item("SARP_Violations", outcome.sarp_violations)?;
    dict.set_item("GARP_Violations", outcome.garp_violations)?;
    dict.set_item("CCEI_Score", outcome.ccei)?;
    Ok(dict)
}

/// Python dict for one batch row, `Subject_ID` first.
#[cfg(feature = "python-bindings")]
pub fn subject_to_dict<'py>(py: Python<'py>, row: &SubjectOutcome) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("Subject_ID", row.subject_id)?;
    for (key, value) in outcome_to_dict(py, &row.outcome)?.iter() {
        dict.set_item(key, value)?;
    }
    Ok(dict)
}
