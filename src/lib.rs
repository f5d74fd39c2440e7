//! rust_revpref — revealed-preference consistency tests with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the revealed-preference engine (WARP, SARP, GARP violation counts and
//! Afriat's CCEI) to Python via the `_rust_revpref` extension module. When the
//! `python-bindings` feature is enabled, this module defines the
//! Python-facing class and functions.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust module [`revealed_preference`] as the public crate
//!   surface.
//! - Define a `#[pyclass]` wrapper, a batch `#[pyfunction]` and the
//!   `#[pymodule]` initializer for the `_rust_revpref` Python extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in [`revealed_preference`]; this file performs
//!   only FFI glue, input conversion, and error mapping.
//! - Python inputs are converted into owned `f64` matrices, aligned by
//!   transposition when needed, and validated before any analysis runs.
//!
//! Conventions
//! -----------
//! - Result dicts use the spreadsheet header names `WARP_Violations`,
//!   `SARP_Violations`, `GARP_Violations`, `CCEI_Score` (and `Subject_ID` for
//!   batch rows).
//! - Errors from core Rust code surface in Python as `ValueError` with the
//!   Rust `Display` message.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules
//!   and by the integration tests under `tests/`; the PyO3 glue is exercised
//!   from Python.

pub mod revealed_preference;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::{PyAny, PyDict}};

#[cfg(feature = "python-bindings")]
use crate::{
    revealed_preference::{CceiOptions, ObservationSet, RPOutcome, analyse_stacked},
    utils::{extract_f64_matrix, outcome_to_dict, subject_to_dict},
};

/// RevealedPreference — Python-facing summary of one subject's data.
///
/// Purpose
/// -------
/// Run the full revealed-preference pipeline on one price/quantity pair when
/// called from Python and expose the four reported fields as properties.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `RevealedPreference(prices, quantities, max_iter=100, tolerance=1e-6)`:
/// - `prices`, `quantities`: 2-D array-likes of non-negative floats, either of
///   equal shape `(T, N)` or with `quantities` given as `(N, T)`.
/// - `max_iter`, `tolerance`: CCEI bisection stopping rules.
///
/// Notes
/// -----
/// - The GIL is released while the analysis runs.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_revpref.revealed_preference")]
pub struct RevealedPreference {
    inner: RPOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl RevealedPreference {
    #[new]
    #[pyo3(
        text_signature = "(prices, quantities, /, max_iter=100, tolerance=1e-6)",
        signature = (prices, quantities, max_iter = 100, tolerance = 1e-6)
    )]
    pub fn new<'py>(
        py: Python<'py>, prices: &Bound<'py, PyAny>, quantities: &Bound<'py, PyAny>,
        max_iter: usize, tolerance: f64,
    ) -> PyResult<Self> {
        let p = extract_f64_matrix(py, prices)?;
        let q = extract_f64_matrix(py, quantities)?;
        let opts = CceiOptions::new(max_iter, tolerance)?;
        let observations = ObservationSet::aligned(p, q)?;
        let inner = py.allow_threads(|| RPOutcome::analyse_with(&observations, &opts))?;
        Ok(RevealedPreference { inner })
    }

    #[getter]
    pub fn warp_violations(&self) -> usize {
        self.inner.warp_violations
    }

    #[getter]
    pub fn sarp_violations(&self) -> usize {
        self.inner.sarp_violations
    }

    #[getter]
    pub fn garp_violations(&self) -> usize {
        self.inner.garp_violations
    }

    /// Critical Cost Efficiency Index in [0, 1].
    #[getter]
    pub fn ccei(&self) -> f64 {
        self.inner.ccei
    }

    /// Results as a dict keyed by the spreadsheet header names.
    pub fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        outcome_to_dict(py, &self.inner)
    }

    fn __repr__(&self) -> String {
        format!(
            "RevealedPreference(warp_violations={}, sarp_violations={}, \
             garp_violations={}, ccei={})",
            self.inner.warp_violations,
            self.inner.sarp_violations,
            self.inner.garp_violations,
            self.inner.ccei
        )
    }
}

/// Analyse several subjects that faced the same prices.
///
/// `stacked_quantities` holds the subjects' quantity blocks one after the
/// other (`obs_per_subject` rows each). Returns `(rows, skipped)` where `rows`
/// is a list of result dicts in subject order and `skipped` a list of
/// `(subject_id, message)` for subjects whose data could not be analysed.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "analyse_subjects",
    signature = (prices, stacked_quantities, obs_per_subject, max_iter = 100, tolerance = 1e-6)
)]
pub fn py_analyse_subjects<'py>(
    py: Python<'py>, prices: &Bound<'py, PyAny>, stacked_quantities: &Bound<'py, PyAny>,
    obs_per_subject: usize, max_iter: usize, tolerance: f64,
) -> PyResult<(Vec<Bound<'py, PyDict>>, Vec<(usize, String)>)> {
    let p = extract_f64_matrix(py, prices)?;
    let stacked = extract_f64_matrix(py, stacked_quantities)?;
    let opts = CceiOptions::new(max_iter, tolerance)?;

    let batch = py.allow_threads(|| analyse_stacked(&p, &stacked, obs_per_subject, &opts))?;

    let rows: Vec<Bound<'py, PyDict>> =
        batch.outcomes.iter().map(|row| subject_to_dict(py, row)).collect::<PyResult<_>>()?;
    let skipped: Vec<(usize, String)> =
        batch.skipped.iter().map(|s| (s.subject_id, s.error.to_string())).collect();
    Ok((rows, skipped))
}

/// _rust_revpref — PyO3 module initializer for the Python extension.
///
/// Creates the `revealed_preference` submodule, attaches it to the parent
/// module, and registers it in `sys.modules` so dotted imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_revpref<'py>(py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let revealed_preference_mod = PyModule::new(py, "revealed_preference")?;
    revealed_preference_mod.add_class::<RevealedPreference>()?;
    revealed_preference_mod
        .add_function(wrap_pyfunction!(py_analyse_subjects, &revealed_preference_mod)?)?;
    m.add_submodule(&revealed_preference_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    py.import("sys")?
        .getattr("modules")?
        .set_item("rust_revpref.revealed_preference", revealed_preference_mod)?;
    Ok(())
}
