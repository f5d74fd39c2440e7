//! revealed_preference::errors — error type and Python bridge.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by every revealed-preference
//! routine (relation construction, closure, axiom checks, CCEI search, shape
//! alignment and subject segmentation), together with a conversion layer to
//! Python exceptions for PyO3-based bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`RPResult`] and [`RPError`] as the canonical result and error
//!   types for the revealed-preference engine.
//! - Attach human-readable `Display` messages to each variant, embedding the
//!   offending shape or value so a caller can fix the input without
//!   re-running the analysis.
//! - Implement `From<RPError> for PyErr` (feature `python-bindings`) to map
//!   every failure into a `ValueError` visible to Python callers.
//!
//! Invariants & assumptions
//! ------------------------
//! - Shapes are always reported as `(rows, cols)` = `(observations, goods)`.
//! - Matrix positions are 0-based (match Rust/NumPy).
//! - The core never recovers from these errors internally; they surface to
//!   the caller immediately.
//!
//! Testing notes
//! -------------
//! - Unit tests verify that each variant's `Display` message embeds its
//!   payload (shapes, positions, offending values).

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for revealed-preference operations that may produce [`RPError`].
pub type RPResult<T> = Result<T, RPError>;

/// RPError — validation failures of the revealed-preference engine.
///
/// Variants
/// --------
/// - `ShapeMismatch { prices, quantities }`
///   Price and quantity matrices do not have the same `(T, N)` shape.
/// - `EmptyObservations { rows, cols }`
///   The observation set has no observations (`T = 0`) or no goods (`N = 0`).
/// - `NonFiniteValue { matrix, row, col, value }`
///   A price or quantity entry is NaN or ±∞.
/// - `NegativeValue { matrix, row, col, value }`
///   A price or quantity entry is strictly negative.
/// - `InvalidEfficiency(e)`
///   The efficiency scalar is non-finite or outside `[0, 1]`.
/// - `InvalidCceiOptions { reason }`
///   The bisection configuration cannot terminate meaningfully.
/// - `IncompatibleShapes { prices, quantities }`
///   No combination of transposes makes the two matrices agree.
/// - `InvalidSubjectBlock { rows, obs_per_subject }`
///   A stacked quantity matrix cannot be split into equal subject blocks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RPError {
    // ---- Shape validation ----
    #[error(
        "Price and quantity matrices must have the same shape: prices {prices:?} vs quantities {quantities:?}."
    )]
    ShapeMismatch { prices: (usize, usize), quantities: (usize, usize) },

    #[error("Need at least one observation and one good; got shape ({rows}, {cols}).")]
    EmptyObservations { rows: usize, cols: usize },

    // ---- Value validation ----
    #[error("{matrix} entry at ({row}, {col}) is non-finite: {value}")]
    NonFiniteValue { matrix: &'static str, row: usize, col: usize, value: f64 },

    #[error("{matrix} entry at ({row}, {col}) is negative: {value}")]
    NegativeValue { matrix: &'static str, row: usize, col: usize, value: f64 },

    // ---- Efficiency / search configuration ----
    #[error("Invalid efficiency value: {0}. Must be a finite number in [0, 1].")]
    InvalidEfficiency(f64),

    #[error("Invalid CCEI search options: {reason}")]
    InvalidCceiOptions { reason: &'static str },

    // ---- Alignment / segmentation ----
    #[error(
        "Incompatible shapes: prices {prices:?} vs quantities {quantities:?}. Please transpose one of the matrices."
    )]
    IncompatibleShapes { prices: (usize, usize), quantities: (usize, usize) },

    #[error(
        "Total data rows ({rows}) is not divisible into blocks of {obs_per_subject} observations per subject."
    )]
    InvalidSubjectBlock { rows: usize, obs_per_subject: usize },
}

#[cfg(feature = "python-bindings")]
impl From<RPError> for PyErr {
    fn from(err: RPError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
