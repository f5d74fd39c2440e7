//! revealed_preference::validation — shared input guards.
//!
//! Purpose
//! -------
//! Centralize the input checks performed before any expenditure or relation
//! computation: matching price/quantity shapes, non-empty observation sets,
//! finite non-negative entries, and an admissible efficiency scalar.
//!
//! Key behaviors
//! -------------
//! - Map invalid inputs into structured [`RPError`] values carrying the
//!   expected and actual shapes or the offending entry.
//! - Perform no allocation beyond error construction.
//!
//! Invariants & assumptions
//! ------------------------
//! - Two-dimensionality is enforced by the type system (`Array2`), so the
//!   only shape failures left to detect at runtime are mismatches and empty
//!   axes.
//! - Every public entry point that takes raw matrices runs
//!   [`validate_observations`] before computing anything: the relation
//!   builder, the CCEI search, and
//!   [`ObservationSet::new`](crate::revealed_preference::data::ObservationSet::new).
//!
//! Testing notes
//! -------------
//! - Unit tests exercise every error branch and a success path.

use crate::revealed_preference::errors::{RPError, RPResult};
use ndarray::Array2;

/// Check that prices and quantities share a non-empty `(T, N)` shape.
///
/// Returns the common shape on success.
///
/// Errors
/// ------
/// - `RPError::ShapeMismatch` when `prices.dim() != quantities.dim()`.
/// - `RPError::EmptyObservations` when `T == 0` or `N == 0`.
pub fn validate_shapes(
    prices: &Array2<f64>, quantities: &Array2<f64>,
) -> RPResult<(usize, usize)> {
    let p_dim = prices.dim();
    let q_dim = quantities.dim();
    if p_dim != q_dim {
        return Err(RPError::ShapeMismatch { prices: p_dim, quantities: q_dim });
    }

    let (rows, cols) = p_dim;
    if rows == 0 || cols == 0 {
        return Err(RPError::EmptyObservations { rows, cols });
    }

    Ok(p_dim)
}

/// Check that every entry of `matrix` is finite and non-negative.
///
/// `name` is embedded in the error ("prices" or "quantities"). The scan is
/// row-major and stops at the first offending entry.
pub fn validate_values(name: &'static str, matrix: &Array2<f64>) -> RPResult<()> {
    for ((row, col), &value) in matrix.indexed_iter() {
        if !value.is_finite() {
            return Err(RPError::NonFiniteValue { matrix: name, row, col, value });
        }
        if value < 0.0 {
            return Err(RPError::NegativeValue { matrix: name, row, col, value });
        }
    }
    Ok(())
}

/// Full input check for a price/quantity pair: shapes first, then prices,
/// then quantities.
///
/// Returns the common `(T, N)` shape on success.
pub fn validate_observations(
    prices: &Array2<f64>, quantities: &Array2<f64>,
) -> RPResult<(usize, usize)> {
    let dim = validate_shapes(prices, quantities)?;
    validate_values("prices", prices)?;
    validate_values("quantities", quantities)?;
    Ok(dim)
}

/// Check that the efficiency scalar lies in `[0, 1]`.
#[inline]
pub fn validate_efficiency(efficiency: f64) -> RPResult<()> {
    if !efficiency.is_finite() || !(0.0..=1.0).contains(&efficiency) {
        return Err(RPError::InvalidEfficiency(efficiency));
    }
    Ok(())
}
