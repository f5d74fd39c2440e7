//! revealed_preference::ccei — Afriat's Critical Cost Efficiency Index.
//!
//! Purpose
//! -------
//! Find the largest efficiency level `e* ∈ [0, 1]` at which the data satisfy
//! GARP once every budget is deflated by `e`, i.e. with
//! `DRP(e)[i, j] = e·E[i, i] ≥ E[i, j]` and the matching strict relation.
//!
//! Key behaviors
//! -------------
//! - Fast path: if GARP holds at `e = 1`, return exactly `1.0` without
//!   searching.
//! - Otherwise bisect on `[lower, upper] = [0, 1]`, where `lower` is always
//!   GARP-satisfying and `upper` always violating. Each trial rebuilds the
//!   relations from scratch at the midpoint.
//! - Stop at the iteration cap, when the bracket is narrower than the
//!   tolerance, or when the midpoint equals a bound (floating-point floor).
//! - Report `lower`, so the returned index never overshoots into an
//!   infeasible efficiency level.
//!
//! Invariants & assumptions
//! ------------------------
//! - GARP-satisfaction is monotone in `e`: DRP, P0 and RP only shrink as `e`
//!   decreases, and a violation needs both `RP[i, j]` and `P0[j, i]`. So the
//!   data satisfy GARP below `e*` and violate it above. The property tests
//!   also check this on a grid of efficiency levels.
//! - Entries are checked to be finite and non-negative on entry. With such
//!   data GARP always holds at `e = 0` (no strict preference survives a zero
//!   budget), so `lower = 0` is a valid start.
//! - Trials share no state: each one validates and builds its own
//!   [`Relations`](crate::revealed_preference::relations::Relations).
//!
//! Conventions
//! -----------
//! - The tolerance is absolute on the bracket width `upper − lower`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the fast path, a strict two-cycle with a closed-form
//!   index, option validation, and the tolerance vs. floating-point floor
//!   stopping rules.

use crate::revealed_preference::{
    axioms::count_garp,
    errors::{RPError, RPResult},
    relations::build_relations,
    validation::validate_observations,
};
use ndarray::Array2;

/// CceiOptions — stopping rules for the CCEI bisection.
///
/// Fields
/// ------
/// - `max_iter`: `usize`
///   Upper bound on the number of bisection trials. 60 already reaches the
///   double-precision floor; the default is 100.
/// - `tolerance`: `f64`
///   Absolute bracket width below which the search stops. Default `1e-6`;
///   `0.0` runs until the floating-point floor or the iteration cap.
///
/// Invariants
/// ----------
/// - `max_iter ≥ 1` and `tolerance` is finite and `≥ 0` when built through
///   [`CceiOptions::new`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CceiOptions {
    pub max_iter: usize,
    pub tolerance: f64,
}

impl CceiOptions {
    /// Validated constructor.
    ///
    /// Errors
    /// ------
    /// - `RPError::InvalidCceiOptions` when `max_iter == 0`, or when
    ///   `tolerance` is negative or non-finite.
    pub fn new(max_iter: usize, tolerance: f64) -> RPResult<Self> {
        if max_iter == 0 {
            return Err(RPError::InvalidCceiOptions { reason: "max_iter must be at least 1" });
        }
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(RPError::InvalidCceiOptions {
                reason: "tolerance must be finite and non-negative",
            });
        }
        Ok(CceiOptions { max_iter, tolerance })
    }
}

impl Default for CceiOptions {
    fn default() -> Self {
        CceiOptions { max_iter: 100, tolerance: 1e-6 }
    }
}

/// CceiOutcome — result of one CCEI search.
///
/// - `ccei`: the index, in `[0, 1]`.
/// - `iterations`: number of bisection trials evaluated (0 on the fast path).
/// - `converged`: `true` when a stopping rule other than the iteration cap
///   ended the search (always `true` on the fast path).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CceiOutcome {
    ccei: f64,
    iterations: usize,
    converged: bool,
}

impl CceiOutcome {
    /// Fast-path outcome for GARP-consistent data.
    pub(crate) fn fully_efficient() -> Self {
        CceiOutcome { ccei: 1.0, iterations: 0, converged: true }
    }

    pub fn ccei(&self) -> f64 {
        self.ccei
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}

/// Compute the CCEI of `(P, Q)` with [`CceiOptions::default`].
///
/// Errors
/// ------
/// - `RPError::ShapeMismatch` / `RPError::EmptyObservations` on bad shapes.
/// - `RPError::NonFiniteValue` / `RPError::NegativeValue` on bad entries.
///
/// Examples
/// --------
/// ```rust
/// use ndarray::array;
/// use rust_revpref::revealed_preference::ccei::calculate_ccei;
///
/// // Consistent data: the fast path returns exactly 1.0.
/// let p = array![[1.0], [1.0]];
/// let q = array![[1.0], [1.0]];
/// assert_eq!(calculate_ccei(&p, &q).unwrap(), 1.0);
/// ```
pub fn calculate_ccei(prices: &Array2<f64>, quantities: &Array2<f64>) -> RPResult<f64> {
    Ok(calculate_ccei_with(prices, quantities, &CceiOptions::default())?.ccei)
}

/// Compute the CCEI of `(P, Q)` under explicit stopping rules.
pub fn calculate_ccei_with(
    prices: &Array2<f64>, quantities: &Array2<f64>, opts: &CceiOptions,
) -> RPResult<CceiOutcome> {
    validate_observations(prices, quantities)?;

    if garp_violations_at(prices, quantities, 1.0)? == 0 {
        return Ok(CceiOutcome::fully_efficient());
    }
    bisect_ccei(prices, quantities, opts)
}

/// Bisection part of the search, for data already known to violate GARP at
/// `e = 1`.
pub(crate) fn bisect_ccei(
    prices: &Array2<f64>, quantities: &Array2<f64>, opts: &CceiOptions,
) -> RPResult<CceiOutcome> {
    let (mut lower, mut upper) = (0.0_f64, 1.0_f64);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < opts.max_iter {
        if upper - lower < opts.tolerance {
            converged = true;
            break;
        }
        let e = 0.5 * (lower + upper);
        if e == lower || e == upper {
            converged = true;
            break;
        }

        iterations += 1;
        let violations = garp_violations_at(prices, quantities, e)?;
        if violations == 0 {
            lower = e;
        } else {
            upper = e;
        }
        tracing::trace!(
            iteration = iterations,
            e,
            violations,
            lower,
            upper,
            "ccei bisection step"
        );
    }
    converged = converged || upper - lower < opts.tolerance;

    if !converged {
        tracing::debug!(
            max_iter = opts.max_iter,
            width = upper - lower,
            "ccei bisection hit the iteration cap before the tolerance"
        );
    }

    Ok(CceiOutcome { ccei: lower, iterations, converged })
}

/// GARP violation count of `(P, Q)` with budgets deflated by `e`.
pub fn garp_violations_at(
    prices: &Array2<f64>, quantities: &Array2<f64>, efficiency: f64,
) -> RPResult<usize> {
    let relations = build_relations(prices, quantities, efficiency)?;
    Ok(count_garp(&relations))
}
