//! revealed_preference::relations — expenditure comparisons and RP relations.
//!
//! Purpose
//! -------
//! Build the revealed-preference relations of one subject at a given
//! efficiency level `e`:
//!
//! ```text
//! E[i, j]   = ⟨P[i], Q[j]⟩                    (cost of bundle j at prices i)
//! DRP[i, j] = e·E[i, i] ≥ E[i, j]   (i ≠ j),  DRP[i, i] = true
//! P0[i, j]  = e·E[i, i] − E[i, j] > ε (i ≠ j), P0[i, i]  = false
//! RP        = transitive closure of DRP
//! diff[i, j] = Q[i] ≠ Q[j] in at least one component
//! ```
//!
//! with `ε = 1e-9` so that exact expenditure ties never count as strict.
//!
//! Key behaviors
//! -------------
//! - [`build_relations`] validates shapes, entries and `e`, then computes every
//!   relation from scratch; nothing is cached between calls.
//! - [`Relations`] owns the resulting boolean matrices and exposes them
//!   read-only to the axiom checkers.
//!
//! Invariants & assumptions
//! ------------------------
//! - All relation matrices are `T×T`; `drp` and `rp` are reflexive, `p0` has
//!   a false diagonal, `p0 ⟹ drp`, and `rp ⊇ drp`.
//! - Only the diagonal self-expenditure is rescaled by `e`; off-diagonal
//!   expenditures do not depend on `e`.
//! - No division happens here, so all-zero price or quantity rows yield
//!   well-defined (usually trivially satisfied) relations.
//!
//! Conventions
//! -----------
//! - Rows of `P` and `Q` index observations, columns index goods.
//! - Bundle equality is exact: quantities are assumed to be given at a
//!   representable precision.

use crate::revealed_preference::{
    closure::warshall,
    errors::RPResult,
    validation::{validate_efficiency, validate_observations},
};
use ndarray::{Array1, Array2, Zip};

/// Margin a strict comparison must clear to count as strict preference.
pub const STRICT_EPSILON: f64 = 1e-9;

/// Relations — revealed-preference relations of one subject at one `e`.
///
/// Fields
/// ------
/// - `efficiency`: the `e` the relations were built at.
/// - `expenditure`: `E = P · Qᵗ`, unscaled.
/// - `drp`: weak direct revealed preference.
/// - `p0`: strict direct revealed preference.
/// - `rp`: transitive closure of `drp`.
/// - `bundle_diff`: pairwise "bundles differ" flags, independent of `e`.
///
/// Invariants
/// ----------
/// - See the module-level documentation; all invariants are established by
///   [`build_relations`] and fields are never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Relations {
    efficiency: f64,
    expenditure: Array2<f64>,
    drp: Array2<bool>,
    p0: Array2<bool>,
    rp: Array2<bool>,
    bundle_diff: Array2<bool>,
}

impl Relations {
    /// Relations at full efficiency (`e = 1`).
    pub fn at_full_efficiency(prices: &Array2<f64>, quantities: &Array2<f64>) -> RPResult<Self> {
        build_relations(prices, quantities, 1.0)
    }

    /// Number of observations `T`.
    pub fn n_obs(&self) -> usize {
        self.drp.nrows()
    }

    /// Efficiency level the relations were built at.
    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Expenditure matrix `E[i, j] = ⟨P[i], Q[j]⟩`.
    pub fn expenditure(&self) -> &Array2<f64> {
        &self.expenditure
    }

    /// Weak direct revealed preference (reflexive).
    pub fn drp(&self) -> &Array2<bool> {
        &self.drp
    }

    /// Strict direct revealed preference (irreflexive).
    pub fn p0(&self) -> &Array2<bool> {
        &self.p0
    }

    /// Revealed preference: transitive closure of [`drp`](Self::drp).
    pub fn rp(&self) -> &Array2<bool> {
        &self.rp
    }

    /// `bundle_diff[i, j]` iff bundles `i` and `j` differ somewhere.
    pub fn bundle_diff(&self) -> &Array2<bool> {
        &self.bundle_diff
    }
}

/// Build DRP, P0, RP and bundle differences for `(P, Q)` at efficiency `e`.
///
/// Parameters
/// ----------
/// - `prices`: `&Array2<f64>` — `T×N` price matrix.
/// - `quantities`: `&Array2<f64>` — `T×N` quantity matrix.
/// - `efficiency`: `f64` — scalar `e ∈ [0, 1]`; `1.0` is the unadjusted test.
///
/// Errors
/// ------
/// - `RPError::ShapeMismatch` / `RPError::EmptyObservations` when the
///   shapes differ or an axis is empty.
/// - `RPError::NonFiniteValue` / `RPError::NegativeValue` for the first bad
///   entry, prices before quantities.
/// - `RPError::InvalidEfficiency` when `e` is non-finite or outside `[0, 1]`.
///
/// Examples
/// --------
/// ```rust
/// use ndarray::array;
/// use rust_revpref::revealed_preference::relations::build_relations;
///
/// let p = array![[1.0, 1.0], [1.0, 1.0]];
/// let q = array![[2.0, 0.0], [0.0, 2.0]];
/// let rel = build_relations(&p, &q, 1.0).unwrap();
///
/// // Equal expenditures: weakly but not strictly revealed preferred.
/// assert!(rel.drp()[[0, 1]] && !rel.p0()[[0, 1]]);
/// ```
pub fn build_relations(
    prices: &Array2<f64>, quantities: &Array2<f64>, efficiency: f64,
) -> RPResult<Relations> {
    let (n_obs, n_goods) = validate_observations(prices, quantities)?;
    validate_efficiency(efficiency)?;

    let expenditure = expenditure_matrix(prices, quantities);
    let budget: Array1<f64> = expenditure.diag().mapv(|d| efficiency * d);

    let mut drp = Array2::from_elem((n_obs, n_obs), false);
    let mut p0 = Array2::from_elem((n_obs, n_obs), false);
    Zip::indexed(&mut drp).and(&mut p0).and(&expenditure).for_each(|(i, j), weak, strict, &e_ij| {
        if i == j {
            *weak = true;
        } else {
            *weak = budget[i] >= e_ij;
            *strict = budget[i] - e_ij > STRICT_EPSILON;
        }
    });

    let rp = warshall(&drp);
    let bundle_diff = bundle_differences(quantities);

    tracing::trace!(n_obs, n_goods, efficiency, "built revealed-preference relations");

    Ok(Relations { efficiency, expenditure, drp, p0, rp, bundle_diff })
}

/// Expenditure matrix `E = P · Qᵗ`.
///
/// Shapes are not validated here; callers go through [`build_relations`] or
/// validate first.
pub fn expenditure_matrix(prices: &Array2<f64>, quantities: &Array2<f64>) -> Array2<f64> {
    prices.dot(&quantities.t())
}

/// Pairwise bundle-difference flags for the rows of `quantities`.
///
/// `diff[i, j]` is true iff some component of `Q[i]` differs from `Q[j]`
/// under exact `f64` comparison. The result is symmetric with a false
/// diagonal.
pub fn bundle_differences(quantities: &Array2<f64>) -> Array2<bool> {
    let n_obs = quantities.nrows();
    Array2::from_shape_fn((n_obs, n_obs), |(i, j)| {
        i != j && quantities.row(i).iter().zip(quantities.row(j)).any(|(a, b)| a != b)
    })
}
