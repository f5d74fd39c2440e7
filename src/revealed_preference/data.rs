//! revealed_preference::data — validated observation sets and reshaping.
//!
//! Purpose
//! -------
//! Hold one subject's price/quantity observations in a validated container,
//! and provide the two pure reshaping helpers that sit between raw tabular
//! input and the engine: transpose-based shape alignment and segmentation of
//! a stacked quantity matrix into per-subject blocks.
//!
//! Key behaviors
//! -------------
//! - [`ObservationSet::new`] enforces equal non-empty shapes and finite,
//!   non-negative entries once, so downstream code can skip re-validation.
//! - [`align_shapes`] transposes the quantity matrix when that is the only
//!   way to make the two matrices agree; it never guesses beyond that.
//! - [`split_subjects`] cuts a `(S·T)×N` matrix into `S` consecutive `T×N`
//!   blocks.
//!
//! Invariants & assumptions
//! ------------------------
//! - Rows index observations, columns index goods.
//! - All returned matrices are owned and in standard (row-major) layout.
//!
//! Conventions
//! -----------
//! - Subject identifiers are 1-based and follow block order.

use crate::revealed_preference::{
    errors::{RPError, RPResult},
    validation::validate_observations,
};
use ndarray::{Array2, Axis};

/// ObservationSet — one subject's validated price/quantity data.
///
/// Fields
/// ------
/// - `prices`: `Array2<f64>` — `T×N`, finite and non-negative.
/// - `quantities`: `Array2<f64>` — `T×N`, finite and non-negative.
///
/// Invariants
/// ----------
/// - `prices.dim() == quantities.dim()`, `T ≥ 1`, `N ≥ 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSet {
    prices: Array2<f64>,
    quantities: Array2<f64>,
}

impl ObservationSet {
    /// Construct a validated observation set.
    ///
    /// Errors
    /// ------
    /// - `RPError::ShapeMismatch` / `RPError::EmptyObservations` for bad
    ///   shapes.
    /// - `RPError::NonFiniteValue` / `RPError::NegativeValue` for the first
    ///   offending entry, prices scanned before quantities.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_revpref::revealed_preference::data::ObservationSet;
    /// let obs = ObservationSet::new(array![[1.0, 2.0]], array![[3.0, 0.0]]).unwrap();
    /// assert_eq!((obs.n_obs(), obs.n_goods()), (1, 2));
    /// ```
    pub fn new(prices: Array2<f64>, quantities: Array2<f64>) -> RPResult<Self> {
        validate_observations(&prices, &quantities)?;
        Ok(ObservationSet { prices, quantities })
    }

    /// Like [`ObservationSet::new`], after [`align_shapes`].
    pub fn aligned(prices: Array2<f64>, quantities: Array2<f64>) -> RPResult<Self> {
        let (prices, quantities) = align_shapes(prices, quantities)?;
        Self::new(prices, quantities)
    }

    pub fn prices(&self) -> &Array2<f64> {
        &self.prices
    }

    pub fn quantities(&self) -> &Array2<f64> {
        &self.quantities
    }

    /// Number of observations `T`.
    pub fn n_obs(&self) -> usize {
        self.prices.nrows()
    }

    /// Number of goods `N`.
    pub fn n_goods(&self) -> usize {
        self.prices.ncols()
    }
}

/// Make `prices` and `quantities` the same shape by transposing if needed.
///
/// Equal shapes are returned as given. Otherwise, if `quantities` has the
/// transposed shape of `prices`, it is transposed; transposing `prices`
/// instead would agree in exactly the same cases, so prices are always kept
/// in their given orientation.
///
/// Errors
/// ------
/// - `RPError::IncompatibleShapes` when no combination agrees.
pub fn align_shapes(
    prices: Array2<f64>, quantities: Array2<f64>,
) -> RPResult<(Array2<f64>, Array2<f64>)> {
    let p_dim = prices.dim();
    let q_dim = quantities.dim();

    if p_dim == q_dim {
        Ok((prices, quantities))
    } else if p_dim == (q_dim.1, q_dim.0) {
        tracing::debug!(?p_dim, ?q_dim, "transposing quantities to match prices");
        Ok((prices, quantities.t().as_standard_layout().into_owned()))
    } else {
        Err(RPError::IncompatibleShapes { prices: p_dim, quantities: q_dim })
    }
}

/// Split a stacked `(S·T)×N` quantity matrix into `S` blocks of `T` rows.
///
/// Errors
/// ------
/// - `RPError::InvalidSubjectBlock` when `obs_per_subject == 0`, the matrix
///   has no rows, or the row count is not a multiple of `obs_per_subject`.
pub fn split_subjects(stacked: &Array2<f64>, obs_per_subject: usize) -> RPResult<Vec<Array2<f64>>> {
    let rows = stacked.nrows();
    if obs_per_subject == 0 || rows == 0 || rows % obs_per_subject != 0 {
        return Err(RPError::InvalidSubjectBlock { rows, obs_per_subject });
    }

    let blocks: Vec<Array2<f64>> =
        stacked.axis_chunks_iter(Axis(0), obs_per_subject).map(|b| b.to_owned()).collect();
    tracing::debug!(
        subjects = blocks.len(),
        obs_per_subject,
        goods = stacked.ncols(),
        "split stacked quantities into subject blocks"
    );
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `ObservationSet::new` success and value-error paths.
    // - `align_shapes` for equal, transposed, and incompatible shapes.
    // - `split_subjects` block order and its error branches.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that a well-formed pair is accepted and dimensions reported.
    //
    // Given
    // -----
    // - 3 observations of 2 goods.
    //
    // Expect
    // ------
    // - `n_obs() == 3`, `n_goods() == 2`, matrices stored unchanged.
    fn observation_set_new_valid_input_succeeds() {
        let p = array![[1.0, 2.0], [2.0, 1.0], [1.0, 1.0]];
        let q = array![[0.0, 1.0], [1.0, 0.0], [0.5, 0.5]];

        let obs = ObservationSet::new(p.clone(), q.clone()).unwrap();

        assert_eq!((obs.n_obs(), obs.n_goods()), (3, 2));
        assert_eq!(obs.prices(), &p);
        assert_eq!(obs.quantities(), &q);
    }

    #[test]
    // Purpose
    // -------
    // Ensure prices are scanned before quantities and that negative or
    // non-finite values are rejected.
    //
    // Given
    // -----
    // - A negative price and an infinite quantity in the same call; then an
    //   infinite quantity alone.
    //
    // Expect
    // ------
    // - `NegativeValue` on prices first, then `NonFiniteValue` on quantities.
    fn observation_set_new_rejects_bad_values_prices_first() {
        let bad_p = array![[1.0, -3.0]];
        let bad_q = array![[f64::INFINITY, 1.0]];

        let first = ObservationSet::new(bad_p, bad_q.clone());
        let second = ObservationSet::new(array![[1.0, 3.0]], bad_q);

        assert_eq!(
            first,
            Err(RPError::NegativeValue { matrix: "prices", row: 0, col: 1, value: -3.0 })
        );
        assert_eq!(
            second,
            Err(RPError::NonFiniteValue {
                matrix: "quantities",
                row: 0,
                col: 0,
                value: f64::INFINITY
            })
        );
    }

    #[test]
    // Purpose
    // -------
    // Check that a quantity matrix entered goods-by-observations is
    // transposed to match the prices.
    //
    // Given
    // -----
    // - Prices (3, 2), quantities (2, 3).
    //
    // Expect
    // ------
    // - Prices unchanged; quantities become their transpose.
    fn align_shapes_transposes_quantities_when_needed() {
        let p = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let q = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];

        let (p_al, q_al) = align_shapes(p.clone(), q).unwrap();

        assert_eq!(p_al, p);
        assert_eq!(q_al, array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]);
        assert!(q_al.is_standard_layout());
    }

    #[test]
    // Purpose
    // -------
    // Ensure matching shapes pass through and impossible shapes fail.
    //
    // Given
    // -----
    // - Equal shapes (2, 2); then (2, 3) vs (4, 1).
    //
    // Expect
    // ------
    // - Identity on equal shapes; `IncompatibleShapes` otherwise.
    fn align_shapes_equal_passes_and_incompatible_fails() {
        let p = array![[1.0, 2.0], [3.0, 4.0]];
        let q = array![[4.0, 3.0], [2.0, 1.0]];
        assert_eq!(align_shapes(p.clone(), q.clone()).unwrap(), (p, q));

        let result = align_shapes(Array2::zeros((2, 3)), Array2::zeros((4, 1)));
        assert_eq!(result, Err(RPError::IncompatibleShapes { prices: (2, 3), quantities: (4, 1) }));
    }

    #[test]
    fn observation_set_aligned_accepts_transposed_quantities() {
        let obs = ObservationSet::aligned(Array2::ones((3, 2)), Array2::ones((2, 3))).unwrap();
        assert_eq!(obs.quantities().dim(), (3, 2));
    }

    #[test]
    // Purpose
    // -------
    // Verify subject blocks are consecutive and in input order.
    //
    // Given
    // -----
    // - 6 stacked rows, 2 observations per subject.
    //
    // Expect
    // ------
    // - 3 blocks equal to rows {0,1}, {2,3}, {4,5}.
    fn split_subjects_returns_blocks_in_order() {
        let stacked = Array2::from_shape_fn((6, 2), |(i, j)| (10 * i + j) as f64);

        let blocks = split_subjects(&stacked, 2).unwrap();

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], array![[0.0, 1.0], [10.0, 11.0]]);
        assert_eq!(blocks[2], array![[40.0, 41.0], [50.0, 51.0]]);
    }

    #[test]
    fn split_subjects_rejects_uneven_or_empty_blocks() {
        let stacked = Array2::<f64>::ones((7, 2));
        assert_eq!(
            split_subjects(&stacked, 3),
            Err(RPError::InvalidSubjectBlock { rows: 7, obs_per_subject: 3 })
        );
        assert!(split_subjects(&stacked, 0).is_err());
        assert!(split_subjects(&Array2::<f64>::zeros((0, 2)), 2).is_err());
    }
}
