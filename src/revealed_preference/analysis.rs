//! revealed_preference::analysis — per-subject and batch result records.
//!
//! Purpose
//! -------
//! Run the full pipeline (relations at `e = 1`, WARP/SARP/GARP counts, CCEI
//! search) for one subject or for a batch of subjects sharing one price
//! matrix, and return plain result records ready for tabular export.
//!
//! Key behaviors
//! -------------
//! - [`RPOutcome::analyse`] / [`RPOutcome::analyse_with`] compute the four
//!   reported fields for one observation set.
//! - [`analyse_subjects`] aligns every subject's quantities against the
//!   shared prices and analyses the subjects in parallel (rayon). Subjects
//!   that fail alignment or validation are reported in
//!   [`SubjectBatch::skipped`] instead of aborting the batch.
//! - [`analyse_stacked`] first splits a stacked quantity matrix into
//!   equal-size subject blocks.
//!
//! Invariants & assumptions
//! ------------------------
//! - Subjects share only the immutable price matrix; every subject builds its
//!   own relations, so parallel evaluation is free of shared mutable state.
//! - Output order always follows input order, regardless of scheduling.
//! - Subject ids are 1-based positions in the input.
//!
//! Conventions
//! -----------
//! - Serialized field names match the spreadsheet header used by downstream
//!   tooling: `Subject_ID`, `WARP_Violations`, `SARP_Violations`,
//!   `GARP_Violations`, `CCEI_Score`.

use crate::revealed_preference::{
    axioms::AxiomCounts,
    ccei::{CceiOptions, CceiOutcome, bisect_ccei},
    data::{ObservationSet, split_subjects},
    errors::{RPError, RPResult},
    relations::Relations,
};
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// RPOutcome — revealed-preference summary of one subject.
///
/// Fields
/// ------
/// - `warp_violations`, `sarp_violations`, `garp_violations`: number of
///   observations implicated in at least one violation, at `e = 1`.
/// - `ccei`: Critical Cost Efficiency Index in `[0, 1]`; exactly `1.0` iff
///   `garp_violations == 0`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RPOutcome {
    #[serde(rename = "WARP_Violations")]
    pub warp_violations: usize,
    #[serde(rename = "SARP_Violations")]
    pub sarp_violations: usize,
    #[serde(rename = "GARP_Violations")]
    pub garp_violations: usize,
    #[serde(rename = "CCEI_Score")]
    pub ccei: f64,
}

impl RPOutcome {
    /// Analyse one subject with default CCEI stopping rules.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// use ndarray::array;
    /// use rust_revpref::revealed_preference::{ObservationSet, RPOutcome};
    ///
    /// let obs = ObservationSet::new(
    ///     array![[1.0, 1.0], [1.0, 1.0]],
    ///     array![[2.0, 0.0], [0.0, 2.0]],
    /// ).unwrap();
    /// let out = RPOutcome::analyse(&obs).unwrap();
    ///
    /// assert_eq!(out.warp_violations, 2);
    /// assert_eq!(out.garp_violations, 0);
    /// assert_eq!(out.ccei, 1.0);
    /// ```
    pub fn analyse(observations: &ObservationSet) -> RPResult<Self> {
        Self::analyse_with(observations, &CceiOptions::default())
    }

    /// Analyse one subject with explicit CCEI stopping rules.
    ///
    /// The `e = 1` relations are built once; their GARP count doubles as the
    /// CCEI fast-path check.
    pub fn analyse_with(observations: &ObservationSet, opts: &CceiOptions) -> RPResult<Self> {
        let prices = observations.prices();
        let quantities = observations.quantities();

        let relations = Relations::at_full_efficiency(prices, quantities)?;
        let counts = AxiomCounts::from_relations(&relations);
        let ccei = if counts.garp == 0 {
            CceiOutcome::fully_efficient()
        } else {
            bisect_ccei(prices, quantities, opts)?
        };

        Ok(RPOutcome {
            warp_violations: counts.warp,
            sarp_violations: counts.sarp,
            garp_violations: counts.garp,
            ccei: ccei.ccei(),
        })
    }

    /// Counts as an [`AxiomCounts`] value.
    pub fn counts(&self) -> AxiomCounts {
        AxiomCounts {
            warp: self.warp_violations,
            sarp: self.sarp_violations,
            garp: self.garp_violations,
        }
    }
}

/// SubjectOutcome — one row of a batch result table.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectOutcome {
    #[serde(rename = "Subject_ID")]
    pub subject_id: usize,
    #[serde(flatten)]
    pub outcome: RPOutcome,
}

/// SkippedSubject — a subject left out of a batch, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSubject {
    pub subject_id: usize,
    pub error: RPError,
}

/// SubjectBatch — ordered batch results.
///
/// `outcomes` and `skipped` are each sorted by `subject_id`, and together
/// cover every input subject exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectBatch {
    pub outcomes: Vec<SubjectOutcome>,
    pub skipped: Vec<SkippedSubject>,
}

impl SubjectBatch {
    /// Number of subjects in the batch, analysed or skipped.
    pub fn len(&self) -> usize {
        self.outcomes.len() + self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Analyse several subjects that faced the same prices.
///
/// Each quantity matrix is aligned against `prices` (see
/// [`align_shapes`](crate::revealed_preference::data::align_shapes)) and
/// validated before analysis. Subjects are evaluated in parallel; results are
/// returned in input order.
pub fn analyse_subjects(
    prices: &Array2<f64>, subjects: &[Array2<f64>], opts: &CceiOptions,
) -> SubjectBatch {
    let results: Vec<(usize, RPResult<RPOutcome>)> = subjects
        .par_iter()
        .enumerate()
        .map(|(idx, quantities)| {
            let subject_id = idx + 1;
            let result = ObservationSet::aligned(prices.clone(), quantities.clone())
                .and_then(|obs| RPOutcome::analyse_with(&obs, opts));
            (subject_id, result)
        })
        .collect();

    let mut batch = SubjectBatch::default();
    for (subject_id, result) in results {
        match result {
            Ok(outcome) => batch.outcomes.push(SubjectOutcome { subject_id, outcome }),
            Err(error) => {
                tracing::warn!(subject_id, %error, "skipping subject");
                batch.skipped.push(SkippedSubject { subject_id, error });
            }
        }
    }

    tracing::debug!(
        analysed = batch.outcomes.len(),
        skipped = batch.skipped.len(),
        "revealed-preference batch finished"
    );
    batch
}

/// Split `stacked` into blocks of `obs_per_subject` rows, then run
/// [`analyse_subjects`].
///
/// Errors
/// ------
/// - `RPError::InvalidSubjectBlock` when the stacked matrix cannot be split.
///   Per-subject failures do not error; they land in
///   [`SubjectBatch::skipped`].
pub fn analyse_stacked(
    prices: &Array2<f64>, stacked: &Array2<f64>, obs_per_subject: usize, opts: &CceiOptions,
) -> RPResult<SubjectBatch> {
    let subjects = split_subjects(stacked, obs_per_subject)?;
    Ok(analyse_subjects(prices, &subjects, opts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revealed_preference::ccei::calculate_ccei_with;
    use ndarray::{Axis, array, concatenate};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Single-subject outcomes for the reference scenarios.
    // - Batch ordering, alignment of transposed subjects, and skipping.
    // - Stacked input segmentation.
    // - Serialized field names.
    // -------------------------------------------------------------------------

    fn obs(p: Array2<f64>, q: Array2<f64>) -> ObservationSet {
        ObservationSet::new(p, q).expect("valid test data")
    }

    #[test]
    // Purpose
    // -------
    // Check the three reference scenarios end to end.
    //
    // Given
    // -----
    // - Identical bundles (T = 2, N = 1).
    // - The tie example (T = 2, N = 2).
    // - A single observation.
    //
    // Expect
    // ------
    // - No violations / WARP = SARP = 2, GARP = 0 / no violations; CCEI = 1
    //   in every case.
    fn analyse_reference_scenarios() {
        let same = RPOutcome::analyse(&obs(array![[1.0], [1.0]], array![[1.0], [1.0]])).unwrap();
        let tie = RPOutcome::analyse(&obs(
            array![[1.0, 1.0], [1.0, 1.0]],
            array![[2.0, 0.0], [0.0, 2.0]],
        ))
        .unwrap();
        let single = RPOutcome::analyse(&obs(array![[2.0, 3.0]], array![[1.0, 4.0]])).unwrap();

        assert_eq!(
            same,
            RPOutcome { warp_violations: 0, sarp_violations: 0, garp_violations: 0, ccei: 1.0 }
        );
        assert_eq!(
            tie,
            RPOutcome { warp_violations: 2, sarp_violations: 2, garp_violations: 0, ccei: 1.0 }
        );
        assert_eq!(single.counts(), AxiomCounts::default());
        assert_eq!(single.ccei, 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Ensure the single-subject pipeline reports the same index as the
    // standalone search, on both the fast path and the bisection path.
    //
    // Given
    // -----
    // - The tie example (GARP holds) and a strict two-cycle (GARP fails).
    //
    // Expect
    // ------
    // - `ccei` equals `calculate_ccei_with` for both; 1.0 exactly for the tie.
    fn analyse_with_matches_standalone_ccei_search() {
        let opts = CceiOptions::default();
        let cases = [
            (array![[1.0, 1.0], [1.0, 1.0]], array![[2.0, 0.0], [0.0, 2.0]]),
            (array![[2.0, 1.0], [1.0, 2.0]], array![[2.0, 1.0], [1.0, 2.0]]),
        ];

        let results: Vec<(RPOutcome, f64)> = cases
            .iter()
            .map(|(p, q)| {
                let out = RPOutcome::analyse_with(&obs(p.clone(), q.clone()), &opts).unwrap();
                let direct = calculate_ccei_with(p, q, &opts).unwrap().ccei();
                (out, direct)
            })
            .collect();

        assert_eq!(results[0].0.ccei, 1.0);
        assert_eq!(results[0].0.ccei, results[0].1);
        assert!(results[1].0.garp_violations > 0);
        assert_eq!(results[1].0.ccei, results[1].1);
        assert!(results[1].0.ccei < 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify batch results keep input order, transposed subjects are
    // aligned, and unalignable subjects are skipped with their error.
    //
    // Given
    // -----
    // - Shared prices (2, 3).
    // - Subject 1 consistent, subject 2 a strict two-cycle given as a (3, 2)
    //   goods-by-observations matrix, subject 3 with an incompatible (3, 1)
    //   shape.
    //
    // Expect
    // ------
    // - Outcomes for subjects 1 and 2 in order; subject 2 has GARP = 2 and
    //   CCEI < 1.
    // - Subject 3 skipped with `IncompatibleShapes`.
    fn analyse_subjects_orders_aligns_and_skips() {
        let p = array![[2.0, 1.0, 0.0], [1.0, 2.0, 0.0]];
        let consistent = array![[1.0, 2.0, 0.0], [2.0, 1.0, 0.0]];
        let cycle_transposed = array![[2.0, 1.0], [1.0, 2.0], [0.0, 0.0]];
        let broken = Array2::<f64>::ones((3, 1));

        let batch =
            analyse_subjects(&p, &[consistent, cycle_transposed, broken], &CceiOptions::default());

        assert_eq!(batch.len(), 3);
        let ids: Vec<usize> = batch.outcomes.iter().map(|s| s.subject_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(batch.outcomes[0].outcome.ccei, 1.0);
        assert_eq!(batch.outcomes[1].outcome.garp_violations, 2);
        assert!(batch.outcomes[1].outcome.ccei < 1.0);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].subject_id, 3);
        assert!(matches!(batch.skipped[0].error, RPError::IncompatibleShapes { .. }));
    }

    #[test]
    // Purpose
    // -------
    // Ensure stacked input is split and analysed per block, and uneven
    // stacks are rejected up front.
    //
    // Given
    // -----
    // - Two 2×2 subject blocks stacked into a 4×2 matrix; then a 3×2 stack.
    //
    // Expect
    // ------
    // - Two outcomes matching per-subject analysis; `InvalidSubjectBlock` for
    //   the uneven stack.
    fn analyse_stacked_matches_per_subject_analysis() {
        let p = array![[2.0, 1.0], [1.0, 2.0]];
        let s1 = array![[1.0, 2.0], [2.0, 1.0]];
        let s2 = array![[2.0, 1.0], [1.0, 2.0]];
        let stacked = concatenate(Axis(0), &[s1.view(), s2.view()]).unwrap();
        let opts = CceiOptions::default();

        let batch = analyse_stacked(&p, &stacked, 2, &opts).unwrap();
        let direct = RPOutcome::analyse_with(&obs(p.clone(), s2), &opts).unwrap();

        assert!(batch.skipped.is_empty());
        assert_eq!(batch.outcomes.len(), 2);
        assert_eq!(batch.outcomes[1].outcome, direct);
        assert!(matches!(
            analyse_stacked(&p, &Array2::ones((3, 2)), 2, &opts),
            Err(RPError::InvalidSubjectBlock { rows: 3, obs_per_subject: 2 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Check serialized field names and flattening of subject rows.
    //
    // Given
    // -----
    // - A `SubjectOutcome` with id 7.
    //
    // Expect
    // ------
    // - A flat JSON object with the five spreadsheet header names.
    fn subject_outcome_serializes_with_spreadsheet_headers() {
        let row = SubjectOutcome {
            subject_id: 7,
            outcome: RPOutcome {
                warp_violations: 1,
                sarp_violations: 2,
                garp_violations: 3,
                ccei: 0.5,
            },
        };

        let json = serde_json::to_value(row).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "Subject_ID": 7,
                "WARP_Violations": 1,
                "SARP_Violations": 2,
                "GARP_Violations": 3,
                "CCEI_Score": 0.5
            })
        );
    }
}
