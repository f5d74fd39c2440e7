//! revealed_preference — WARP/SARP/GARP consistency tests and Afriat's CCEI.
//!
//! Purpose
//! -------
//! Test consumer choice data (observed price/quantity pairs over repeated
//! observations) for consistency with the revealed-preference axioms, and
//! measure how far inconsistent data are from rationality with the Critical
//! Cost Efficiency Index.
//!
//! Key behaviors
//! -------------
//! - [`relations`] builds the weak direct (DRP), strict direct (P0) and
//!   transitive (RP) revealed-preference relations at an efficiency level
//!   `e`, plus pairwise bundle-difference flags.
//! - [`closure`] computes the transitive closure with Warshall's algorithm.
//! - [`axioms`] counts the observations implicated in WARP, SARP and GARP
//!   violations.
//! - [`ccei`] bisects on `e` for the largest level at which GARP holds.
//! - [`data`] and [`analysis`] wrap the engine into validated per-subject and
//!   batch pipelines producing serializable result records.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are `T×N` matrices (rows = observations, columns = goods) of
//!   finite, non-negative reals, with equal shapes and `T, N ≥ 1`.
//! - Every computation is a pure function of `(P, Q, e)`; nothing is cached
//!   between calls, so repeated analyses of the same data are identical.
//! - Violation counts are per observation: an observation counts once if it
//!   takes part in at least one violating pair.
//!
//! Data flow
//! ---------
//! ```text
//! (P, Q, e) ─► relations ─► closure ─► axioms ─► counts
//!                 ▲                        │
//!                 └──────── ccei ◄─────────┘  (re-evaluated per trial e)
//! ```
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use ndarray::array;
//! use rust_revpref::revealed_preference::{ObservationSet, RPOutcome};
//!
//! let obs = ObservationSet::new(
//!     array![[2.0, 1.0], [1.0, 2.0]],
//!     array![[2.0, 1.0], [1.0, 2.0]],
//! )?;
//! let outcome = RPOutcome::analyse(&obs)?;
//! assert_eq!(outcome.garp_violations, 2);
//! assert!(outcome.ccei < 1.0);
//! # Ok::<(), rust_revpref::revealed_preference::RPError>(())
//! ```
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own branches.
//! - `tests/` holds an end-to-end pipeline test and property tests with
//!   brute-force oracles for the axioms and the closure.

pub mod analysis;
pub mod axioms;
pub mod ccei;
pub mod closure;
pub mod data;
pub mod errors;
pub mod relations;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::analysis::{
    RPOutcome, SkippedSubject, SubjectBatch, SubjectOutcome, analyse_stacked, analyse_subjects,
};
pub use self::axioms::{Axiom, AxiomCounts, count_garp, count_sarp, count_warp};
pub use self::ccei::{CceiOptions, CceiOutcome, calculate_ccei, calculate_ccei_with};
pub use self::closure::warshall;
pub use self::data::{ObservationSet, align_shapes, split_subjects};
pub use self::errors::{RPError, RPResult};
pub use self::relations::{Relations, build_relations};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::analysis::{RPOutcome, SubjectBatch, SubjectOutcome, analyse_subjects};
    pub use super::ccei::{CceiOptions, calculate_ccei};
    pub use super::data::ObservationSet;
    pub use super::errors::{RPError, RPResult};
}
