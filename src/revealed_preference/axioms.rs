//! revealed_preference::axioms — WARP, SARP and GARP violation counts.
//!
//! Purpose
//! -------
//! Count, for one set of [`Relations`], how many observations are implicated
//! in at least one violation of each rationality axiom.
//!
//! Key behaviors
//! -------------
//! - WARP: `i` violates if ∃ `j ≠ i` with `DRP[i, j] ∧ DRP[j, i] ∧ diff[i, j]`.
//! - SARP: `i` violates if ∃ `j ≠ i` with `RP[i, j] ∧ DRP[j, i] ∧ diff[i, j]`.
//! - GARP: `i` violates if ∃ `j` with `RP[i, j] ∧ P0[j, i]`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Counts are per observation, not per pair: `i` contributes at most one
//!   regardless of how many partners `j` it violates with. Symmetric pairs
//!   therefore flag both sides exactly once.
//! - WARP and SARP are vacuous for `T < 2`; GARP for `T < 1`.
//! - A dataset satisfies an axiom iff its count is zero.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the canonical tie example (WARP but not GARP), a strict
//!   two-cycle, an indirect three-cycle only SARP/GARP can see, and
//!   agreement with brute-force pair oracles.

use crate::revealed_preference::relations::Relations;
use serde::{Deserialize, Serialize};

/// Rationality axioms checked by the engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axiom {
    Warp,
    Sarp,
    Garp,
}

impl Axiom {
    pub const ALL: [Axiom; 3] = [Axiom::Warp, Axiom::Sarp, Axiom::Garp];

    /// Number of observations violating this axiom under `relations`.
    pub fn count(self, relations: &Relations) -> usize {
        match self {
            Axiom::Warp => count_warp(relations),
            Axiom::Sarp => count_sarp(relations),
            Axiom::Garp => count_garp(relations),
        }
    }
}

impl std::fmt::Display for Axiom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axiom::Warp => write!(f, "WARP"),
            Axiom::Sarp => write!(f, "SARP"),
            Axiom::Garp => write!(f, "GARP"),
        }
    }
}

/// Violation counts for all three axioms at one efficiency level.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxiomCounts {
    pub warp: usize,
    pub sarp: usize,
    pub garp: usize,
}

impl AxiomCounts {
    pub fn from_relations(relations: &Relations) -> Self {
        AxiomCounts {
            warp: count_warp(relations),
            sarp: count_sarp(relations),
            garp: count_garp(relations),
        }
    }

    /// Count for a single axiom.
    pub fn get(&self, axiom: Axiom) -> usize {
        match axiom {
            Axiom::Warp => self.warp,
            Axiom::Sarp => self.sarp,
            Axiom::Garp => self.garp,
        }
    }
}

impl Relations {
    /// Whether the data satisfy `axiom` at this efficiency level.
    pub fn satisfies(&self, axiom: Axiom) -> bool {
        axiom.count(self) == 0
    }
}

/// WARP violations: observations mutually directly revealed preferred to a
/// different bundle.
pub fn count_warp(relations: &Relations) -> usize {
    let drp = relations.drp();
    let diff = relations.bundle_diff();
    count_implicated(relations.n_obs(), 2, |i, j| {
        i != j && drp[[i, j]] && drp[[j, i]] && diff[[i, j]]
    })
}

/// SARP violations: `i` (in)directly preferred to a different bundle `j`
/// that is itself directly preferred to `i`.
pub fn count_sarp(relations: &Relations) -> usize {
    let rp = relations.rp();
    let drp = relations.drp();
    let diff = relations.bundle_diff();
    count_implicated(relations.n_obs(), 2, |i, j| {
        i != j && rp[[i, j]] && drp[[j, i]] && diff[[i, j]]
    })
}

/// GARP violations: `i` (in)directly preferred to `j` while `j` is strictly
/// directly preferred to `i`.
pub fn count_garp(relations: &Relations) -> usize {
    let rp = relations.rp();
    let p0 = relations.p0();
    count_implicated(relations.n_obs(), 1, |i, j| rp[[i, j]] && p0[[j, i]])
}

/// Number of rows `i` for which some column `j` satisfies `violates(i, j)`.
/// Returns zero when `n_obs < min_obs`.
#[inline]
fn count_implicated(
    n_obs: usize, min_obs: usize, violates: impl Fn(usize, usize) -> bool,
) -> usize {
    if n_obs < min_obs {
        return 0;
    }
    (0..n_obs).filter(|&i| (0..n_obs).any(|j| violates(i, j))).count()
}
