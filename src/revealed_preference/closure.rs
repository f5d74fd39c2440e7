//! revealed_preference::closure — Warshall transitive closure.
//!
//! Purpose
//! -------
//! Turn a direct revealed-preference relation into its transitive closure,
//! i.e. answer "is observation i directly or indirectly revealed preferred to
//! observation j" for every ordered pair.
//!
//! Key behaviors
//! -------------
//! - Treat a square boolean matrix `R` as a directed graph with an edge
//!   `i → j` iff `R[i, j]`.
//! - Add `i → j` whenever a path `i → … → j` exists, using the classic
//!   Warshall triple loop over intermediate nodes `k`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The relation is taken as given: reflexivity is neither forced nor
//!   removed. Callers pass the reflexive direct relation, so the closure is
//!   reflexive as well.
//! - Updates are monotone (edges are only added), so updating in place while
//!   sweeping a fixed `k` is safe.
//! - Cost is O(T³); T is the number of observations for one subject (tens to
//!   low hundreds), so no blocking or bit-packing is attempted.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the trivial sizes, a chain, a cycle, and agreement with
//!   a breadth-first reachability oracle on a fixed graph.

use ndarray::{Array2, Axis, Zip};

/// Return the transitive closure of `relation`.
///
/// Matrices with `T ≤ 1` are returned unchanged.
///
/// Panics
/// ------
/// - Panics if `relation` is not square.
pub fn warshall(relation: &Array2<bool>) -> Array2<bool> {
    let mut closure = relation.clone();
    warshall_in_place(&mut closure);
    closure
}

/// In-place variant of [`warshall`].
pub fn warshall_in_place(closure: &mut Array2<bool>) {
    let (rows, cols) = closure.dim();
    assert_eq!(rows, cols, "transitive closure needs a square relation, got ({rows}, {cols})");
    if rows <= 1 {
        return;
    }

    for k in 0..rows {
        let row_k = closure.row(k).to_owned();
        for mut row_i in closure.axis_iter_mut(Axis(0)) {
            if !row_i[k] {
                continue;
            }
            Zip::from(&mut row_i).and(&row_k).for_each(|r_ij, &r_kj| *r_ij |= r_kj);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::collections::VecDeque;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Trivial sizes (T = 0, T = 1) returned unchanged.
    // - Chains and cycles gaining the expected indirect edges.
    // - Agreement with a BFS reachability oracle.
    // - Reflexivity being preserved but never introduced.
    // -------------------------------------------------------------------------

    /// Reachability by BFS over paths of length ≥ 1.
    fn bfs_reachability(relation: &Array2<bool>) -> Array2<bool> {
        let n = relation.nrows();
        let mut out = Array2::from_elem((n, n), false);
        for start in 0..n {
            let mut queue: VecDeque<usize> = VecDeque::from([start]);
            let mut seen = vec![false; n];
            while let Some(node) = queue.pop_front() {
                for next in 0..n {
                    if relation[[node, next]] && !seen[next] {
                        seen[next] = true;
                        out[[start, next]] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        out
    }

    #[test]
    // Purpose
    // -------
    // Verify that empty and single-node relations are returned unchanged.
    //
    // Given
    // -----
    // - A 0×0 relation, a 1×1 `[false]`, and a 1×1 `[true]`.
    //
    // Expect
    // ------
    // - Each closure equals its input.
    fn warshall_trivial_sizes_are_unchanged() {
        let empty = Array2::<bool>::from_elem((0, 0), false);
        let single_false = array![[false]];
        let single_true = array![[true]];

        assert_eq!(warshall(&empty), empty);
        assert_eq!(warshall(&single_false), single_false);
        assert_eq!(warshall(&single_true), single_true);
    }

    #[test]
    // Purpose
    // -------
    // Check that a chain 0 → 1 → 2 → 3 gains every forward edge and no
    // backward ones.
    //
    // Given
    // -----
    // - A 4-node chain without self-loops.
    //
    // Expect
    // ------
    // - `closure[i, j]` iff `i < j`.
    fn warshall_chain_gains_all_forward_edges() {
        // Arrange
        let mut r = Array2::from_elem((4, 4), false);
        for i in 0..3 {
            r[[i, i + 1]] = true;
        }

        // Act
        let c = warshall(&r);

        // Assert
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(c[[i, j]], i < j, "unexpected closure value at ({i}, {j})");
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure that a 3-cycle closes into the complete relation, self-loops
    // included (paths of length 3 return to the start).
    //
    // Given
    // -----
    // - Edges 0 → 1, 1 → 2, 2 → 0.
    //
    // Expect
    // ------
    // - Every entry of the closure is true.
    fn warshall_cycle_becomes_complete() {
        let r = array![[false, true, false], [false, false, true], [true, false, false]];

        let c = warshall(&r);

        assert!(c.iter().all(|&b| b), "cycle closure should be complete, got {c:?}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that the closure does not introduce reflexive edges for acyclic
    // relations and keeps them when present.
    //
    // Given
    // -----
    // - A two-node relation 0 → 1, with and without an identity diagonal.
    //
    // Expect
    // ------
    // - Diagonal stays false without self-loops, and true with them.
    fn warshall_does_not_force_reflexivity() {
        let bare = array![[false, true], [false, false]];
        let reflexive = array![[true, true], [false, true]];

        let c_bare = warshall(&bare);
        let c_refl = warshall(&reflexive);

        assert!(!c_bare[[0, 0]] && !c_bare[[1, 1]]);
        assert!(c_refl[[0, 0]] && c_refl[[1, 1]]);
        assert!(!c_refl[[1, 0]]);
    }

    #[test]
    // Purpose
    // -------
    // Cross-check Warshall against BFS reachability on an irregular graph
    // with a cycle, a sink, and an isolated node.
    //
    // Given
    // -----
    // - A fixed 6-node relation.
    //
    // Expect
    // ------
    // - Both methods return identical matrices.
    fn warshall_matches_bfs_oracle() {
        // Arrange
        let mut r = Array2::from_elem((6, 6), false);
        for &(i, j) in &[(0, 1), (1, 2), (2, 0), (2, 3), (4, 3), (3, 3)] {
            r[[i, j]] = true;
        }

        // Act
        let c = warshall(&r);
        let oracle = bfs_reachability(&r);

        // Assert
        assert_eq!(c, oracle);
    }
}
