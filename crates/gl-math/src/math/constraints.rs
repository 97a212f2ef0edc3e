//! Linear constraints characterizing valid Laplacians in vech coordinates.
//!
//! A symmetric matrix is the Laplacian of a weighted undirected graph iff
//! every row sums to zero and every off-diagonal entry is non-positive.
//! A fixed trace pins the scale so the all-zero matrix is excluded.
//! Both constraint families are expressed directly over the half-vectorized
//! variable, where symmetry is already built in.

use nalgebra::{DMatrix, DVector};

use super::vech::{diagonal_indices, vech_index, vech_len};

/// Half-vectorized positions touched by row r of the matrix: the column
/// segment where r is the larger index plus the row segment where r is
/// the smaller one, diagonal included once.
pub fn row_sum_positions(n: usize, r: usize) -> Vec<usize> {
    (0..n).map(|j| vech_index(n, r, j)).collect()
}

/// Equality constraints: each of the n rows of L sums to zero, and
/// trace(L) equals the given target.
///
/// Returns the (n+1) × n(n+1)/2 coefficient matrix and its right-hand
/// side (n zeros followed by the trace target).
pub fn equality_constraints(n: usize, trace: f64) -> (DMatrix<f64>, DVector<f64>) {
    let mut a = DMatrix::zeros(n + 1, vech_len(n));
    for r in 0..n {
        for p in row_sum_positions(n, r) {
            a[(r, p)] = 1.0;
        }
    }
    for p in diagonal_indices(n) {
        a[(n, p)] = 1.0;
    }
    let mut b = DVector::zeros(n + 1);
    b[n] = trace;
    (a, b)
}

/// Inequality constraints: every off-diagonal entry of vech(L) is
/// non-positive, as B·vech(L) <= 0.
///
/// B is the identity over half-vectorized positions with the diagonal
/// rows dropped, leaving one unit row per off-diagonal position.
pub fn inequality_constraints(n: usize) -> DMatrix<f64> {
    let len = vech_len(n);
    let mut is_diagonal = vec![false; len];
    for p in diagonal_indices(n) {
        is_diagonal[p] = true;
    }
    let mut b = DMatrix::zeros(len - n, len);
    let mut row = 0;
    for (pos, &diag) in is_diagonal.iter().enumerate() {
        if !diag {
            b[(row, pos)] = 1.0;
            row += 1;
        }
    }
    b
}
