//! Duplication relation between half-vectorized and column-stacked forms.

use nalgebra::DMatrix;

use super::vech::{vech_index, vech_len};

/// Build the n² × n(n+1)/2 duplication matrix D with D·vech(L) = vec(L)
/// for any symmetric L.
///
/// Each linear index into the column-stacked form is mapped back to its
/// (row, col) coordinate, reflected to the lower triangle, and converted
/// to its half-vectorized position. Every row holds exactly one 1.
pub fn duplication_matrix(n: usize) -> DMatrix<f64> {
    let mut d = DMatrix::zeros(n * n, vech_len(n));
    for i in 0..n * n {
        let col = i / n;
        let row = i % n;
        d[(i, vech_index(n, row, col))] = 1.0;
    }
    d
}
