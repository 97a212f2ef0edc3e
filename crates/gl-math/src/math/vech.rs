//! Half-vectorization of symmetric matrices.
//!
//! A symmetric n×n matrix has n(n+1)/2 independent entries: the lower
//! triangle including the diagonal, scanned column by column from the
//! diagonal downward. Working in this reduced coordinate system bakes
//! symmetry into the representation instead of constraining it.
//!
//! All index arithmetic in this crate (the duplication matrix, the
//! constraint builders) goes through [`vech_index`] and
//! [`diagonal_indices`] so the three pieces stay mutually consistent.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// Errors for malformed vectorized input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("length {len} is not a triangular number n(n+1)/2")]
    NotTriangular { len: usize },
}

/// Number of entries in the half-vectorization of an n×n symmetric matrix.
pub fn vech_len(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Side length n such that n(n+1)/2 == len.
///
/// Fails when len is not a triangular number (n = (-1+sqrt(1+8*len))/2
/// must come out integral).
pub fn side_from_vech_len(len: usize) -> Result<usize, ShapeError> {
    let n = ((((8 * len + 1) as f64).sqrt() - 1.0) / 2.0).round() as usize;
    if vech_len(n) != len {
        return Err(ShapeError::NotTriangular { len });
    }
    Ok(n)
}

/// Position of entry (row, col) within the half-vectorized layout.
///
/// Coordinates above the diagonal are reflected to the lower triangle
/// first, so the caller may pass either orientation.
pub fn vech_index(n: usize, row: usize, col: usize) -> usize {
    let (r, c) = if row >= col { (row, col) } else { (col, row) };
    // Column c starts after c full columns of decreasing length n, n-1, ...
    c * (2 * n - c + 1) / 2 + (r - c)
}

/// Positions of the diagonal entries (r, r) within the half-vectorized
/// layout, as a cumulative column-offset sum.
pub fn diagonal_indices(n: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity(n);
    let mut offset = 0;
    for r in 0..n {
        indices.push(offset);
        offset += n - r;
    }
    indices
}

/// Half-vectorize a symmetric matrix: the entries on or below the main
/// diagonal, column by column.
///
/// Only the lower triangle is read, so a non-symmetric input silently
/// loses its upper triangle; symmetry is the caller's responsibility.
pub fn vech(m: &DMatrix<f64>) -> Result<DVector<f64>, ShapeError> {
    let n = m.nrows();
    if m.ncols() != n {
        return Err(ShapeError::NotSquare {
            rows: m.nrows(),
            cols: m.ncols(),
        });
    }
    let mut h = DVector::zeros(vech_len(n));
    let mut k = 0;
    for c in 0..n {
        for r in c..n {
            h[k] = m[(r, c)];
            k += 1;
        }
    }
    Ok(h)
}

/// Rebuild a symmetric matrix from its half-vectorization.
///
/// The lower triangle is reconstructed and mirrored to the upper
/// triangle; the diagonal is written once per side so nothing is
/// double-counted.
pub fn unvech(h: &DVector<f64>) -> Result<DMatrix<f64>, ShapeError> {
    let n = side_from_vech_len(h.len())?;
    let mut m = DMatrix::zeros(n, n);
    let mut k = 0;
    for c in 0..n {
        for r in c..n {
            m[(r, c)] = h[k];
            m[(c, r)] = h[k];
            k += 1;
        }
    }
    Ok(m)
}
