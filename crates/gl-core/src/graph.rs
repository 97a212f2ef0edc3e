//! Weighted undirected graph values.

use nalgebra::DMatrix;
use thiserror::Error;

/// Errors for malformed graph matrices.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("adjacency matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("adjacency matrix is not symmetric at ({row}, {col})")]
    NotSymmetric { row: usize, col: usize },
    #[error("negative edge weight {weight} at ({row}, {col})")]
    NegativeWeight { row: usize, col: usize, weight: f64 },
    #[error("nonzero diagonal entry at vertex {index}")]
    NonzeroDiagonal { index: usize },
}

/// An immutable weighted undirected graph, stored as its adjacency matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    adjacency: DMatrix<f64>,
}

impl Graph {
    /// Build a graph from an adjacency matrix.
    ///
    /// The matrix must be square and symmetric, with non-negative weights
    /// and a zero diagonal.
    pub fn from_adjacency(adjacency: DMatrix<f64>) -> Result<Self, GraphError> {
        let n = adjacency.nrows();
        if adjacency.ncols() != n {
            return Err(GraphError::NotSquare {
                rows: n,
                cols: adjacency.ncols(),
            });
        }
        for i in 0..n {
            if adjacency[(i, i)] != 0.0 {
                return Err(GraphError::NonzeroDiagonal { index: i });
            }
            for j in (i + 1)..n {
                if (adjacency[(i, j)] - adjacency[(j, i)]).abs() > 1e-9 {
                    return Err(GraphError::NotSymmetric { row: i, col: j });
                }
                if adjacency[(i, j)] < 0.0 {
                    return Err(GraphError::NegativeWeight {
                        row: i,
                        col: j,
                        weight: adjacency[(i, j)],
                    });
                }
            }
        }
        Ok(Self { adjacency })
    }

    /// Realize a graph from a learned Laplacian: edge weights are the
    /// negated off-diagonal entries, the diagonal is dropped.
    ///
    /// Off-diagonal entries are non-positive for any feasible Laplacian;
    /// positive solver dust is clamped to zero.
    pub fn from_laplacian(laplacian: &DMatrix<f64>) -> Result<Self, GraphError> {
        let n = laplacian.nrows();
        if laplacian.ncols() != n {
            return Err(GraphError::NotSquare {
                rows: n,
                cols: laplacian.ncols(),
            });
        }
        let adjacency = DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                0.0
            } else {
                (-laplacian[(i, j)]).max(0.0)
            }
        });
        Ok(Self { adjacency })
    }

    /// The adjacency matrix.
    pub fn adjacency(&self) -> &DMatrix<f64> {
        &self.adjacency
    }

    /// Number of vertices.
    pub fn node_count(&self) -> usize {
        self.adjacency.nrows()
    }

    /// Weighted degree of a vertex.
    pub fn degree(&self, vertex: usize) -> f64 {
        self.adjacency.row(vertex).sum()
    }

    /// Edges with positive weight, as (i, j, weight) with i < j.
    pub fn edges(&self) -> Vec<(usize, usize, f64)> {
        let n = self.node_count();
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                let weight = self.adjacency[(i, j)];
                if weight > 0.0 {
                    edges.push((i, j, weight));
                }
            }
        }
        edges
    }

    /// The combinatorial Laplacian D - W of this graph.
    pub fn laplacian(&self) -> DMatrix<f64> {
        let n = self.node_count();
        DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                self.degree(i)
            } else {
                -self.adjacency[(i, j)]
            }
        })
    }
}
