//! Error types for graph learning.
//!
//! Every failure in this crate reflects a violated precondition or a
//! construction bug, never environmental flakiness, so the propagation
//! policy is fail fast with no retries. Running out of iterations is not
//! an error: the engine returns its best estimate with the convergence
//! history and lets the caller judge.

use gl_math::{QpError, ShapeError};
use thiserror::Error;

use crate::graph::GraphError;

/// Result type alias for graph-learning operations.
pub type Result<T> = std::result::Result<T, LearnError>;

/// Unified error type for the learning engine.
#[derive(Debug, Error)]
pub enum LearnError {
    /// Rejected configuration scalars.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Signal matrix too small to learn from.
    #[error("signal matrix must have at least 2 rows and 1 column, got {rows}x{cols}")]
    EmptySignals { rows: usize, cols: usize },

    /// Malformed vectorized input.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// The QP solver could not produce a result. The feasible region is
    /// non-empty by construction, so this indicates a construction bug
    /// (for example an N mismatch between the signals and the constraint
    /// matrices) and must not be retried.
    #[error("laplacian step failed: {0}")]
    Infeasible(#[from] QpError),

    /// The signal-smoothing solve failed. (I + alpha*L) is positive
    /// definite for alpha > 0 and any feasible L, so this is a fatal
    /// precondition violation.
    #[error("signal smoothing system was not positive definite at iteration {iteration}")]
    SingularSystem { iteration: usize },

    /// Malformed graph matrix.
    #[error(transparent)]
    Graph(#[from] GraphError),
}
