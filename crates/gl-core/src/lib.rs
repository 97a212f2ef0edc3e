//! Graph structure learning from smooth signals.
//!
//! Learns the Laplacian of a weighted undirected graph from a matrix of
//! observed vertex signals, under the assumption that the signals vary
//! little across edges of the graph. The engine alternates between a
//! constrained quadratic program for the Laplacian and a closed-form
//! smoothing solve for the signals until the iterates settle.
//!
//! The numerical building blocks (half-vectorization, constraint
//! builders, the QP solver) live in `gl-math`; this crate owns the
//! engine, its configuration, and the resulting graph value.

pub mod config;
pub mod error;
pub mod graph;
pub mod learn;

pub use config::LearnConfig;
pub use error::{LearnError, Result};
pub use graph::{Graph, GraphError};
pub use learn::{
    GraphLearner, InteriorPointBackend, LearnOutcome, QpBackend, SmoothSignalLearner,
};
