//! Configuration for the learning engine.

use serde::{Deserialize, Serialize};

use crate::error::LearnError;

/// Immutable configuration for one learning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnConfig {
    /// Smoothness weight. Scales the trace term coupling the Laplacian to
    /// the signals, and the low-pass strength of the signal-smoothing
    /// step. Must be positive.
    pub alpha: f64,
    /// Frobenius-norm shrinkage weight on the Laplacian entries. Must be
    /// non-negative; zero turns the Laplacian step into a linear program.
    pub beta: f64,
    /// Outer-iteration budget. Exhausting it is an unconverged result,
    /// not an error.
    pub max_iterations: usize,
    /// Convergence threshold on the Frobenius norm of the change in the
    /// smoothed signals between iterations.
    pub tolerance: f64,
    /// Trace normalization pinning the Laplacian's scale. `None` uses the
    /// vertex count, the conventional default.
    pub trace_target: Option<f64>,
}

impl Default for LearnConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 0.01,
            max_iterations: 50,
            tolerance: 1e-4,
            trace_target: None,
        }
    }
}

impl LearnConfig {
    /// Validate the configuration scalars.
    pub fn validate(&self) -> Result<(), LearnError> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(LearnError::InvalidConfig {
                reason: format!("alpha must be positive and finite, got {}", self.alpha),
            });
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(LearnError::InvalidConfig {
                reason: format!("beta must be non-negative and finite, got {}", self.beta),
            });
        }
        if self.max_iterations == 0 {
            return Err(LearnError::InvalidConfig {
                reason: "max_iterations must be at least 1".to_string(),
            });
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(LearnError::InvalidConfig {
                reason: format!("tolerance must be positive and finite, got {}", self.tolerance),
            });
        }
        if let Some(trace) = self.trace_target {
            if !trace.is_finite() || trace <= 0.0 {
                return Err(LearnError::InvalidConfig {
                    reason: format!("trace_target must be positive and finite, got {trace}"),
                });
            }
        }
        Ok(())
    }
}
