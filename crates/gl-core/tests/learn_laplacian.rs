//! End-to-end tests for the smooth-signal Laplacian learner.

use approx::assert_relative_eq;
use gl_core::{GraphLearner, LearnConfig, SmoothSignalLearner};
use nalgebra::DMatrix;

/// Assert the matrix satisfies the Laplacian feasible set up to solver
/// tolerance: zero row sums, the given trace, non-positive off-diagonals.
fn assert_valid_laplacian(l: &DMatrix<f64>, trace: f64) {
    let n = l.nrows();
    for r in 0..n {
        assert!(
            l.row(r).sum().abs() <= 1e-6,
            "row {r} sums to {}",
            l.row(r).sum()
        );
    }
    assert_relative_eq!(l.trace(), trace, epsilon = 1e-6);
    for i in 0..n {
        for j in 0..n {
            if i != j {
                assert!(l[(i, j)] <= 1e-8, "positive off-diagonal at ({i}, {j})");
            }
        }
    }
}

/// Longest run of strictly increasing steps in the convergence history.
fn longest_increase_run(history: &[f64]) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for pair in history.windows(2) {
        if pair[1] > pair[0] * (1.0 + 1e-9) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

/// Four vertices, three observations, one signal column exactly constant.
fn four_vertex_signals() -> DMatrix<f64> {
    DMatrix::from_row_slice(
        4,
        3,
        &[
            0.0, 1.2, 0.5, //
            0.5, 0.9, 0.5, //
            1.0, 0.3, 0.5, //
            1.5, -0.1, 0.5, //
        ],
    )
}

#[test]
fn learns_a_valid_laplacian_from_mixed_signals() {
    let config = LearnConfig {
        alpha: 1.0,
        beta: 0.01,
        max_iterations: 20,
        tolerance: 1e-4,
        trace_target: None,
    };
    let learner = SmoothSignalLearner::new(config);
    let outcome = learner.learn(&four_vertex_signals()).unwrap();

    assert!(outcome.converged, "history: {:?}", outcome.history);
    assert_eq!(outcome.iterations, outcome.history.len());
    assert!(outcome.iterations <= 20);
    assert_valid_laplacian(&outcome.laplacian, 4.0);

    // Every vertex should pick up some edge mass; the trace budget is
    // spread by the shrinkage term.
    for v in 0..4 {
        assert!(
            outcome.graph.degree(v) > 0.1,
            "vertex {v} has degree {}",
            outcome.graph.degree(v)
        );
    }
    let total_degree: f64 = (0..4).map(|v| outcome.graph.degree(v)).sum();
    assert_relative_eq!(total_degree, 4.0, epsilon = 1e-5);
}

#[test]
fn convergence_history_is_mostly_decreasing() {
    let learner = SmoothSignalLearner::new(LearnConfig {
        tolerance: 1e-7,
        ..LearnConfig::default()
    });
    let outcome = learner.learn(&four_vertex_signals()).unwrap();
    assert!(outcome.history.len() >= 2);
    assert!(
        longest_increase_run(&outcome.history) <= 2,
        "history: {:?}",
        outcome.history
    );
}

#[test]
fn cluster_signals_recover_block_sparsity() {
    // Constant within each cluster: exactly smooth on any graph with no
    // cross-cluster edges, so the learner should keep those edges at zero
    // and converge immediately.
    let signals = DMatrix::from_row_slice(
        6,
        2,
        &[
            0.0, 1.0, //
            0.0, 1.0, //
            0.0, 1.0, //
            10.0, -2.0, //
            10.0, -2.0, //
            10.0, -2.0, //
        ],
    );
    let learner = SmoothSignalLearner::new(LearnConfig::default());
    let outcome = learner.learn(&signals).unwrap();

    assert!(outcome.converged);
    assert!(outcome.iterations <= 3, "history: {:?}", outcome.history);
    assert_valid_laplacian(&outcome.laplacian, 6.0);

    let adjacency = outcome.graph.adjacency();
    for i in 0..3 {
        for j in 3..6 {
            assert!(
                adjacency[(i, j)] <= 1e-6,
                "cross-cluster edge ({i}, {j}) = {}",
                adjacency[(i, j)]
            );
        }
    }
    // Within a cluster every pair is equally smooth, so the shrinkage
    // term spreads the block's trace budget uniformly.
    for cluster in [[0usize, 1, 2], [3, 4, 5]] {
        for (a, b) in [(0, 1), (0, 2), (1, 2)] {
            assert_relative_eq!(
                adjacency[(cluster[a], cluster[b])],
                0.5,
                epsilon = 1e-4
            );
        }
    }
}

#[test]
fn exhausting_the_budget_still_returns_a_result() {
    let config = LearnConfig {
        max_iterations: 1,
        tolerance: 1e-12,
        ..LearnConfig::default()
    };
    let learner = SmoothSignalLearner::new(config);
    let outcome = learner.learn(&four_vertex_signals()).unwrap();

    assert!(!outcome.converged);
    assert_eq!(outcome.iterations, 1);
    assert_eq!(outcome.history.len(), 1);
    assert_valid_laplacian(&outcome.laplacian, 4.0);
}

#[test]
fn custom_trace_target_scales_the_graph() {
    let config = LearnConfig {
        trace_target: Some(8.0),
        ..LearnConfig::default()
    };
    let learner = SmoothSignalLearner::new(config);
    let outcome = learner.learn(&four_vertex_signals()).unwrap();
    assert_valid_laplacian(&outcome.laplacian, 8.0);
}
