//! Dense convex quadratic programming.
//!
//! Solves: min 0.5*x'*Q*x + c'*x
//!         s.t. A_eq*x = b_eq
//!              A_ineq*x <= b_ineq
//!
//! Inequality-constrained problems go through a primal-dual interior
//! point scheme: slack variables turn A_ineq*x <= b_ineq into
//! A_ineq*x + s = b_ineq with s >= 0, and each Newton step solves the
//! reduced KKT system after eliminating the slack and dual directions.
//! Problems with only equality constraints reduce to a single KKT solve.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fraction-to-the-boundary factor keeping slacks and duals strictly positive.
const STEP_TAU: f64 = 0.995;
/// Fixed centering parameter for the perturbed complementarity target.
const SIGMA: f64 = 0.3;
/// Floor on the step length to avoid stalling on degenerate directions.
const MIN_STEP: f64 = 1e-15;

/// Options for the QP solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QpOptions {
    /// Maximum number of interior-point iterations.
    pub max_iter: usize,
    /// Tolerance on the complementarity gap and scaled residuals.
    pub tol: f64,
}

impl Default for QpOptions {
    fn default() -> Self {
        Self {
            max_iter: 200,
            tol: 1e-8,
        }
    }
}

/// Result of a successful QP solve.
#[derive(Debug, Clone)]
pub struct QpSolution {
    /// Optimal vector.
    pub x: DVector<f64>,
    /// Objective value at the optimum.
    pub objective: f64,
    /// Iterations spent.
    pub iterations: usize,
}

/// Errors returned by the QP solver.
#[derive(Debug, Error)]
pub enum QpError {
    #[error("dimension mismatch: {context}")]
    Dimension { context: String },
    #[error("no feasible optimum found after {iterations} iterations")]
    Infeasible { iterations: usize },
    #[error("KKT system is singular")]
    SingularKkt,
}

/// Solve a convex quadratic program.
///
/// min  0.5*x'*Q*x + c'*x
/// s.t. A_eq*x = b_eq       (if provided)
///      A_ineq*x <= b_ineq  (if provided)
///
/// Q must be symmetric positive semi-definite; constraint matrix and
/// right-hand side must be provided together.
#[allow(clippy::too_many_arguments)]
pub fn solve_qp(
    q: &DMatrix<f64>,
    c: &DVector<f64>,
    a_eq: Option<&DMatrix<f64>>,
    b_eq: Option<&DVector<f64>>,
    a_ineq: Option<&DMatrix<f64>>,
    b_ineq: Option<&DVector<f64>>,
    options: &QpOptions,
) -> Result<QpSolution, QpError> {
    let n = c.len();
    if q.nrows() != n || q.ncols() != n {
        return Err(QpError::Dimension {
            context: format!("quadratic term is {}x{}, expected {n}x{n}", q.nrows(), q.ncols()),
        });
    }
    let m_eq = constraint_rows(n, a_eq, b_eq, "equality")?;
    let m_ineq = constraint_rows(n, a_ineq, b_ineq, "inequality")?;

    if m_ineq == 0 {
        return solve_kkt_direct(q, c, a_eq, b_eq, n, m_eq);
    }

    let g = a_ineq.ok_or_else(|| QpError::Dimension {
        context: "inequality matrix must be present when m_ineq > 0".to_string(),
    })?;
    let h = b_ineq.ok_or_else(|| QpError::Dimension {
        context: "inequality rhs must be present when m_ineq > 0".to_string(),
    })?;
    let empty_a = DMatrix::zeros(0, n);
    let empty_b = DVector::zeros(0);
    let a = a_eq.unwrap_or(&empty_a);
    let b = b_eq.unwrap_or(&empty_b);

    interior_point(q, c, a, b, g, h, n, m_eq, m_ineq, options)
}

fn constraint_rows(
    n: usize,
    matrix: Option<&DMatrix<f64>>,
    rhs: Option<&DVector<f64>>,
    kind: &str,
) -> Result<usize, QpError> {
    match (matrix, rhs) {
        (Some(m), Some(r)) => {
            if m.ncols() != n {
                return Err(QpError::Dimension {
                    context: format!("{kind} matrix has {} columns, expected {n}", m.ncols()),
                });
            }
            if m.nrows() != r.len() {
                return Err(QpError::Dimension {
                    context: format!(
                        "{kind} matrix has {} rows but rhs has {}",
                        m.nrows(),
                        r.len()
                    ),
                });
            }
            Ok(m.nrows())
        }
        (None, None) => Ok(0),
        _ => Err(QpError::Dimension {
            context: format!("{kind} matrix and rhs must be provided together"),
        }),
    }
}

/// Equality-only (or unconstrained) problems solve one KKT system.
fn solve_kkt_direct(
    q: &DMatrix<f64>,
    c: &DVector<f64>,
    a_eq: Option<&DMatrix<f64>>,
    b_eq: Option<&DVector<f64>>,
    n: usize,
    m_eq: usize,
) -> Result<QpSolution, QpError> {
    if m_eq == 0 {
        let x = q.clone().lu().solve(&(-c)).ok_or(QpError::SingularKkt)?;
        let objective = objective_value(q, c, &x);
        return Ok(QpSolution {
            x,
            objective,
            iterations: 1,
        });
    }

    let a = a_eq.ok_or_else(|| QpError::Dimension {
        context: "equality matrix must be present when m_eq > 0".to_string(),
    })?;
    let b = b_eq.ok_or_else(|| QpError::Dimension {
        context: "equality rhs must be present when m_eq > 0".to_string(),
    })?;

    let dim = n + m_eq;
    let mut kkt = DMatrix::zeros(dim, dim);
    kkt.view_mut((0, 0), (n, n)).copy_from(q);
    kkt.view_mut((0, n), (n, m_eq)).copy_from(&a.transpose());
    kkt.view_mut((n, 0), (m_eq, n)).copy_from(a);

    let mut rhs = DVector::zeros(dim);
    rhs.rows_mut(0, n).copy_from(&(-c));
    rhs.rows_mut(n, m_eq).copy_from(b);

    let sol = kkt.lu().solve(&rhs).ok_or(QpError::SingularKkt)?;
    let x = sol.rows(0, n).into_owned();
    let objective = objective_value(q, c, &x);
    Ok(QpSolution {
        x,
        objective,
        iterations: 1,
    })
}

#[allow(clippy::too_many_arguments)]
fn interior_point(
    q: &DMatrix<f64>,
    c: &DVector<f64>,
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    g: &DMatrix<f64>,
    h: &DVector<f64>,
    n: usize,
    m_eq: usize,
    m_ineq: usize,
    options: &QpOptions,
) -> Result<QpSolution, QpError> {
    // Infeasible start: x at the origin, slacks and duals at one.
    let mut x = DVector::zeros(n);
    let mut y = DVector::zeros(m_eq);
    let mut s = DVector::from_element(m_ineq, 1.0);
    let mut z = DVector::from_element(m_ineq, 1.0);

    let c_scale = 1.0 + inf_norm(c);
    let b_scale = 1.0 + inf_norm(b);
    let h_scale = 1.0 + inf_norm(h);

    for iter in 0..options.max_iter {
        // Residuals of the perturbed KKT conditions.
        let r_dual = q * &x + c + a.transpose() * &y + g.transpose() * &z;
        let r_eq = a * &x - b;
        let r_ineq = g * &x + &s - h;
        let mu = s.dot(&z) / m_ineq as f64;

        if mu < options.tol
            && inf_norm(&r_dual) <= options.tol * c_scale
            && inf_norm(&r_eq) <= options.tol * b_scale
            && inf_norm(&r_ineq) <= options.tol * h_scale
        {
            let objective = objective_value(q, c, &x);
            return Ok(QpSolution {
                x,
                objective,
                iterations: iter + 1,
            });
        }

        // Newton system on (dx, dy) after eliminating ds and dz:
        //   dz = -(r_comp + z.*ds) ./ s
        //   ds = -r_ineq - G*dx
        //   [Q + G'*(Z/S)*G, A'; A, 0] [dx; dy] = [-r_dual + G'*((r_comp - z.*r_ineq)./s); -r_eq]
        let w = z.component_div(&s);
        let weighted_g = DMatrix::from_fn(m_ineq, n, |i, j| w[i] * g[(i, j)]);
        let reduced = q + g.transpose() * weighted_g;

        let dim = n + m_eq;
        let mut kkt = DMatrix::zeros(dim, dim);
        kkt.view_mut((0, 0), (n, n)).copy_from(&reduced);
        kkt.view_mut((0, n), (n, m_eq)).copy_from(&a.transpose());
        kkt.view_mut((n, 0), (m_eq, n)).copy_from(a);

        let r_comp = s.component_mul(&z).add_scalar(-SIGMA * mu);
        let inner = (&r_comp - z.component_mul(&r_ineq)).component_div(&s);
        let rhs_x = g.transpose() * inner - &r_dual;
        let mut rhs = DVector::zeros(dim);
        rhs.rows_mut(0, n).copy_from(&rhs_x);
        rhs.rows_mut(n, m_eq).copy_from(&(-&r_eq));

        let step = kkt.lu().solve(&rhs).ok_or(QpError::SingularKkt)?;
        let dx = step.rows(0, n).into_owned();
        let dy = step.rows(n, m_eq).into_owned();

        let ds = -&r_ineq - g * &dx;
        let dz = -(&r_comp + z.component_mul(&ds)).component_div(&s);

        let alpha = step_length(&s, &z, &ds, &dz);
        x += &dx * alpha;
        y += &dy * alpha;
        s += &ds * alpha;
        z += &dz * alpha;
    }

    Err(QpError::Infeasible {
        iterations: options.max_iter,
    })
}

/// Largest step in (0, 1] keeping s > 0 and z > 0, with a boundary margin.
fn step_length(s: &DVector<f64>, z: &DVector<f64>, ds: &DVector<f64>, dz: &DVector<f64>) -> f64 {
    let mut alpha = 1.0f64;
    for i in 0..s.len() {
        if ds[i] < 0.0 {
            alpha = alpha.min(-STEP_TAU * s[i] / ds[i]);
        }
        if dz[i] < 0.0 {
            alpha = alpha.min(-STEP_TAU * z[i] / dz[i]);
        }
    }
    alpha.max(MIN_STEP)
}

fn objective_value(q: &DMatrix<f64>, c: &DVector<f64>, x: &DVector<f64>) -> f64 {
    0.5 * x.dot(&(q * x)) + c.dot(x)
}

fn inf_norm(v: &DVector<f64>) -> f64 {
    v.iter().fold(0.0f64, |acc, t| acc.max(t.abs()))
}
