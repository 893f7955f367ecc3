//! Damped Gauss–Newton iteration for small square nonlinear systems.
//!
//! The joint concentration solve is a 2×2 system `F(x) = 0` with a closed-form
//! Jacobian. Each iteration linearises around the current point `x`:
//!
//! ```text
//! J(x) · x_next ≈ J(x) · x − F(x)
//! ```
//!
//! and solves for `x_next` with an SVD pseudo-inverse. Solving for the point
//! (rather than the step) returns the minimum-norm point of the linearised
//! system, so directions the equations do not constrain (e.g. a component that
//! has no effect on either model) are pulled toward the origin instead of being
//! left at the starting guess.
//!
//! Implementation choices:
//! - SVD with progressively looser relative tolerances, as rank-deficient
//!   Jacobians are expected near the axes.
//! - Backtracking (halving) along `x_next − x` until `‖F‖` decreases.
//! - No convergence check is forced on the caller: the report says whether the
//!   residual tolerance was met, and the caller validates the point itself.

use nalgebra::{Matrix2, Vector2};

/// Iteration limits for [`solve_2x2`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonOptions {
    pub max_iterations: usize,
    /// Stop once `‖F(x)‖₂` is at or below this value.
    pub tolerance: f64,
    /// Smallest damping factor tried before giving up on a step.
    pub min_damping: f64,
}

impl Default for NewtonOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-12,
            min_damping: 1.0 / 1024.0,
        }
    }
}

/// Final state of a [`solve_2x2`] run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonReport {
    pub point: Vector2<f64>,
    pub iterations: usize,
    pub residual_norm: f64,
    pub converged: bool,
}

/// Solve `J · x = b` in the minimum-norm least-squares sense.
///
/// Returns `None` if the Jacobian carries no usable information.
pub fn solve_min_norm(j: &Matrix2<f64>, b: &Vector2<f64>) -> Option<Vector2<f64>> {
    let svd = j.svd(true, true);
    let sigma_max = svd.singular_values.max();
    if !(sigma_max.is_finite() && sigma_max > 0.0) {
        return None;
    }

    for &rel_tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(x) = svd.solve(b, rel_tol * sigma_max) {
            if x.iter().all(|v| v.is_finite()) {
                return Some(x);
            }
        }
    }

    None
}

/// Run damped Gauss–Newton on `system`, which returns `(F(x), J(x))`.
pub fn solve_2x2<F>(start: Vector2<f64>, options: &NewtonOptions, system: F) -> NewtonReport
where
    F: Fn(&Vector2<f64>) -> (Vector2<f64>, Matrix2<f64>),
{
    let mut x = start;
    let (mut f, mut j) = system(&x);
    let mut norm = f.norm();

    let mut iterations = 0;
    while iterations < options.max_iterations {
        if !norm.is_finite() || norm <= options.tolerance {
            break;
        }
        iterations += 1;

        let rhs = j * x - f;
        let Some(target) = solve_min_norm(&j, &rhs) else {
            tracing::debug!(iteration = iterations, "singular Jacobian, stopping");
            break;
        };
        let direction = target - x;

        let mut damping = 1.0;
        let mut accepted = None;
        while damping >= options.min_damping {
            let candidate = x + direction * damping;
            let (f_c, j_c) = system(&candidate);
            let norm_c = f_c.norm();
            if norm_c.is_finite() && norm_c < norm {
                accepted = Some((candidate, f_c, j_c, norm_c));
                break;
            }
            damping *= 0.5;
        }

        let Some((x_next, f_next, j_next, norm_next)) = accepted else {
            tracing::debug!(iteration = iterations, residual = norm, "no descent step found");
            break;
        };

        let moved = (x_next - x).norm();
        x = x_next;
        f = f_next;
        j = j_next;
        norm = norm_next;

        tracing::trace!(
            iteration = iterations,
            x0 = x[0],
            x1 = x[1],
            residual = norm,
            damping,
            "gauss-newton step"
        );

        if moved <= f64::EPSILON * (1.0 + x.norm()) {
            break;
        }
    }

    NewtonReport {
        point: x,
        iterations,
        residual_norm: norm,
        converged: norm.is_finite() && norm <= options.tolerance,
    }
}
