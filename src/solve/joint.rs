//! Joint (T1 + T2) concentration solve.
//!
//! Given:
//! - a T1 mixing model and target T1
//! - a T2 mixing model and target T2
//!
//! we solve the 2×2 nonlinear system
//!
//! ```text
//! R1(ag, salt) − 1/T1 = 0
//! R2(ag, salt) − 1/T2 = 0
//! ```
//!
//! with damped Gauss–Newton on the closed-form Jacobian. The returned point is
//! not validated here; steep models can leave the solver far from a root.

use nalgebra::{Matrix2, Vector2};

use crate::domain::{
    ConcentrationPair, JointSolution, MixingModelParams, RelaxationKind, ResolveConfig, TargetRelaxation,
};
use crate::math::{NewtonOptions, solve_2x2};
use crate::models::MixingEquation;

/// Solve for the (agarose, salt) pair matching both targets.
pub fn solve_joint(
    params_t1: &MixingModelParams,
    params_t2: &MixingModelParams,
    target: &TargetRelaxation,
    config: &ResolveConfig,
) -> JointSolution {
    let eq_t1 = MixingEquation::new(params_t1, RelaxationKind::T1, target.t1);
    let eq_t2 = MixingEquation::new(params_t2, RelaxationKind::T2, target.t2);
    tracing::debug!(equation = %eq_t1, "joint system");
    tracing::debug!(equation = %eq_t2, "joint system");

    let options = NewtonOptions {
        max_iterations: config.max_iterations,
        tolerance: config.residual_tolerance,
        ..NewtonOptions::default()
    };
    let start = Vector2::new(config.start.agarose, config.start.salt);

    let report = solve_2x2(start, &options, |x| {
        let (ag, salt) = (x[0], x[1]);
        let f = Vector2::new(eq_t1.residual(ag, salt), eq_t2.residual(ag, salt));
        let (d1_ag, d1_salt) = eq_t1.gradient(ag, salt);
        let (d2_ag, d2_salt) = eq_t2.gradient(ag, salt);
        (f, Matrix2::new(d1_ag, d1_salt, d2_ag, d2_salt))
    });

    tracing::debug!(
        agarose = report.point[0],
        salt = report.point[1],
        iterations = report.iterations,
        residual = report.residual_norm,
        converged = report.converged,
        "joint solve finished"
    );

    JointSolution {
        concentrations: ConcentrationPair::new(report.point[0], report.point[1]),
        iterations: report.iterations,
        residual_norm: report.residual_norm,
        converged: report.converged,
    }
}
