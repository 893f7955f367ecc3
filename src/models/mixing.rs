//! Bi-quadratic mixing model for agarose/salt phantoms.
//!
//! The solvers rely on four primitive operations:
//! - the relaxation rate `R(ag, oth)` and its closed-form gradient
//! - the relaxation time `1 / R`
//! - the equation form `model(ag, oth) = target` used by the joint solver
//! - the single-axis quadratic `a·x² + b·x + c = 0` used by the fallback search

use std::fmt;

use crate::domain::{ConcentrationAxis, ConcentrationPair, MixingModelParams, RelaxationKind};
use crate::error::AppError;

/// Relaxation rate (1/s) predicted by the mixing model.
pub fn rate(params: &MixingModelParams, agarose: f64, other: f64) -> f64 {
    let ag2 = agarose * agarose;
    let oth2 = other * other;
    params.a1
        + params.param_ag_1 * agarose
        + params.param_oth_1 * other
        + params.param_mix_1 * agarose * other
        + params.param_ag_2 * ag2
        + params.param_oth_2 * oth2
        + params.param_mix_2 * other * ag2
        + params.param_mix_3 * agarose * oth2
        + params.param_mix_4 * ag2 * oth2
}

/// Partial derivatives `(∂R/∂ag, ∂R/∂oth)` of [`rate`].
pub fn rate_gradient(params: &MixingModelParams, agarose: f64, other: f64) -> (f64, f64) {
    let ag2 = agarose * agarose;
    let oth2 = other * other;
    let d_ag = params.param_ag_1
        + params.param_mix_1 * other
        + 2.0 * params.param_ag_2 * agarose
        + 2.0 * params.param_mix_2 * other * agarose
        + params.param_mix_3 * oth2
        + 2.0 * params.param_mix_4 * agarose * oth2;
    let d_oth = params.param_oth_1
        + params.param_mix_1 * agarose
        + 2.0 * params.param_oth_2 * other
        + params.param_mix_2 * ag2
        + 2.0 * params.param_mix_3 * agarose * other
        + 2.0 * params.param_mix_4 * ag2 * other;
    (d_ag, d_oth)
}

/// Relaxation time (s) for the given concentrations.
///
/// T1 and T2 models share the same functional form; `kind` only labels which
/// parameter set the caller passed. Concentrations are not validated.
pub fn evaluate(params: &MixingModelParams, agarose: f64, other: f64, kind: RelaxationKind) -> f64 {
    match kind {
        RelaxationKind::T1 | RelaxationKind::T2 => 1.0 / rate(params, agarose, other),
    }
}

/// [`evaluate`] with a textual datatype label (`t1__s`, `t2_1__s`, ...).
pub fn evaluate_labelled(
    params: &MixingModelParams,
    agarose: f64,
    other: f64,
    datatype: &str,
) -> Result<f64, AppError> {
    let kind: RelaxationKind = datatype.parse()?;
    Ok(evaluate(params, agarose, other, kind))
}

pub fn evaluate_pair(params: &MixingModelParams, pair: ConcentrationPair, kind: RelaxationKind) -> f64 {
    evaluate(params, pair.agarose, pair.salt, kind)
}

/// Coefficients `(a, b, c)` of `a·x² + b·x + c = 0`, the condition for reaching
/// `target` seconds using only `axis` (the other component held at zero).
pub fn quadratic_coefficients(
    params: &MixingModelParams,
    target: f64,
    axis: ConcentrationAxis,
) -> (f64, f64, f64) {
    let c = params.a1 - 1.0 / target;
    match axis {
        ConcentrationAxis::Agarose => (params.param_ag_2, params.param_ag_1, c),
        ConcentrationAxis::Salt => (params.param_oth_2, params.param_oth_1, c),
    }
}

/// [`quadratic_coefficients`] with a textual axis label (`agarose`, `salt`).
pub fn quadratic_coefficients_labelled(
    params: &MixingModelParams,
    target: f64,
    conc_type: &str,
) -> Result<(f64, f64, f64), AppError> {
    let axis: ConcentrationAxis = conc_type.parse()?;
    Ok(quadratic_coefficients(params, target, axis))
}

/// The equation `model(ag, oth) = target` for one relaxation kind.
///
/// Solvers work on the rate-space residual `R(ag, oth) − 1/target`, which has
/// the same roots as `1/R − target` wherever the rate is non-zero and is a
/// plain polynomial.
#[derive(Debug, Clone, Copy)]
pub struct MixingEquation<'a> {
    pub params: &'a MixingModelParams,
    pub kind: RelaxationKind,
    pub target: f64,
}

impl<'a> MixingEquation<'a> {
    pub fn new(params: &'a MixingModelParams, kind: RelaxationKind, target: f64) -> Self {
        Self { params, kind, target }
    }

    pub fn residual(&self, agarose: f64, other: f64) -> f64 {
        rate(self.params, agarose, other) - 1.0 / self.target
    }

    pub fn gradient(&self, agarose: f64, other: f64) -> (f64, f64) {
        rate_gradient(self.params, agarose, other)
    }

    /// Relative error of the model time against the target.
    pub fn relative_error(&self, agarose: f64, other: f64) -> f64 {
        ((evaluate(self.params, agarose, other, self.kind) - self.target) / self.target).abs()
    }
}

impl fmt::Display for MixingEquation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.params;
        write!(
            f,
            "{}: 1/({} + {}·ag + {}·oth + {}·ag·oth + {}·ag² + {}·oth² + {}·oth·ag² + {}·ag·oth² + {}·ag²·oth²) = {}",
            self.kind,
            p.a1,
            p.param_ag_1,
            p.param_oth_1,
            p.param_mix_1,
            p.param_ag_2,
            p.param_oth_2,
            p.param_mix_2,
            p.param_mix_3,
            p.param_mix_4,
            self.target
        )
    }
}
