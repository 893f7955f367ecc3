//! Shared domain types.
//!
//! These types are small `Copy` values where possible and serializable so they
//! can be:
//!
//! - passed by reference through the solvers
//! - exported to CSV/JSON
//! - printed in terminal reports

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Coefficients of one bi-quadratic mixing model (T1 or T2).
///
/// The model predicts a relaxation *rate*:
///
/// ```text
/// R(ag, oth) = a1 + ag_1·ag + oth_1·oth + mix_1·ag·oth + ag_2·ag² + oth_2·oth²
///            + mix_2·oth·ag² + mix_3·ag·oth² + mix_4·ag²·oth²
/// ```
///
/// Instances are built once from a validated parameter row and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixingModelParams {
    /// Model dimensionality recorded by the fitting tool (informational).
    pub dim: f64,
    pub a1: f64,
    pub param_ag_1: f64,
    pub param_oth_1: f64,
    pub param_mix_1: f64,
    pub param_ag_2: f64,
    pub param_oth_2: f64,
    pub param_mix_2: f64,
    pub param_mix_3: f64,
    pub param_mix_4: f64,
}

impl MixingModelParams {
    /// Column names a mixing-model parameter file must provide, in order.
    pub const REQUIRED: [&'static str; 10] = [
        "dim",
        "a1",
        "param_ag_1",
        "param_oth_1",
        "param_mix_1",
        "param_ag_2",
        "param_oth_2",
        "param_mix_2",
        "param_mix_3",
        "param_mix_4",
    ];

    /// Build from values ordered like [`Self::REQUIRED`].
    pub fn from_ordered(values: [f64; 10]) -> Self {
        let [
            dim,
            a1,
            param_ag_1,
            param_oth_1,
            param_mix_1,
            param_ag_2,
            param_oth_2,
            param_mix_2,
            param_mix_3,
            param_mix_4,
        ] = values;
        Self {
            dim,
            a1,
            param_ag_1,
            param_oth_1,
            param_mix_1,
            param_ag_2,
            param_oth_2,
            param_mix_2,
            param_mix_3,
            param_mix_4,
        }
    }

    /// A model with only a constant rate `a1` (all concentration terms zero).
    pub fn constant(a1: f64) -> Self {
        Self {
            dim: 2.0,
            a1,
            param_ag_1: 0.0,
            param_oth_1: 0.0,
            param_mix_1: 0.0,
            param_ag_2: 0.0,
            param_oth_2: 0.0,
            param_mix_2: 0.0,
            param_mix_3: 0.0,
            param_mix_4: 0.0,
        }
    }
}

/// One Lorentzian dispersion term of the tissue model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LorentzianTerm {
    pub tau: f64,
    pub beta: f64,
    pub c: f64,
}

/// Field-dependent tissue relaxation model (sum of up to three Lorentzians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LorentzianParams {
    /// Number of active terms (`0..=3`).
    pub n_lorentzian: usize,
    pub big_a: f64,
    pub numerators: [f64; 3],
    pub terms: [LorentzianTerm; 3],
}

impl LorentzianParams {
    pub const MAX_TERMS: usize = 3;

    pub const REQUIRED: [&'static str; 14] = [
        "n_lorentzian",
        "big_a",
        "numerator_0",
        "numerator_1",
        "numerator_2",
        "tau_0",
        "beta_0",
        "c_0",
        "tau_1",
        "beta_1",
        "c_1",
        "tau_2",
        "beta_2",
        "c_2",
    ];

    /// Only the first `n_lorentzian` terms contribute.
    pub fn active_terms(&self) -> &[LorentzianTerm] {
        &self.terms[..self.n_lorentzian.min(Self::MAX_TERMS)]
    }
}

/// Which relaxation time a model predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelaxationKind {
    T1,
    T2,
}

impl RelaxationKind {
    /// Column label used in result files.
    pub fn column(self) -> &'static str {
        match self {
            RelaxationKind::T1 => "t1__s",
            RelaxationKind::T2 => "t2__s",
        }
    }

    pub fn other(self) -> Self {
        match self {
            RelaxationKind::T1 => RelaxationKind::T2,
            RelaxationKind::T2 => RelaxationKind::T1,
        }
    }
}

impl fmt::Display for RelaxationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelaxationKind::T1 => write!(f, "T1"),
            RelaxationKind::T2 => write!(f, "T2"),
        }
    }
}

impl FromStr for RelaxationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "t1" | "t1__s" => Ok(RelaxationKind::T1),
            "t2" | "t2__s" | "t2_1__s" => Ok(RelaxationKind::T2),
            _ => Err(AppError::UnknownSelector {
                selector: "datatype",
                value: s.to_string(),
            }),
        }
    }
}

/// Concentration axis of the two-component phantom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcentrationAxis {
    Agarose,
    Salt,
}

impl fmt::Display for ConcentrationAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcentrationAxis::Agarose => write!(f, "agarose"),
            ConcentrationAxis::Salt => write!(f, "salt"),
        }
    }
}

impl FromStr for ConcentrationAxis {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "agarose" => Ok(ConcentrationAxis::Agarose),
            "salt" | "other" => Ok(ConcentrationAxis::Salt),
            _ => Err(AppError::UnknownSelector {
                selector: "conc type",
                value: s.to_string(),
            }),
        }
    }
}

/// Agarose (% w/v) and salt (mM) concentrations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConcentrationPair {
    pub agarose: f64,
    pub salt: f64,
}

impl ConcentrationPair {
    pub const ZERO: ConcentrationPair = ConcentrationPair {
        agarose: 0.0,
        salt: 0.0,
    };

    pub fn new(agarose: f64, salt: f64) -> Self {
        Self { agarose, salt }
    }

    /// A pair with only the given axis set.
    pub fn on_axis(axis: ConcentrationAxis, value: f64) -> Self {
        match axis {
            ConcentrationAxis::Agarose => Self::new(value, 0.0),
            ConcentrationAxis::Salt => Self::new(0.0, value),
        }
    }

    /// Negative coordinates clamped to zero.
    pub fn clamped(self) -> Self {
        Self {
            agarose: self.agarose.max(0.0),
            salt: self.salt.max(0.0),
        }
    }

    pub fn rounded(self, decimals: u32) -> Self {
        Self {
            agarose: round_to(self.agarose, decimals),
            salt: round_to(self.salt, decimals),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.agarose.is_finite() && self.salt.is_finite()
    }
}

/// Target relaxation times (seconds) for one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRelaxation {
    pub t1: f64,
    pub t2: f64,
}

impl TargetRelaxation {
    /// Both targets must be finite and strictly positive.
    pub fn new(t1: f64, t2: f64) -> Result<Self, AppError> {
        for (kind, value) in [(RelaxationKind::T1, t1), (RelaxationKind::T2, t2)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AppError::InvalidTarget(format!(
                    "target {kind} must be finite and > 0 seconds (got {value})"
                )));
            }
        }
        Ok(Self { t1, t2 })
    }

    pub fn get(&self, kind: RelaxationKind) -> f64 {
        match kind {
            RelaxationKind::T1 => self.t1,
            RelaxationKind::T2 => self.t2,
        }
    }
}

/// Predicted (T1, T2) in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelaxationTimes {
    pub t1: f64,
    pub t2: f64,
}

impl RelaxationTimes {
    pub fn get(&self, kind: RelaxationKind) -> f64 {
        match kind {
            RelaxationKind::T1 => self.t1,
            RelaxationKind::T2 => self.t2,
        }
    }

    pub fn rounded(self, decimals: u32) -> Self {
        Self {
            t1: round_to(self.t1, decimals),
            t2: round_to(self.t2, decimals),
        }
    }

    /// `true` when both times lie within `tolerance` relative error of the target.
    ///
    /// NaN times never match.
    pub fn matches(&self, target: &TargetRelaxation, tolerance: f64) -> bool {
        [RelaxationKind::T1, RelaxationKind::T2].iter().all(|&kind| {
            let rel = ((self.get(kind) - target.get(kind)) / target.get(kind)).abs();
            rel <= tolerance
        })
    }
}

/// A concentration pair together with the relaxation times it produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateSolution {
    pub concentrations: ConcentrationPair,
    pub times: RelaxationTimes,
}

/// Ordered list of 1–2 solutions returned by a resolution.
pub type SolutionSet = Vec<CandidateSolution>;

/// Raw output of the joint (T1 + T2) solve, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSolution {
    pub concentrations: ConcentrationPair,
    pub iterations: usize,
    pub residual_norm: f64,
    pub converged: bool,
}

/// How the final solution set was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// One pair matches both targets within tolerance.
    Joint,
    /// Per-target approximate solutions.
    Fallback,
    /// Neither target is reachable on either axis; the zero pair is reported.
    OutOfRange,
}

impl ResolutionOutcome {
    pub fn display_name(self) -> &'static str {
        match self {
            ResolutionOutcome::Joint => "joint solution",
            ResolutionOutcome::Fallback => "independent per-target solutions",
            ResolutionOutcome::OutOfRange => "out of the phantom's achievable range",
        }
    }
}

/// Full result of resolving one target pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub target: TargetRelaxation,
    pub outcome: ResolutionOutcome,
    pub joint: JointSolution,
    pub solutions: SolutionSet,
}

impl Resolution {
    pub fn concentrations(&self) -> Vec<ConcentrationPair> {
        self.solutions.iter().map(|s| s.concentrations).collect()
    }

    pub fn relaxation_times(&self) -> Vec<RelaxationTimes> {
        self.solutions.iter().map(|s| s.times).collect()
    }
}

/// Knobs for a resolution run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveConfig {
    /// Maximum relative error on each of T1 and T2 for a joint solution.
    pub tolerance: f64,
    /// Decimal places of every reported number.
    pub decimals: u32,
    /// Starting point of the joint solver.
    pub start: ConcentrationPair,
    pub max_iterations: usize,
    /// Residual norm (rate space, 1/s) at which the joint solver stops early.
    pub residual_tolerance: f64,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.1,
            decimals: 3,
            start: ConcentrationPair::new(0.1, 0.1),
            max_iterations: 100,
            residual_tolerance: 1e-12,
        }
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    // Avoid reporting "-0.000".
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relaxation_kind_accepts_model_labels() {
        assert_eq!("t1__s".parse::<RelaxationKind>().unwrap(), RelaxationKind::T1);
        assert_eq!("t2_1__s".parse::<RelaxationKind>().unwrap(), RelaxationKind::T2);
        assert_eq!("T2".parse::<RelaxationKind>().unwrap(), RelaxationKind::T2);

        let err = "t3__s".parse::<RelaxationKind>().unwrap_err();
        assert!(matches!(err, AppError::UnknownSelector { .. }));
        assert!(err.to_string().contains("t3__s"));
    }

    #[test]
    fn concentration_axis_rejects_unknown_labels() {
        assert_eq!("Agarose".parse::<ConcentrationAxis>().unwrap(), ConcentrationAxis::Agarose);
        assert_eq!("other".parse::<ConcentrationAxis>().unwrap(), ConcentrationAxis::Salt);
        let err = "gelatin".parse::<ConcentrationAxis>().unwrap_err();
        assert!(err.to_string().contains("gelatin"));
    }

    #[test]
    fn clamp_and_round() {
        let pair = ConcentrationPair::new(-0.2, 1.23456).clamped().rounded(3);
        assert_eq!(pair, ConcentrationPair::new(0.0, 1.235));
        assert_eq!(round_to(-0.0004, 3).to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn targets_must_be_positive() {
        assert!(TargetRelaxation::new(1.0, 0.1).is_ok());
        assert!(matches!(
            TargetRelaxation::new(0.0, 0.1),
            Err(AppError::InvalidTarget(_))
        ));
        assert!(TargetRelaxation::new(1.0, f64::NAN).is_err());
    }

    #[test]
    fn matches_uses_relative_error_on_both_axes() {
        let target = TargetRelaxation::new(1.0, 0.1).unwrap();
        let inside = RelaxationTimes { t1: 1.09, t2: 0.091 };
        let outside = RelaxationTimes { t1: 1.0, t2: 0.115 };
        assert!(inside.matches(&target, 0.1));
        assert!(!outside.matches(&target, 0.1));
        let nan = RelaxationTimes { t1: f64::NAN, t2: 0.1 };
        assert!(!nan.matches(&target, 0.1));
    }

    #[test]
    fn lorentzian_active_terms_are_capped() {
        let term = LorentzianTerm { tau: 1.0, beta: 2.0, c: 1.0 };
        let params = LorentzianParams {
            n_lorentzian: 7,
            big_a: 0.0,
            numerators: [0.0; 3],
            terms: [term; 3],
        };
        assert_eq!(params.active_terms().len(), 3);
    }
}
