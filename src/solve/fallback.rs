//! Per-target fallback when no joint solution exists.
//!
//! For each target we look for concentrations that hit it exactly using a
//! single component (the other held at zero), then keep the candidate whose
//! *other* relaxation time lands closest to its own target:
//!
//! 1) T1 reachable on the salt axis / agarose axis → score each by |T2 − target T2|
//! 2) T2 reachable on the salt axis / agarose axis → score each by |T1 − target T1|
//! 3) nothing reachable at all → the zero pair

use crate::domain::{ConcentrationAxis, ConcentrationPair, MixingModelParams, RelaxationKind, TargetRelaxation};
use crate::math::solve_positive;
use crate::models::{evaluate_pair, quadratic_coefficients};

/// A single-axis candidate and the relaxation time it produces under the
/// scoring model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisCandidate {
    pub concentrations: ConcentrationPair,
    pub scored_time: f64,
}

/// Result of the fallback search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FallbackSelection {
    /// Neither target is reachable on either axis.
    Zero,
    /// Best candidate per target; at least one is present.
    Independent {
        t1_optimized: Option<AxisCandidate>,
        t2_optimized: Option<AxisCandidate>,
    },
}

impl FallbackSelection {
    /// Concentrations in report order: T1-optimised first, then T2-optimised.
    ///
    /// Identical pairs are kept as-is.
    pub fn pairs(&self) -> Vec<ConcentrationPair> {
        match self {
            FallbackSelection::Zero => vec![ConcentrationPair::ZERO],
            FallbackSelection::Independent {
                t1_optimized,
                t2_optimized,
            } => t1_optimized
                .iter()
                .chain(t2_optimized.iter())
                .map(|c| c.concentrations)
                .collect(),
        }
    }
}

/// Positive single-axis concentrations reaching `target` seconds.
pub fn axis_roots(params: &MixingModelParams, target: f64, axis: ConcentrationAxis) -> Vec<f64> {
    let (a, b, c) = quadratic_coefficients(params, target, axis);
    solve_positive(a, b, c)
}

/// Index of the first minimum; NaN never beats a number.
fn stable_argmin(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        let better = match best {
            None => true,
            Some((_, best_score)) => score < best_score || (best_score.is_nan() && !score.is_nan()),
        };
        if better {
            best = Some((idx, score));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Among `(0, salt)` and `(ag, 0)` candidates, pick the one whose time under
/// `scoring_params` is closest to `scoring_target`.
///
/// Salt candidates come first; ties keep the earliest candidate. A single
/// candidate is returned without scoring comparisons.
pub fn closest_candidate(
    agarose_options: &[f64],
    salt_options: &[f64],
    scoring_params: &MixingModelParams,
    scoring_target: f64,
    scoring_kind: RelaxationKind,
) -> Option<AxisCandidate> {
    let candidates: Vec<AxisCandidate> = salt_options
        .iter()
        .map(|&s| ConcentrationPair::on_axis(ConcentrationAxis::Salt, s))
        .chain(
            agarose_options
                .iter()
                .map(|&ag| ConcentrationPair::on_axis(ConcentrationAxis::Agarose, ag)),
        )
        .map(|pair| AxisCandidate {
            concentrations: pair,
            scored_time: evaluate_pair(scoring_params, pair, scoring_kind),
        })
        .collect();

    if candidates.len() <= 1 {
        return candidates.into_iter().next();
    }

    let scores: Vec<f64> = candidates
        .iter()
        .map(|c| (c.scored_time - scoring_target).abs())
        .collect();
    stable_argmin(&scores).map(|idx| candidates[idx])
}

/// Best single-axis candidate for `kind`, scored on the other relaxation time.
fn best_for(
    kind: RelaxationKind,
    params_t1: &MixingModelParams,
    params_t2: &MixingModelParams,
    target: &TargetRelaxation,
) -> Option<AxisCandidate> {
    let (solve_params, score_params) = match kind {
        RelaxationKind::T1 => (params_t1, params_t2),
        RelaxationKind::T2 => (params_t2, params_t1),
    };
    let goal = target.get(kind);
    let salt = axis_roots(solve_params, goal, ConcentrationAxis::Salt);
    let agarose = axis_roots(solve_params, goal, ConcentrationAxis::Agarose);
    tracing::debug!(%kind, ?salt, ?agarose, "single-axis roots");

    let other = kind.other();
    closest_candidate(&agarose, &salt, score_params, target.get(other), other)
}

/// Run the full fallback search.
pub fn select_fallback(
    params_t1: &MixingModelParams,
    params_t2: &MixingModelParams,
    target: &TargetRelaxation,
) -> FallbackSelection {
    tracing::info!("Solving independently for best T1 concentration");
    let t1_optimized = best_for(RelaxationKind::T1, params_t1, params_t2, target);

    tracing::info!("Solving independently for best T2 concentration");
    let t2_optimized = best_for(RelaxationKind::T2, params_t1, params_t2, target);

    if t1_optimized.is_none() && t2_optimized.is_none() {
        tracing::warn!("Assigning zero concentration for all components");
        return FallbackSelection::Zero;
    }

    FallbackSelection::Independent {
        t1_optimized,
        t2_optimized,
    }
}
