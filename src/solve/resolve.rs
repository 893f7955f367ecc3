//! Concentration resolution: joint solve, validation, fallback, final report values.
//!
//! This is the entry point the CLI and library users call:
//! joint solve -> round -> clamp -> validate -> (fallback) -> evaluate -> round

use rayon::prelude::*;

use crate::domain::{
    CandidateSolution, ConcentrationPair, MixingModelParams, RelaxationKind, RelaxationTimes, Resolution,
    ResolutionOutcome, ResolveConfig, TargetRelaxation,
};
use crate::models::evaluate_pair;
use crate::solve::fallback::{FallbackSelection, select_fallback};
use crate::solve::joint::solve_joint;

/// (T1, T2) of a concentration pair under the two mixing models.
pub fn predict_times(
    params_t1: &MixingModelParams,
    params_t2: &MixingModelParams,
    pair: ConcentrationPair,
) -> RelaxationTimes {
    RelaxationTimes {
        t1: evaluate_pair(params_t1, pair, RelaxationKind::T1),
        t2: evaluate_pair(params_t2, pair, RelaxationKind::T2),
    }
}

/// Find phantom concentrations reproducing `target`.
///
/// Returns a single joint solution when one is within `config.tolerance`
/// relative error on both T1 and T2, otherwise the per-target fallback
/// solutions (or the zero pair when neither target is reachable).
pub fn resolve(
    params_t1: &MixingModelParams,
    params_t2: &MixingModelParams,
    target: &TargetRelaxation,
    config: &ResolveConfig,
) -> Resolution {
    tracing::info!(target_t1 = target.t1, target_t2 = target.t2, "Solving for target T1 and T2");

    let joint = solve_joint(params_t1, params_t2, target, config);
    let joint_pair = joint.concentrations.rounded(config.decimals);
    let joint_valid = joint_pair.is_finite()
        && predict_times(params_t1, params_t2, joint_pair.clamped()).matches(target, config.tolerance);

    let (outcome, pairs) = if joint_valid {
        (ResolutionOutcome::Joint, vec![joint_pair])
    } else {
        tracing::warn!(
            agarose = joint_pair.agarose,
            salt = joint_pair.salt,
            "Could not find one solution for target T1 and T2"
        );
        let selection = select_fallback(params_t1, params_t2, target);
        let outcome = match selection {
            FallbackSelection::Zero => ResolutionOutcome::OutOfRange,
            FallbackSelection::Independent { .. } => ResolutionOutcome::Fallback,
        };
        (outcome, selection.pairs())
    };

    let solutions = pairs
        .into_iter()
        .map(|pair| {
            let pair = pair.clamped();
            CandidateSolution {
                concentrations: pair.rounded(config.decimals),
                times: predict_times(params_t1, params_t2, pair).rounded(config.decimals),
            }
        })
        .collect();

    Resolution {
        target: *target,
        outcome,
        joint,
        solutions,
    }
}

/// Resolve many targets in parallel; output order matches `targets`.
pub fn resolve_targets(
    params_t1: &MixingModelParams,
    params_t2: &MixingModelParams,
    targets: &[TargetRelaxation],
    config: &ResolveConfig,
) -> Vec<Resolution> {
    targets
        .par_iter()
        .map(|target| resolve(params_t1, params_t2, target, config))
        .collect()
}
