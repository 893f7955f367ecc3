//! Shared "resolve pipeline" logic behind the CLI commands.
//!
//! Each function does the file loading and the model work of one command and
//! returns plain values; printing and exports stay in `app`.

use std::path::Path;

use crate::domain::{RelaxationTimes, Resolution, ResolveConfig, TargetRelaxation};
use crate::error::AppError;
use crate::io::{TargetRow, load_lorentzian_model, load_mixing_model, load_targets};
use crate::models::lorentzian::predict_tissue;
use crate::solve::{resolve, resolve_targets};

/// Decimal places of predicted tissue relaxation times.
const TISSUE_DECIMALS: u32 = 3;

/// All computed outputs of a `phantom batch` run, in target-file order.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub targets: Vec<TargetRow>,
    pub resolutions: Vec<Resolution>,
}

/// Tissue relaxation times and the phantom recipe reproducing them.
#[derive(Debug, Clone)]
pub struct MimicOutput {
    pub tissue: RelaxationTimes,
    pub resolution: Resolution,
}

pub fn run_concentrations(
    target_t1: f64,
    target_t2: f64,
    t1_model_file: &Path,
    t2_model_file: &Path,
    config: &ResolveConfig,
) -> Result<Resolution, AppError> {
    let target = TargetRelaxation::new(target_t1, target_t2)?;
    let params_t1 = load_mixing_model(t1_model_file)?;
    let params_t2 = load_mixing_model(t2_model_file)?;
    Ok(resolve(&params_t1, &params_t2, &target, config))
}

pub fn run_relaxation(field: f64, t1_model_file: &Path, t2_model_file: &Path) -> Result<RelaxationTimes, AppError> {
    let t1 = load_lorentzian_model(t1_model_file)?;
    let t2 = load_lorentzian_model(t2_model_file)?;
    tracing::info!(field, "Predicting tissue relaxation times");
    Ok(predict_tissue(&t1, &t2, field).rounded(TISSUE_DECIMALS))
}

pub fn run_batch(
    targets_file: &Path,
    t1_model_file: &Path,
    t2_model_file: &Path,
    config: &ResolveConfig,
) -> Result<BatchOutput, AppError> {
    let targets = load_targets(targets_file)?;
    let params_t1 = load_mixing_model(t1_model_file)?;
    let params_t2 = load_mixing_model(t2_model_file)?;

    tracing::info!(count = targets.len(), "Resolving batch targets");
    let plain: Vec<TargetRelaxation> = targets.iter().map(|row| row.target).collect();
    let resolutions = resolve_targets(&params_t1, &params_t2, &plain, config);

    Ok(BatchOutput { targets, resolutions })
}

pub fn run_mimic(
    field: f64,
    tissue_t1_model_file: &Path,
    tissue_t2_model_file: &Path,
    t1_model_file: &Path,
    t2_model_file: &Path,
    config: &ResolveConfig,
) -> Result<MimicOutput, AppError> {
    let tissue = run_relaxation(field, tissue_t1_model_file, tissue_t2_model_file)?;
    let resolution = run_concentrations(tissue.t1, tissue.t2, t1_model_file, t2_model_file, config)?;
    Ok(MimicOutput { tissue, resolution })
}
