//! Command-line parsing for the phantom concentration solver.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! modeling/solver code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "phantom",
    version,
    about = "Agarose/salt phantom concentrations for target MR relaxation times"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find agarose and salt concentrations that mimic a target T1 and T2.
    Concentrations(ConcentrationArgs),
    /// Predict tissue T1 and T2 at a field strength from Lorentzian tissue models.
    Relaxation(RelaxationArgs),
    /// Resolve concentrations for every target in a CSV file.
    Batch(BatchArgs),
    /// Predict tissue T1/T2 at a field strength, then find phantom concentrations for them.
    Mimic(MimicArgs),
}

/// Mixing model files (T1 and T2).
#[derive(Debug, Args, Clone)]
pub struct MixingModelArgs {
    /// CSV file containing the T1 mixing model parameters.
    #[arg(long = "t1-model-file", env = "PHANTOM_T1_MODEL", value_name = "CSV")]
    pub t1_model_file: PathBuf,

    /// CSV file containing the T2 mixing model parameters.
    #[arg(long = "t2-model-file", env = "PHANTOM_T2_MODEL", value_name = "CSV")]
    pub t2_model_file: PathBuf,
}

/// Joint solver / validation knobs.
#[derive(Debug, Args, Clone)]
pub struct SolverArgs {
    /// Maximum relative error on T1 and T2 for a joint solution.
    #[arg(long, default_value_t = 0.1)]
    pub tolerance: f64,

    /// Joint solver starting agarose concentration (% w/v).
    #[arg(long, default_value_t = 0.1)]
    pub start_agarose: f64,

    /// Joint solver starting salt concentration (mM).
    #[arg(long, default_value_t = 0.1)]
    pub start_salt: f64,

    /// Joint solver iteration limit.
    #[arg(long, default_value_t = 100)]
    pub max_iterations: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ConcentrationArgs {
    /// Target T1 value to mimic in seconds.
    #[arg(long = "target-t1")]
    pub target_t1: f64,

    /// Target T2 value to mimic in seconds.
    #[arg(long = "target-t2")]
    pub target_t2: f64,

    #[command(flatten)]
    pub models: MixingModelArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Save the solution rows to this CSV file.
    #[arg(long = "output-file", value_name = "CSV")]
    pub output_file: Option<PathBuf>,

    /// Save the full resolution (including joint-solve diagnostics) as JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,
}

/// Lorentzian tissue model files (T1 and T2).
#[derive(Debug, Args, Clone)]
pub struct TissueModelArgs {
    /// CSV file containing the T1 Lorentzian model parameters for the tissue.
    #[arg(long = "tissue-t1-model-file", env = "PHANTOM_TISSUE_T1_MODEL", value_name = "CSV")]
    pub tissue_t1_model_file: PathBuf,

    /// CSV file containing the T2 Lorentzian model parameters for the tissue.
    #[arg(long = "tissue-t2-model-file", env = "PHANTOM_TISSUE_T2_MODEL", value_name = "CSV")]
    pub tissue_t2_model_file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct RelaxationArgs {
    /// Target field strength in tesla.
    #[arg(long = "target-field")]
    pub target_field: f64,

    /// CSV file containing the T1 model parameters for the tissue.
    #[arg(long = "t1-model-file", env = "PHANTOM_TISSUE_T1_MODEL", value_name = "CSV")]
    pub t1_model_file: PathBuf,

    /// CSV file containing the T2 model parameters for the tissue.
    #[arg(long = "t2-model-file", env = "PHANTOM_TISSUE_T2_MODEL", value_name = "CSV")]
    pub t2_model_file: PathBuf,

    /// Save the relaxation times to this CSV file.
    #[arg(long = "output-file", value_name = "CSV")]
    pub output_file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// CSV with `target_t1__s`, `target_t2__s` and an optional `label` column.
    #[arg(long, value_name = "CSV")]
    pub targets: PathBuf,

    #[command(flatten)]
    pub models: MixingModelArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Save all solution rows (prefixed with the target label) to this CSV file.
    #[arg(long = "output-file", value_name = "CSV")]
    pub output_file: Option<PathBuf>,

    /// Save every resolution as JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct MimicArgs {
    /// Field strength in tesla at which the tissue is mimicked.
    #[arg(long = "target-field")]
    pub target_field: f64,

    #[command(flatten)]
    pub tissue: TissueModelArgs,

    #[command(flatten)]
    pub models: MixingModelArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Save the solution rows to this CSV file.
    #[arg(long = "output-file", value_name = "CSV")]
    pub output_file: Option<PathBuf>,
}
