//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the stderr log subscriber
//! - dispatches to the pipeline and prints reports
//! - writes optional exports

use clap::Parser;
use tracing::Level;

use crate::cli::{BatchArgs, Cli, Command, ConcentrationArgs, MimicArgs, RelaxationArgs, SolverArgs};
use crate::domain::{ConcentrationPair, ResolveConfig};
use crate::error::AppError;
use crate::io::{LabelledConcentrationRow, RelaxationRow};

pub mod pipeline;

/// Entry point for the `phantom` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the normal case.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(log_level(cli.verbose, cli.quiet));

    match cli.command {
        Command::Concentrations(args) => handle_concentrations(args),
        Command::Relaxation(args) => handle_relaxation(args),
        Command::Batch(args) => handle_batch(args),
        Command::Mimic(args) => handle_mimic(args),
    }
}

fn handle_concentrations(args: ConcentrationArgs) -> Result<(), AppError> {
    let config = resolve_config_from_args(&args.solver);
    let models = &args.models;

    println!(
        "{}",
        crate::report::format_run_header(args.target_t1, args.target_t2, &models.t1_model_file, &models.t2_model_file)
    );
    let resolution = pipeline::run_concentrations(
        args.target_t1,
        args.target_t2,
        &models.t1_model_file,
        &models.t2_model_file,
        &config,
    )?;
    println!("{}", crate::report::format_resolution(&resolution));

    if let Some(path) = &args.output_file {
        let rows = crate::io::concentration_rows(&resolution, &models.t1_model_file, &models.t2_model_file);
        crate::io::write_rows_csv(path, &rows)?;
        tracing::info!(path = %path.display(), "Saved concentrations");
    }
    if let Some(path) = &args.json {
        crate::io::write_resolutions_json(path, std::slice::from_ref(&resolution))?;
        tracing::info!(path = %path.display(), "Saved resolution JSON");
    }
    Ok(())
}

fn handle_relaxation(args: RelaxationArgs) -> Result<(), AppError> {
    let times = pipeline::run_relaxation(args.target_field, &args.t1_model_file, &args.t2_model_file)?;
    println!(
        "{}",
        crate::report::format_tissue(&times, args.target_field, &args.t1_model_file, &args.t2_model_file)
    );

    if let Some(path) = &args.output_file {
        let row = RelaxationRow::new(times, args.target_field, &args.t1_model_file, &args.t2_model_file);
        crate::io::write_rows_csv(path, &[row])?;
        tracing::info!(path = %path.display(), "Saved relaxation times");
    }
    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = resolve_config_from_args(&args.solver);
    let models = &args.models;

    let run = pipeline::run_batch(&args.targets, &models.t1_model_file, &models.t2_model_file, &config)?;
    println!("{}", crate::report::format_batch(&run.targets, &run.resolutions));

    if let Some(path) = &args.output_file {
        let mut rows = Vec::new();
        for (idx, (target, resolution)) in run.targets.iter().zip(&run.resolutions).enumerate() {
            let label = target.label.clone().unwrap_or_else(|| (idx + 1).to_string());
            rows.extend(
                crate::io::concentration_rows(resolution, &models.t1_model_file, &models.t2_model_file)
                    .into_iter()
                    .map(|row| LabelledConcentrationRow::new(label.clone(), row)),
            );
        }
        crate::io::write_rows_csv(path, &rows)?;
        tracing::info!(path = %path.display(), rows = rows.len(), "Saved batch concentrations");
    }
    if let Some(path) = &args.json {
        crate::io::write_resolutions_json(path, &run.resolutions)?;
        tracing::info!(path = %path.display(), "Saved batch JSON");
    }
    Ok(())
}

fn handle_mimic(args: MimicArgs) -> Result<(), AppError> {
    let config = resolve_config_from_args(&args.solver);
    let tissue = &args.tissue;
    let models = &args.models;

    let run = pipeline::run_mimic(
        args.target_field,
        &tissue.tissue_t1_model_file,
        &tissue.tissue_t2_model_file,
        &models.t1_model_file,
        &models.t2_model_file,
        &config,
    )?;
    println!(
        "{}",
        crate::report::format_tissue(&run.tissue, args.target_field, &tissue.tissue_t1_model_file, &tissue.tissue_t2_model_file)
    );
    println!("{}", crate::report::format_resolution(&run.resolution));

    if let Some(path) = &args.output_file {
        let rows = crate::io::concentration_rows(&run.resolution, &models.t1_model_file, &models.t2_model_file);
        crate::io::write_rows_csv(path, &rows)?;
        tracing::info!(path = %path.display(), "Saved concentrations");
    }
    Ok(())
}

pub fn resolve_config_from_args(args: &SolverArgs) -> ResolveConfig {
    ResolveConfig {
        tolerance: args.tolerance,
        start: ConcentrationPair::new(args.start_agarose, args.start_salt),
        max_iterations: args.max_iterations,
        ..ResolveConfig::default()
    }
}

fn log_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::WARN;
    }
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn init_logging(level: Level) {
    // Results go to stdout; logs stay on stderr.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
