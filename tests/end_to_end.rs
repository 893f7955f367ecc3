//! Load model files from disk, resolve targets, and export results.

use std::path::{Path, PathBuf};

use phantom_mix::app::pipeline::{run_batch, run_relaxation};
use phantom_mix::domain::{ConcentrationPair, RelaxationTimes, ResolutionOutcome, ResolveConfig, TargetRelaxation};
use phantom_mix::error::AppError;
use phantom_mix::io::{concentration_rows, load_mixing_model, write_resolutions_json, write_rows_csv};
use phantom_mix::solve::resolve;

const MIXING_HEADER: &str =
    "dim,a1,param_ag_1,param_oth_1,param_mix_1,param_ag_2,param_oth_2,param_mix_2,param_mix_3,param_mix_4";

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("phantom-e2e-{}-{name}", std::process::id()))
}

fn write_file(name: &str, contents: &str) -> PathBuf {
    let path = temp_path(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn baseline_model(name: &str) -> PathBuf {
    write_file(name, &format!("{MIXING_HEADER}\n2,1.0,0.1,0,0,0,0,0,0,0\n"))
}

#[test]
fn baseline_target_resolves_to_zero_pair_and_exports() {
    let t1_path = baseline_model("baseline_t1.csv");
    let t2_path = baseline_model("baseline_t2.csv");
    let params_t1 = load_mixing_model(&t1_path).unwrap();
    let params_t2 = load_mixing_model(&t2_path).unwrap();

    let target = TargetRelaxation::new(1.0, 1.0).unwrap();
    let resolution = resolve(&params_t1, &params_t2, &target, &ResolveConfig::default());

    assert_eq!(resolution.outcome, ResolutionOutcome::Joint);
    assert_eq!(resolution.concentrations(), vec![ConcentrationPair::new(0.0, 0.0)]);
    assert_eq!(resolution.relaxation_times(), vec![RelaxationTimes { t1: 1.0, t2: 1.0 }]);

    let out = temp_path("baseline_out.csv");
    write_rows_csv(&out, &concentration_rows(&resolution, &t1_path, &t2_path)).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("0.0,0.0,1.0,1.0,1.0,1.0,"), "{}", lines[1]);
    assert!(lines[1].ends_with(&format!("{},{}", t1_path.display(), t2_path.display())));
}

#[test]
fn missing_coefficient_column_fails_to_load() {
    let header = MIXING_HEADER.trim_end_matches(",param_mix_4");
    let path = write_file("no_mix_4.csv", &format!("{header}\n2,1.0,0.1,0,0,0,0,0,0\n"));

    let err = load_mixing_model(&path).unwrap_err();
    assert_eq!(err.exit_code(), 2);
    match err {
        AppError::MissingParameters { missing, .. } => assert_eq!(missing, vec!["param_mix_4".to_string()]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_model_file_is_an_io_error() {
    let err = load_mixing_model(Path::new("/definitely/not/here/t1.csv")).unwrap_err();
    assert!(matches!(err, AppError::Io { .. }));
    assert!(err.to_string().contains("/definitely/not/here/t1.csv"));
}

#[test]
fn batch_keeps_target_order_and_writes_json() {
    let t1_path = write_file("batch_t1.csv", &format!("{MIXING_HEADER}\n2,0.5,0.5,0.002,0,0,0,0,0,0\n"));
    let t2_path = write_file("batch_t2.csv", &format!("{MIXING_HEADER}\n2,1.0,2.0,0.2,0,0,0,0,0,0\n"));
    let targets = write_file(
        "batch_targets.csv",
        "label,target_t1__s,target_t2__s\nbaseline,2.0,1.0\ngel,0.8,0.08\nunreachable,5.0,5.0\n",
    );

    let run = run_batch(&targets, &t1_path, &t2_path, &ResolveConfig::default()).unwrap();
    let labels: Vec<_> = run.targets.iter().map(|t| t.label.clone().unwrap()).collect();
    assert_eq!(labels, ["baseline", "gel", "unreachable"]);

    let outcomes: Vec<_> = run.resolutions.iter().map(|r| r.outcome).collect();
    assert_eq!(
        outcomes,
        [ResolutionOutcome::Joint, ResolutionOutcome::Joint, ResolutionOutcome::OutOfRange]
    );
    assert_eq!(run.resolutions[0].concentrations(), vec![ConcentrationPair::ZERO]);
    assert_eq!(run.resolutions[2].concentrations(), vec![ConcentrationPair::ZERO]);
    assert_eq!(run.resolutions[2].relaxation_times(), vec![RelaxationTimes { t1: 2.0, t2: 1.0 }]);

    let json_path = temp_path("batch.json");
    write_resolutions_json(&json_path, &run.resolutions).unwrap();
    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value[1]["outcome"], "joint");
    assert_eq!(value[2]["outcome"], "out_of_range");
    assert_eq!(value[1]["target"]["t2"], 0.08);
}

#[test]
fn relaxation_predicts_rounded_tissue_times() {
    let header =
        "n_lorentzian,big_a,numerator_0,numerator_1,numerator_2,tau_0,beta_0,c_0,tau_1,beta_1,c_1,tau_2,beta_2,c_2";
    // One flat term (numerator_0 only): rate = 0.5 + 2e6 * 1e-6 = 2.5 1/s.
    let t1_path = write_file("tissue_t1.csv", &format!("{header}\n1,0.5,1,0,0,1e-6,1,2e6,0,0,0,0,0,0\n"));
    let t2_path = write_file("tissue_t2.csv", &format!("{header}\n0,30,0,0,0,0,0,0,0,0,0,0,0,0\n"));

    let times = run_relaxation(1.5, &t1_path, &t2_path).unwrap();
    assert_eq!(times, RelaxationTimes { t1: 0.4, t2: 0.033 });
}
