//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the solver code stays clean and testable
//! - output changes are localized

use std::path::Path;

use crate::domain::{RelaxationTimes, Resolution, ResolutionOutcome};
use crate::io::TargetRow;

/// Banner printed before a concentration solve.
pub fn format_run_header(target_t1: f64, target_t2: f64, t1_model: &Path, t2_model: &Path) -> String {
    let mut out = String::new();
    out.push_str(&rule());
    out.push_str(&format!("Solving for T1 of {target_t1} s and T2 of {target_t2} s\n"));
    out.push_str(&format!("Using t1 model: {}\n", t1_model.display()));
    out.push_str(&format!("Using t2 model: {}\n", t2_model.display()));
    out.push_str(&rule());
    out
}

/// Target, outcome, and a table of solutions.
pub fn format_resolution(resolution: &Resolution) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Target T1 (s): {} T2 (s): {}\n",
        resolution.target.t1, resolution.target.t2
    ));
    out.push_str(&format!("Outcome: {}\n", resolution.outcome.display_name()));
    if resolution.outcome != ResolutionOutcome::Joint {
        out.push_str(&format!(
            "Joint solve: agarose={:.3} salt={:.3} ({} iterations, residual={:.3e})\n",
            resolution.joint.concentrations.agarose,
            resolution.joint.concentrations.salt,
            resolution.joint.iterations,
            resolution.joint.residual_norm,
        ));
    }

    out.push_str("Solution(s):\n");
    out.push_str(&solution_table(resolution));
    out
}

/// One block per target, in input order.
pub fn format_batch(rows: &[TargetRow], resolutions: &[Resolution]) -> String {
    let mut out = String::new();
    for (idx, (row, resolution)) in rows.iter().zip(resolutions).enumerate() {
        let label = row.label.clone().unwrap_or_else(|| format!("target #{}", idx + 1));
        out.push_str(&format!("[{label}]\n"));
        out.push_str(&format_resolution(resolution));
        out.push('\n');
    }

    let joint = resolutions
        .iter()
        .filter(|r| r.outcome == ResolutionOutcome::Joint)
        .count();
    let out_of_range = resolutions
        .iter()
        .filter(|r| r.outcome == ResolutionOutcome::OutOfRange)
        .count();
    out.push_str(&format!(
        "Resolved {} target(s): {joint} joint, {} fallback, {out_of_range} out of range\n",
        resolutions.len(),
        resolutions.len() - joint - out_of_range,
    ));
    out
}

/// Tissue relaxation times at a field strength.
pub fn format_tissue(times: &RelaxationTimes, field: f64, t1_model: &Path, t2_model: &Path) -> String {
    let mut out = String::new();
    out.push_str(&rule());
    out.push_str(&format!("Solving for target field {field} T\n"));
    out.push_str(&format!("Using t1 model: {}\n", t1_model.display()));
    out.push_str(&format!("Using t2 model: {}\n", t2_model.display()));
    out.push_str(&rule());
    out.push_str(&format!("Tissue T1 (s): {} T2 (s): {}\n", times.t1, times.t2));
    out
}

fn solution_table(resolution: &Resolution) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  {:<3} {:>16} {:>12} {:>10} {:>10}\n",
        "#", "agarose (% w/v)", "salt (mM)", "T1 (s)", "T2 (s)"
    ));
    for (idx, s) in resolution.solutions.iter().enumerate() {
        out.push_str(&format!(
            "  {:<3} {:>16.3} {:>12.3} {:>10.3} {:>10.3}\n",
            idx + 1,
            s.concentrations.agarose,
            s.concentrations.salt,
            s.times.t1,
            s.times.t2
        ));
    }
    out
}

fn rule() -> String {
    format!("{:-<48}\n", "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CandidateSolution, ConcentrationPair, JointSolution, TargetRelaxation};

    fn resolution(outcome: ResolutionOutcome, solutions: Vec<CandidateSolution>) -> Resolution {
        Resolution {
            target: TargetRelaxation::new(1.0, 0.1).unwrap(),
            outcome,
            joint: JointSolution {
                concentrations: ConcentrationPair::new(0.4, -3.0),
                iterations: 7,
                residual_norm: 1e-3,
                converged: false,
            },
            solutions,
        }
    }

    fn solution(ag: f64, salt: f64) -> CandidateSolution {
        CandidateSolution {
            concentrations: ConcentrationPair::new(ag, salt),
            times: RelaxationTimes { t1: 1.0, t2: 0.1 },
        }
    }

    #[test]
    fn joint_resolution_has_single_row_and_no_diagnostics() {
        let text = format_resolution(&resolution(ResolutionOutcome::Joint, vec![solution(1.25, 40.0)]));
        assert!(text.contains("Outcome: joint solution"));
        assert!(!text.contains("Joint solve:"));
        assert!(text.contains("1.250"));
        assert!(text.contains("40.000"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn fallback_resolution_lists_both_solutions() {
        let text = format_resolution(&resolution(
            ResolutionOutcome::Fallback,
            vec![solution(0.5, 0.0), solution(0.0, 120.0)],
        ));
        assert!(text.contains("Joint solve: agarose=0.400 salt=-3.000 (7 iterations"));
        assert!(text.contains("120.000"));
        assert!(text.lines().any(|l| l.trim_start().starts_with("2 ")));
    }

    #[test]
    fn batch_summary_counts_outcomes() {
        let rows = vec![
            TargetRow {
                label: Some("grey matter".to_string()),
                target: TargetRelaxation::new(1.0, 0.1).unwrap(),
            },
            TargetRow {
                label: None,
                target: TargetRelaxation::new(1.0, 0.1).unwrap(),
            },
        ];
        let resolutions = vec![
            resolution(ResolutionOutcome::Joint, vec![solution(1.0, 1.0)]),
            resolution(ResolutionOutcome::OutOfRange, vec![solution(0.0, 0.0)]),
        ];
        let text = format_batch(&rows, &resolutions);
        assert!(text.contains("[grey matter]"));
        assert!(text.contains("[target #2]"));
        assert!(text.contains("Resolved 2 target(s): 1 joint, 0 fallback, 1 out of range"));
    }

    #[test]
    fn tissue_report_shows_field_and_times() {
        let text = format_tissue(
            &RelaxationTimes { t1: 1.084, t2: 0.069 },
            3.0,
            Path::new("t1.csv"),
            Path::new("t2.csv"),
        );
        assert!(text.contains("Solving for target field 3 T"));
        assert!(text.contains("Tissue T1 (s): 1.084 T2 (s): 0.069"));
    }
}
