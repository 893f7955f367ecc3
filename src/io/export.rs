//! Export results to CSV / JSON.
//!
//! CSV exports keep the column names downstream phantom-recipe spreadsheets
//! already expect (`agarose_concentration__wv`, `t1__s`, ...).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{RelaxationTimes, Resolution};
use crate::error::AppError;

/// One solution row of a concentrations export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcentrationRow {
    #[serde(rename = "agarose_concentration__wv")]
    pub agarose_concentration: f64,
    #[serde(rename = "salt_concentration__mM")]
    pub salt_concentration: f64,
    #[serde(rename = "t1__s")]
    pub t1: f64,
    #[serde(rename = "t2__s")]
    pub t2: f64,
    #[serde(rename = "target_t1__s")]
    pub target_t1: f64,
    #[serde(rename = "target_t2__s")]
    pub target_t2: f64,
    pub t1_model_file: String,
    pub t2_model_file: String,
}

/// [`ConcentrationRow`] prefixed with the target's label (batch exports).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelledConcentrationRow {
    pub label: String,
    #[serde(rename = "agarose_concentration__wv")]
    pub agarose_concentration: f64,
    #[serde(rename = "salt_concentration__mM")]
    pub salt_concentration: f64,
    #[serde(rename = "t1__s")]
    pub t1: f64,
    #[serde(rename = "t2__s")]
    pub t2: f64,
    #[serde(rename = "target_t1__s")]
    pub target_t1: f64,
    #[serde(rename = "target_t2__s")]
    pub target_t2: f64,
    pub t1_model_file: String,
    pub t2_model_file: String,
}

impl LabelledConcentrationRow {
    pub fn new(label: impl Into<String>, row: ConcentrationRow) -> Self {
        Self {
            label: label.into(),
            agarose_concentration: row.agarose_concentration,
            salt_concentration: row.salt_concentration,
            t1: row.t1,
            t2: row.t2,
            target_t1: row.target_t1,
            target_t2: row.target_t2,
            t1_model_file: row.t1_model_file,
            t2_model_file: row.t2_model_file,
        }
    }
}

/// Tissue relaxation times at one field strength.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelaxationRow {
    #[serde(rename = "t1__s")]
    pub t1: f64,
    #[serde(rename = "t2__s")]
    pub t2: f64,
    #[serde(rename = "target_field__t")]
    pub target_field: f64,
    pub t1_model_file: String,
    pub t2_model_file: String,
}

impl RelaxationRow {
    pub fn new(times: RelaxationTimes, field: f64, t1_model_file: &Path, t2_model_file: &Path) -> Self {
        Self {
            t1: times.t1,
            t2: times.t2,
            target_field: field,
            t1_model_file: t1_model_file.display().to_string(),
            t2_model_file: t2_model_file.display().to_string(),
        }
    }
}

/// One row per solution, in solution order.
pub fn concentration_rows(
    resolution: &Resolution,
    t1_model_file: &Path,
    t2_model_file: &Path,
) -> Vec<ConcentrationRow> {
    resolution
        .solutions
        .iter()
        .map(|s| ConcentrationRow {
            agarose_concentration: s.concentrations.agarose,
            salt_concentration: s.concentrations.salt,
            t1: s.times.t1,
            t2: s.times.t2,
            target_t1: resolution.target.t1,
            target_t2: resolution.target.t2,
            t1_model_file: t1_model_file.display().to_string(),
            t2_model_file: t2_model_file.display().to_string(),
        })
        .collect()
}

/// Serialize `rows` as CSV (with header) into any writer.
pub fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<(), AppError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer
            .serialize(row)
            .map_err(|e| AppError::csv("Failed to write export CSV row", e))?;
    }
    csv_writer
        .flush()
        .map_err(|e| AppError::io("Failed to flush export CSV", e))?;
    Ok(())
}

/// Write `rows` to a CSV file at `path`.
pub fn write_rows_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}'", path.display()), e))?;
    write_rows(file, rows)
}

/// Write resolutions (targets, outcome, joint diagnostics, solutions) as pretty JSON.
pub fn write_resolutions_json(path: &Path, resolutions: &[Resolution]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create JSON export '{}'", path.display()), e))?;
    serde_json::to_writer_pretty(file, resolutions).map_err(|e| AppError::json("Failed to write JSON export", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CandidateSolution, ConcentrationPair, JointSolution, ResolutionOutcome, TargetRelaxation,
    };

    fn resolution() -> Resolution {
        let solution = |ag, salt, t1, t2| CandidateSolution {
            concentrations: ConcentrationPair::new(ag, salt),
            times: RelaxationTimes { t1, t2 },
        };
        Resolution {
            target: TargetRelaxation::new(0.5, 0.02).unwrap(),
            outcome: ResolutionOutcome::Fallback,
            joint: JointSolution {
                concentrations: ConcentrationPair::new(1.194, -27.778),
                iterations: 1,
                residual_norm: 0.0,
                converged: true,
            },
            solutions: vec![solution(0.5, 0.0, 0.5, 0.04), solution(1.125, 0.0, 0.308, 0.02)],
        }
    }

    #[test]
    fn concentrations_csv_layout() {
        let rows = concentration_rows(&resolution(), Path::new("t1.csv"), Path::new("t2.csv"));
        let mut buf = Vec::new();
        write_rows(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "agarose_concentration__wv,salt_concentration__mM,t1__s,t2__s,target_t1__s,target_t2__s,t1_model_file,t2_model_file"
        );
        assert_eq!(lines[1], "0.5,0.0,0.5,0.04,0.5,0.02,t1.csv,t2.csv");
        assert_eq!(lines[2], "1.125,0.0,0.308,0.02,0.5,0.02,t1.csv,t2.csv");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn labelled_rows_put_label_first() {
        let rows: Vec<LabelledConcentrationRow> =
            concentration_rows(&resolution(), Path::new("t1.csv"), Path::new("t2.csv"))
                .into_iter()
                .map(|r| LabelledConcentrationRow::new("liver", r))
                .collect();
        let mut buf = Vec::new();
        write_rows(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("label,agarose_concentration__wv,"));
        assert!(text.lines().nth(1).unwrap().starts_with("liver,0.5,"));
    }

    #[test]
    fn relaxation_csv_layout() {
        let row = RelaxationRow::new(
            RelaxationTimes { t1: 1.084, t2: 0.069 },
            3.0,
            Path::new("wm_t1.csv"),
            Path::new("wm_t2.csv"),
        );
        let mut buf = Vec::new();
        write_rows(&mut buf, &[row]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "t1__s,t2__s,target_field__t,t1_model_file,t2_model_file\n1.084,0.069,3.0,wm_t1.csv,wm_t2.csv\n"
        );
    }
}
