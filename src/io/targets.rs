//! Target list CSV for batch resolution.
//!
//! Required columns: `target_t1__s`, `target_t2__s`. Optional: `label`.
//! Unlike parameter files, every row is used; any bad row aborts the load with
//! its line number.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::domain::TargetRelaxation;
use crate::error::AppError;

/// One target pair with an optional human-readable label (e.g. tissue name).
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRow {
    pub label: Option<String>,
    pub target: TargetRelaxation,
}

#[derive(Debug, Deserialize)]
struct RawTargetRow {
    #[serde(default)]
    label: Option<String>,
    #[serde(rename = "target_t1__s")]
    target_t1: f64,
    #[serde(rename = "target_t2__s")]
    target_t2: f64,
}

pub fn load_targets(path: &Path) -> Result<Vec<TargetRow>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open targets CSV '{}'", path.display()), e))?;
    read_targets(file, &path.display().to_string())
}

pub fn read_targets<R: Read>(reader: R, source: &str) -> Result<Vec<TargetRow>, AppError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<RawTargetRow>().enumerate() {
        // +2: 1-based lines, plus the header line.
        let line = idx + 2;
        let raw = result.map_err(|e| AppError::csv(format!("Invalid target row at {source}:{line}"), e))?;
        let target = TargetRelaxation::new(raw.target_t1, raw.target_t2)
            .map_err(|e| match e {
                AppError::InvalidTarget(msg) => AppError::InvalidTarget(format!("{source}:{line}: {msg}")),
                other => other,
            })?;
        rows.push(TargetRow {
            label: raw.label.filter(|l| !l.is_empty()),
            target,
        });
    }

    if rows.is_empty() {
        return Err(AppError::EmptyInput {
            source_name: source.to_string(),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_labelled_and_unlabelled_rows() {
        let csv = "label,target_t1__s,target_t2__s\nwhite matter,0.83,0.08\n,1.4,0.1\n";
        let rows = read_targets(csv.as_bytes(), "targets.csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label.as_deref(), Some("white matter"));
        assert_eq!(rows[0].target.t1, 0.83);
        assert_eq!(rows[1].label, None);
        assert_eq!(rows[1].target.t2, 0.1);
    }

    #[test]
    fn label_column_is_optional() {
        let csv = "target_t1__s,target_t2__s\n1.0,0.05\n";
        let rows = read_targets(csv.as_bytes(), "targets.csv").unwrap();
        assert_eq!(rows[0].label, None);
    }

    #[test]
    fn non_positive_target_reports_line() {
        let csv = "target_t1__s,target_t2__s\n1.0,0.05\n1.0,-0.05\n";
        let err = read_targets(csv.as_bytes(), "targets.csv").unwrap_err();
        assert!(matches!(err, AppError::InvalidTarget(_)));
        assert!(err.to_string().contains("targets.csv:3"), "{err}");
    }

    #[test]
    fn missing_column_is_a_csv_error() {
        let csv = "target_t1__s\n1.0\n";
        let err = read_targets(csv.as_bytes(), "targets.csv").unwrap_err();
        assert!(matches!(err, AppError::Csv { .. }));
    }
}
