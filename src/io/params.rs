//! Model parameter CSV loading and validation.
//!
//! A parameter file is a one-row CSV whose columns name the coefficients, e.g.
//!
//! ```text
//! dim,a1,param_ag_1,param_oth_1,param_mix_1,param_ag_2,param_oth_2,param_mix_2,param_mix_3,param_mix_4
//! 2,0.31,0.89,0.0043,...
//! ```
//!
//! Design goals:
//! - **Strict schema**: every required column must exist; all missing names are
//!   reported together, in schema order
//! - Extra columns (fit statistics, notes) are ignored
//! - Only the first data row is used

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{LorentzianParams, LorentzianTerm, MixingModelParams};
use crate::error::AppError;

/// The first data row of a parameter CSV, addressable by column name.
#[derive(Debug, Clone)]
pub struct ParameterRow {
    source: String,
    header_map: HashMap<String, usize>,
    record: StringRecord,
}

impl ParameterRow {
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::io(format!("Failed to open parameter CSV '{}'", path.display()), e))?;
        Self::from_reader(file, path.display().to_string())
    }

    /// `source` is only used in error messages.
    pub fn from_reader<R: Read>(reader: R, source: impl Into<String>) -> Result<Self, AppError> {
        let source = source.into();
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| AppError::csv(format!("Failed to read CSV headers of '{source}'"), e))?
            .clone();
        let header_map = build_header_map(&headers);

        let record = match reader.records().next() {
            Some(Ok(record)) => record,
            Some(Err(e)) => return Err(AppError::csv(format!("Failed to read first row of '{source}'"), e)),
            None => return Err(AppError::EmptyInput { source_name: source }),
        };

        Ok(Self {
            source,
            header_map,
            record,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.header_map.contains_key(name)
    }

    /// Names from `required` that have no column.
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| !self.has_column(name))
            .collect()
    }

    /// Parse every `required` column as `f64`, in order.
    pub fn require<const N: usize>(&self, required: &[&str; N]) -> Result<[f64; N], AppError> {
        let missing = self.missing(required);
        if !missing.is_empty() {
            return Err(AppError::MissingParameters {
                source_name: self.source.clone(),
                missing: missing.into_iter().map(str::to_string).collect(),
            });
        }

        let mut values = [0.0; N];
        for (slot, name) in values.iter_mut().zip(required) {
            *slot = self.parse_f64(name)?;
        }
        Ok(values)
    }

    fn parse_f64(&self, name: &str) -> Result<f64, AppError> {
        let raw = self
            .header_map
            .get(name)
            .and_then(|&idx| self.record.get(idx))
            .unwrap_or("");
        let value: f64 = raw.parse().map_err(|_| self.invalid(name, format!("not a number: {raw:?}")))?;
        if !value.is_finite() {
            return Err(self.invalid(name, format!("must be finite (got {raw})")));
        }
        Ok(value)
    }

    fn invalid(&self, name: &str, message: String) -> AppError {
        AppError::InvalidParameter {
            source_name: self.source.clone(),
            name: name.to_string(),
            message,
        }
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

/// Build a mixing model from a validated row.
pub fn mixing_model_from_row(row: &ParameterRow) -> Result<MixingModelParams, AppError> {
    let values = row.require(&MixingModelParams::REQUIRED)?;
    Ok(MixingModelParams::from_ordered(values))
}

/// Build a Lorentzian tissue model from a validated row.
pub fn lorentzian_model_from_row(row: &ParameterRow) -> Result<LorentzianParams, AppError> {
    let [
        n_lorentzian,
        big_a,
        numerator_0,
        numerator_1,
        numerator_2,
        tau_0,
        beta_0,
        c_0,
        tau_1,
        beta_1,
        c_1,
        tau_2,
        beta_2,
        c_2,
    ] = row.require(&LorentzianParams::REQUIRED)?;

    let max_terms = LorentzianParams::MAX_TERMS as f64;
    if n_lorentzian.fract() != 0.0 || !(0.0..=max_terms).contains(&n_lorentzian) {
        return Err(row.invalid(
            "n_lorentzian",
            format!("must be an integer between 0 and {max_terms} (got {n_lorentzian})"),
        ));
    }

    Ok(LorentzianParams {
        n_lorentzian: n_lorentzian as usize,
        big_a,
        numerators: [numerator_0, numerator_1, numerator_2],
        terms: [
            LorentzianTerm {
                tau: tau_0,
                beta: beta_0,
                c: c_0,
            },
            LorentzianTerm {
                tau: tau_1,
                beta: beta_1,
                c: c_1,
            },
            LorentzianTerm {
                tau: tau_2,
                beta: beta_2,
                c: c_2,
            },
        ],
    })
}

/// Load a mixing model (T1 or T2) from a CSV file.
pub fn load_mixing_model(path: &Path) -> Result<MixingModelParams, AppError> {
    let params = mixing_model_from_row(&ParameterRow::from_path(path)?)?;
    tracing::debug!(path = %path.display(), ?params, "loaded mixing model");
    Ok(params)
}

/// Load a Lorentzian tissue model from a CSV file.
pub fn load_lorentzian_model(path: &Path) -> Result<LorentzianParams, AppError> {
    let params = lorentzian_model_from_row(&ParameterRow::from_path(path)?)?;
    tracing::debug!(path = %path.display(), ?params, "loaded tissue model");
    Ok(params)
}
