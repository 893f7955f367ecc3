//! Crate-wide error type.
//!
//! Every fallible operation returns `AppError`. Each variant maps to a process
//! exit code so `main` can stay a two-line wrapper.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// A parameter file is missing one or more required columns.
    #[error("Missing parameters for model '{source_name}': {}", .missing.join(", "))]
    MissingParameters { source_name: String, missing: Vec<String> },

    /// A parameter or target file has a header but no data rows.
    #[error("No data rows in '{source_name}'")]
    EmptyInput { source_name: String },

    /// A required column exists but its value is unusable.
    #[error("Invalid parameter `{name}` in '{source_name}': {message}")]
    InvalidParameter {
        source_name: String,
        name: String,
        message: String,
    },

    /// An unknown relaxation-kind or concentration-axis label.
    #[error("Unknown {selector}: {value}")]
    UnknownSelector { selector: &'static str, value: String },

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Csv {
        context: String,
        #[source]
        source: csv::Error,
    },

    #[error("{context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::MissingParameters { .. }
            | AppError::EmptyInput { .. }
            | AppError::InvalidParameter { .. }
            | AppError::Io { .. }
            | AppError::Csv { .. }
            | AppError::Json { .. } => 2,
            AppError::InvalidTarget(_) => 3,
            AppError::UnknownSelector { .. } => 4,
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn csv(context: impl Into<String>, source: csv::Error) -> Self {
        AppError::Csv {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        AppError::Json {
            context: context.into(),
            source,
        }
    }
}
