//! Error type shared by every stage of the analyze and edit pipelines.
use std::path::PathBuf;
use thiserror::Error;

/// error types for parsing model2 files, simulation tables and configuration
#[derive(Debug, Error)]
pub enum Model2Error {
    #[error("File '{}' does not exist", path.display())]
    FileNotFound { path: PathBuf },
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Table error in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Malformed rule at line {line_no}: '{line}' ({reason})")]
    MalformedRuleLine {
        line_no: usize,
        line: String,
        reason: String,
    },
    #[error("Sentinel line '{sentinel}' not found in '{}'", path.display())]
    MissingSentinel { path: PathBuf, sentinel: String },
    #[error("Malformed number '{value}' in '{}' (row {row}, column {column})", path.display())]
    MalformedNumber {
        path: PathBuf,
        row: usize,
        column: usize,
        value: String,
    },
    #[error("Row {row} of '{}' has {found} columns, header has {expected}", path.display())]
    RaggedRow {
        path: PathBuf,
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("Header of '{}' has {found} columns, at least {expected} are needed", path.display())]
    MissingColumns {
        path: PathBuf,
        found: usize,
        expected: usize,
    },
    #[error("Table '{}' has no header row", path.display())]
    EmptyTable { path: PathBuf },
    #[error("Element '{element}' of rule {rule} is missing from the element table")]
    InconsistentElementSet { element: String, rule: String },
    #[error("Ratio {numerator}/{denominator} is undefined")]
    DivisionUndefined { numerator: f64, denominator: f64 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Model2Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Model2Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Model2Error::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Nreac/Nprod style ratio. Either operand being zero leaves the ratio undefined.
pub fn checked_ratio(numerator: f64, denominator: f64) -> Result<f64, Model2Error> {
    if numerator == 0.0 || denominator == 0.0 {
        return Err(Model2Error::DivisionUndefined {
            numerator,
            denominator,
        });
    }
    Ok(numerator / denominator)
}
