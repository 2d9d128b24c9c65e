use std::path::PathBuf;
use thiserror::Error;

use crate::annotation::ParseError;
use crate::validation::ValidationReport;

/// The main error type for voctext operations.
#[derive(Debug, Error)]
pub enum VoctextError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse annotation {path}: {source}")]
    AnnotationParse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Failed to traverse {path}: {message}")]
    Traverse { path: PathBuf, message: String },

    #[error("Invalid input {path}: {message}")]
    InvalidInput { path: PathBuf, message: String },

    #[error("Failed to parse export JSON from {path}: {source}")]
    ExportJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write export JSON to {path}: {source}")]
    ExportJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write export CSV to {path}: {source}")]
    ExportCsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
