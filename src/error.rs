//! Error handling for Raven file reading.
//!
//! Every failure aborts the current read pass. Variants carry the path of the
//! file that was active when the problem was found so that errors inside
//! redirected files point at the right place.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RavenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("RedirectToFile path invalid: {path} (in file: {source_file})")]
    RedirectTargetMissing { path: PathBuf, source_file: PathBuf },

    #[error("Malformed date line in file: {path} - '{line}': {reason}")]
    MalformedDateLine {
        path: PathBuf,
        line: String,
        reason: String,
    },

    #[error(
        "Table parse error in file: {path} at line {line_number} (row {row}, column '{column}'): {reason}"
    )]
    TableParseError {
        path: PathBuf,
        line_number: usize,
        row: usize,
        column: String,
        reason: String,
    },

    #[error("Gauge index {index} out of range ({count} gauges)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Unexpected end of input in file: {path} while reading {context}")]
    UnexpectedEndOfInput { path: PathBuf, context: String },

    #[error("Malformed tag in file: {path} - '{tag}': {reason}")]
    MalformedTag {
        path: PathBuf,
        tag: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, RavenError>;
