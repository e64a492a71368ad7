//! Error types for the csv2mt940 library.

use std::io;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading the CSV export or writing the
/// MT940 statement.
///
/// Every row-scoped error is fatal to the whole run: the conversion aborts
/// rather than produce a possibly-incorrect statement, and the error carries
/// the row number plus the raw text so the source data can be fixed.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred during read or write operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reported by the CSV reader itself.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// A date column does not match the expected `DD.MM.YYYY` shape.
    #[error("unexpected date format (expected DD.MM.YYYY) at row {row}: '{value}'")]
    InvalidDateFormat { row: usize, value: String },

    /// Neither the debit amount column nor the credit amount column carries
    /// a value.
    #[error("neither amount (col 10) nor amount (col 11) has a value at row {row}: {raw}")]
    MissingAmount { row: usize, raw: String },

    /// A data row has fewer columns than the fixed layout requires.
    #[error("row {row} has too few columns: {columns}, needed >= {required}: {raw}")]
    MalformedRow {
        row: usize,
        columns: usize,
        required: usize,
        raw: String,
    },

    /// Unsupported encoding name, or input bytes invalid for the selected
    /// encoding.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Unknown narrative profile name.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
}
