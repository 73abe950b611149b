//! Error types for cloudopt runs
//!
//! Row-level problems in the optimize path never reach this type; they are
//! absorbed by the pipeline as skipped rows. Everything here aborts a run.

use thiserror::Error;

/// Errors that abort an entire run
#[derive(Debug, Error)]
pub enum CloudOptError {
    /// Threshold configuration could not be read or parsed
    #[error("invalid threshold configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// Tabular data could not be read or written
    #[error("tabular data error: {0}")]
    Csv(#[from] csv::Error),

    /// Input table could not be opened
    #[error("cannot read input {path}: {source}")]
    InputUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem or stream error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A row lacks a field the aggregation needs (strict row policy)
    #[error("row {row}: missing required field `{field}`")]
    MissingField {
        /// 1-based data row number
        row: usize,
        /// Field name
        field: String,
    },

    /// A row carries a non-numeric value where a number is needed (strict row policy)
    #[error("row {row}: field `{field}` is not a number: {value:?}")]
    InvalidNumber {
        /// 1-based data row number
        row: usize,
        /// Field name
        field: String,
        /// Raw text found in the row
        value: String,
    },

    /// A running total left the representable decimal range
    #[error("row {row}: total of `{field}` overflows")]
    AmountOverflow {
        /// 1-based data row number
        row: usize,
        /// Field being summed
        field: &'static str,
    },

    /// HTTP request to blob storage failed
    #[error("blob request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Blob storage answered with an error status
    #[error("blob storage error ({status}): {message}")]
    Transfer {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Blob location could not be built
    #[error("invalid blob URL: {0}")]
    Url(#[from] url::ParseError),

    /// Blob endpoint cannot carry a container/blob path
    #[error("invalid blob endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Result type alias for cloudopt operations
pub type Result<T> = std::result::Result<T, CloudOptError>;

/// Terminal status of a process run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Run completed with findings
    Success,
    /// Unexpected failure (output not writable, transfer failed)
    Failure,
    /// Configuration or input could not be read
    BadInput,
    /// The optimize path produced zero recommendations
    NoFindings,
}

impl ExitStatus {
    /// Process exit code for this status
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::BadInput => 2,
            ExitStatus::NoFindings => 3,
        }
    }
}

impl CloudOptError {
    /// Map the error onto the process exit status it should produce
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            CloudOptError::Config(_)
            | CloudOptError::MissingField { .. }
            | CloudOptError::InvalidNumber { .. }
            | CloudOptError::AmountOverflow { .. }
            | CloudOptError::InputUnreadable { .. }
            | CloudOptError::Url(_)
            | CloudOptError::InvalidEndpoint(_) => ExitStatus::BadInput,
            CloudOptError::Csv(e) if e.is_io_error() => ExitStatus::Failure,
            CloudOptError::Csv(_) => ExitStatus::BadInput,
            CloudOptError::Io(_) | CloudOptError::Http(_) | CloudOptError::Transfer { .. } => {
                ExitStatus::Failure
            }
        }
    }
}
