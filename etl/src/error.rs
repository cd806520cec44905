//! Error types for the match-record ETL.
//!
//! The hierarchy mirrors the stages of a run:
//!
//! - [`RecordError`] - a single match record could not be decoded or flattened
//! - [`OutputError`] - writing a tabular output file failed
//! - [`ConvertError`] - either of the above, for one file
//! - [`LogError`] - the processing log could not be read or appended
//! - [`ConfigError`] - missing or invalid configuration
//! - [`DriverError`] - failures that abort a whole batch run
//! - [`LoadError`] - bulk-load failures, reported per source file
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Record Errors
// =============================================================================

/// Errors that reject one match record as a whole.
///
/// Field-level gaps are never errors; they degrade to empty values.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The source could not be read.
    #[error("Failed to read match file: {0}")]
    IoError(#[from] std::io::Error),

    /// The source is not a valid match record.
    #[error("Invalid JSON format: {0}")]
    DecodeError(String),

    /// The source decoded to an empty structure.
    #[error("JSON data is empty")]
    EmptyRecord,

    /// The batting team cannot be resolved against the two-team list.
    #[error("Cannot resolve bowling team for '{batting}' against teams {teams:?}")]
    InvalidTeams { batting: String, teams: Vec<String> },

    /// `info.dates` is absent or empty.
    #[error("Match has no dates")]
    MissingDate,
}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        RecordError::DecodeError(err.to_string())
    }
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while writing flat rows to a CSV file.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The output file could not be created or written.
    #[error("Failed to write output: {0}")]
    IoError(#[from] std::io::Error),

    /// A row could not be serialized.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

// =============================================================================
// Conversion Errors
// =============================================================================

/// Converting one match file into one CSV file failed.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The match record was rejected.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// The rows could not be written.
    #[error(transparent)]
    Output(#[from] OutputError),
}

// =============================================================================
// Processing Log Errors
// =============================================================================

/// Errors from the processing log.
#[derive(Debug, Error)]
pub enum LogError {
    /// The log could not be opened or appended.
    #[error("Processing log IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The log is not readable as CSV.
    #[error("Processing log CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// A row that cannot be read back as an entry.
    #[error("Malformed processing log row at line {0}")]
    MalformedRow(u64),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Invalid or missing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is empty.
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    /// The input directory does not exist.
    #[error("Input directory does not exist: {0}")]
    InputDirMissing(PathBuf),

    /// The output path exists but is a file.
    #[error("Output path is not a directory: {0}")]
    OutputNotDir(PathBuf),

    /// A setting has an unusable value.
    #[error("Invalid value for '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}

// =============================================================================
// Driver Errors (top-level)
// =============================================================================

/// Failures that abort a batch run.
///
/// Per-file problems are not represented here; they are reported and
/// collected in [`crate::driver::RunSummary`].
#[derive(Debug, Error)]
pub enum DriverError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The input directory could not be listed.
    #[error("Cannot list input directory {path}: {source}")]
    InputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Processing log error.
    #[error("Log error: {0}")]
    Log(#[from] LogError),

    /// The output directory could not be created.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while appending a tabular file to the target table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// A row could not be parsed.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// The database rejected a statement.
    #[error("Database error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// The file header does not match the output schema.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for record decoding and flattening.
pub type RecordResult<T> = Result<T, RecordError>;

/// Result type for output writing.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for single-file conversion.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Result type for processing log operations.
pub type LogResult<T> = Result<T, LogError>;

/// Result type for batch runs.
pub type DriverResult<T> = Result<T, DriverError>;

/// Result type for bulk loading.
pub type LoadResult<T> = Result<T, LoadError>;
