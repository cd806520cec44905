//! # ipl-etl - Cricsheet match records to per-delivery tables
//!
//! Flattens ball-by-ball match JSON (innings → overs → deliveries) into one
//! CSV row per delivery, keeps a processing log so directory runs are
//! idempotent, and appends the CSV output to a relational table.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Match JSON  │────▶│   Parser    │────▶│   Flatten   │────▶│  CSV rows   │────▶│   Loader    │
//! │ (per match) │     │ (decode)    │     │ (per ball)  │     │ + status log│     │  (SQLite)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ipl_etl::{flatten, parse_match_str, FlattenOptions};
//!
//! let record = parse_match_str(r#"{
//!     "info": { "teams": ["Gujarat Titans", "Rajasthan Royals"], "dates": ["2022-05-29"] },
//!     "innings": [{ "team": "Rajasthan Royals", "overs": [{ "over": 0, "deliveries": [
//!         { "batter": "YBK Jaiswal", "bowler": "Mohammed Shami", "runs": { "batter": 0, "extras": 0, "total": 0 } }
//!     ] }] }]
//! }"#).unwrap();
//!
//! let rows = flatten(&record, &FlattenOptions::default()).unwrap();
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].team_bowling, "Gujarat Titans");
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Match record input types and the flat output row
//! - [`parser`] - Match JSON decoding
//! - [`transform`] - The flattening transform
//! - [`output`] - CSV writing and reading of flat rows
//! - [`status`] - Processing log for idempotent runs
//! - [`driver`] - Batch directory conversion
//! - [`loader`] - Bulk load into a table
//! - [`report`] - Status lines and the [`Reporter`] trait
//! - [`config`] - Run configuration

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Decoding and transformation
pub mod parser;
pub mod transform;

// Output and state
pub mod output;
pub mod status;

// Orchestration
pub mod driver;
pub mod loader;

// Reporting
pub mod report;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ConvertError, DriverError, LoadError, LogError, OutputError, RecordError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Delivery, FlatRow, Innings, MatchInfo, MatchRecord, Over, Wicket, COLUMNS};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{parse_match_bytes, parse_match_file, parse_match_str, parse_match_value};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    bowling_team, classify_won_by, flatten, wicket_columns, FlattenOptions, WicketColumns,
    WicketPolicy,
};

// =============================================================================
// Re-exports - Output / Status
// =============================================================================

pub use output::{output_path_for, read_rows, write_rows, write_rows_to_path};
pub use status::{ProcessingLog, ProcessingLogEntry};

// =============================================================================
// Re-exports - Driver / Loader
// =============================================================================

pub use config::{DriverConfig, LoadConfig};
pub use driver::{convert_file, discover_files, BatchDriver, FileFailure, RunSummary};
pub use loader::{load_directory, load_file, LoadSummary, SqliteSink, TableSink};

// =============================================================================
// Re-exports - Reporting
// =============================================================================

pub use report::{LogEntry, LogLevel, MemoryReporter, Reporter, StderrReporter};
