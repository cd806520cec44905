//! Run configuration.
//!
//! Paths always come from the caller (CLI flags or environment); nothing here
//! has a built-in location.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::transform::WicketPolicy;

/// Default extension of match-record files.
pub const DEFAULT_EXTENSION: &str = "json";

/// Default target table for bulk loads.
pub const DEFAULT_TABLE: &str = "ipl_match_2007_2023_table";

/// Settings for a batch conversion run.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub log_path: PathBuf,
    /// Only files with exactly this extension are considered.
    pub extension: String,
    pub wicket_policy: WicketPolicy,
}

impl DriverConfig {
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        log_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            log_path: log_path.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            wicket_policy: WicketPolicy::default(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_wicket_policy(mut self, policy: WicketPolicy) -> Self {
        self.wicket_policy = policy;
        self
    }

    /// Check the settings before any file is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_dir.as_os_str().is_empty() {
            return Err(ConfigError::Missing("input directory"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Missing("output directory"));
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing("log path"));
        }
        let ext = self.extension.trim_start_matches('.');
        if ext.is_empty() {
            return Err(ConfigError::Invalid {
                field: "extension",
                message: "must not be empty".into(),
            });
        }
        if !self.input_dir.is_dir() {
            return Err(ConfigError::InputDirMissing(self.input_dir.clone()));
        }
        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(ConfigError::OutputNotDir(self.output_dir.clone()));
        }
        Ok(())
    }

    /// Extension without a leading dot.
    pub fn normalized_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

/// Settings for a bulk load.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Directory of tabular files.
    pub dir: PathBuf,
    /// SQLite database file.
    pub database: PathBuf,
    pub table: String,
}

impl LoadConfig {
    pub fn new(dir: impl Into<PathBuf>, database: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            database: database.into(),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_table_name(&self.table)?;
        if !self.dir.is_dir() {
            return Err(ConfigError::InputDirMissing(self.dir.clone()));
        }
        Ok(())
    }
}

/// Table names are interpolated into SQL, so only `[A-Za-z0-9_]` is allowed.
pub fn validate_table_name(table: &str) -> Result<(), ConfigError> {
    let valid = !table.is_empty()
        && !table.starts_with(|c: char| c.is_ascii_digit())
        && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: "table",
            message: format!("'{}' must be letters, digits and underscores", table),
        })
    }
}
