//! Processing log - remembers which source files were already converted.
//!
//! The log is a two-column CSV (`File Name,Time`). It is read once when a run
//! starts and only ever appended to. A file name being present is the whole
//! idempotence rule; a changed file with a logged name is not picked up again.

use chrono::{Local, NaiveDateTime, Timelike};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{LogError, LogResult};

/// Header row of the processing log.
pub const LOG_HEADER: [&str; 2] = ["File Name", "Time"];

/// Timestamp layout used in the `Time` column.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingLogEntry {
    pub file_name: String,
    pub processed_at: NaiveDateTime,
}

impl ProcessingLogEntry {
    /// Entry stamped with the current local time (second precision).
    pub fn now(file_name: impl Into<String>) -> Self {
        let now = Local::now().naive_local();
        Self {
            file_name: file_name.into(),
            processed_at: now.with_nanosecond(0).unwrap_or(now),
        }
    }

    fn time_string(&self) -> String {
        self.processed_at.format(TIME_FORMAT).to_string()
    }
}

/// In-memory view of the processing log plus its append handle.
#[derive(Debug)]
pub struct ProcessingLog {
    path: PathBuf,
    processed: HashSet<String>,
    /// Line numbers of rows with an empty first column.
    ignored_lines: Vec<u64>,
    /// Whether the header still has to be written before the first append.
    needs_header: bool,
}

impl ProcessingLog {
    /// Load the log at `path`. A missing file starts an empty log.
    ///
    /// An existing but empty file is treated like a missing one so its first
    /// data row is not mistaken for the header on the next load.
    pub fn open(path: impl AsRef<Path>) -> LogResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut log = Self {
            path,
            processed: HashSet::new(),
            ignored_lines: Vec::new(),
            needs_header: true,
        };

        match fs::metadata(&log.path) {
            Ok(meta) if meta.len() > 0 => {
                log.needs_header = false;
                log.load()?;
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        Ok(log)
    }

    fn load(&mut self) -> LogResult<()> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            match record.get(0) {
                Some(name) if !name.is_empty() => {
                    self.processed.insert(name.to_string());
                }
                _ => self.ignored_lines.push(line),
            }
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows skipped on load because they carry no file name.
    pub fn ignored_lines(&self) -> &[u64] {
        &self.ignored_lines
    }

    /// Has `file_name` already been converted? Names compare exactly as
    /// written in the log.
    pub fn contains(&self, file_name: &str) -> bool {
        self.processed.contains(file_name)
    }

    /// Number of distinct processed file names.
    pub fn len(&self) -> usize {
        self.processed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }

    /// Append `file_name` with the current time.
    pub fn record(&mut self, file_name: &str) -> LogResult<()> {
        self.append(&ProcessingLogEntry::now(file_name))
    }

    /// Append an entry. The file is opened in append mode for every call so a
    /// crash never loses earlier rows.
    pub fn append(&mut self, entry: &ProcessingLogEntry) -> LogResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);

        if self.needs_header {
            writer.write_record(LOG_HEADER)?;
            self.needs_header = false;
        }
        writer.write_record([entry.file_name.as_str(), entry.time_string().as_str()])?;
        writer.flush()?;

        self.processed.insert(entry.file_name.clone());
        Ok(())
    }
}

/// Read every entry of a log file, header excluded.
pub fn read_entries(path: impl AsRef<Path>) -> LogResult<Vec<ProcessingLogEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path.as_ref())?;

    let mut entries = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let (Some(name), Some(time)) = (record.get(0), record.get(1)) else {
            return Err(LogError::MalformedRow(line));
        };
        let processed_at = NaiveDateTime::parse_from_str(time, TIME_FORMAT)
            .map_err(|_| LogError::MalformedRow(line))?;
        entries.push(ProcessingLogEntry {
            file_name: name.to_string(),
            processed_at,
        });
    }
    Ok(entries)
}
