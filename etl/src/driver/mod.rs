//! Batch conversion driver.
//!
//! Converts every not-yet-processed match file in a directory, one file at a
//! time:
//!
//! ```text
//! input_dir/*.json ──▶ skip if in log ──▶ decode ──▶ flatten ──▶ output_dir/<stem>.csv ──▶ append log
//! ```
//!
//! The log is appended only after the output file is fully written, so a
//! crash between the two leaves the file eligible for a retry that simply
//! overwrites its output. Failed files are reported and never logged.
//!
//! # Example
//!
//! ```rust,no_run
//! use ipl_etl::{BatchDriver, DriverConfig};
//!
//! let config = DriverConfig::new("json_files", "processed_files", "status.csv");
//! let summary = BatchDriver::new(config).run().unwrap();
//! println!("converted {} files", summary.converted.len());
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::DriverConfig;
use crate::error::{ConvertResult, DriverError, DriverResult};
use crate::output::{output_path_for, write_rows_to_path};
use crate::parser::parse_match_file;
use crate::report::{LogEntry, LogLevel, Reporter, StderrReporter};
use crate::status::ProcessingLog;
use crate::transform::{flatten, FlattenOptions};

/// A file that was attempted but not converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub file_name: String,
    pub reason: String,
}

/// Outcome of one [`BatchDriver::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Newly converted and logged files, in processing order.
    pub converted: Vec<String>,
    /// Files skipped because the log already lists them.
    pub skipped: Vec<String>,
    /// Files that failed; they stay eligible for the next run.
    pub failed: Vec<FileFailure>,
    /// Delivery rows written across all converted files.
    pub rows_written: usize,
    /// The run stopped early on request.
    pub cancelled: bool,
}

/// Convert a single match file into a CSV file.
///
/// Returns the number of delivery rows written. The output file is created or
/// truncated; it is only touched once the record has been flattened.
pub fn convert_file(input: &Path, output: &Path, options: &FlattenOptions) -> ConvertResult<usize> {
    let record = parse_match_file(input)?;
    let rows = flatten(&record, options)?;
    write_rows_to_path(output, &rows)?;
    Ok(rows.len())
}

/// List files in `dir` whose extension is exactly `extension`, sorted by name.
pub fn discover_files(dir: &Path, extension: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == extension) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Sequential, idempotent directory converter.
pub struct BatchDriver {
    config: DriverConfig,
    cancel: Arc<AtomicBool>,
    reporter: Arc<dyn Reporter>,
}

impl BatchDriver {
    /// Driver reporting to stderr.
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            cancel: Arc::new(AtomicBool::new(false)),
            reporter: Arc::new(StderrReporter),
        }
    }

    /// Send status lines to `reporter` instead of stderr.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Share an external stop flag (set from a signal handler, for example).
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Setting this flag stops the run before the next file.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Convert every new file in the input directory.
    ///
    /// Per-file problems land in [`RunSummary::failed`]; only configuration,
    /// directory and log failures abort the run.
    pub fn run(&self) -> DriverResult<RunSummary> {
        self.config.validate()?;

        let mut log = ProcessingLog::open(&self.config.log_path)?;
        for line in log.ignored_lines() {
            self.reporter.warning(format!(
                "Ignoring row without a file name at line {} of {}",
                line,
                log.path().display()
            ));
        }
        fs::create_dir_all(&self.config.output_dir)?;

        let files = discover_files(&self.config.input_dir, self.config.normalized_extension())
            .map_err(|source| DriverError::InputDir {
                path: self.config.input_dir.clone(),
                source,
            })?;

        self.reporter.info(format!(
            "📂 {} .{} file(s) in {}, {} already processed",
            files.len(),
            self.config.normalized_extension(),
            self.config.input_dir.display(),
            log.len()
        ));

        let options = FlattenOptions { wicket_policy: self.config.wicket_policy };
        let mut summary = RunSummary::default();

        for path in &files {
            if self.cancel.load(Ordering::Relaxed) {
                self.reporter
                    .warning("Cancellation requested, stopping before the next file");
                summary.cancelled = true;
                break;
            }

            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if log.contains(&file_name) {
                self.reporter.report(
                    LogEntry::new(
                        LogLevel::Warning,
                        format!("Skipping {} (already processed)", file_name),
                    )
                    .with_indent(1),
                );
                summary.skipped.push(file_name);
                continue;
            }

            let output = output_path_for(path, &self.config.output_dir);
            match convert_file(path, &output, &options) {
                Ok(rows) => {
                    log.record(&file_name)?;
                    self.reporter.report(
                        LogEntry::new(
                            LogLevel::Info,
                            format!("{} → {} ({} rows)", file_name, output.display(), rows),
                        )
                        .with_indent(1),
                    );
                    summary.rows_written += rows;
                    summary.converted.push(file_name);
                }
                Err(e) => {
                    self.reporter.report(
                        LogEntry::new(LogLevel::Error, format!("{}: {}", file_name, e))
                            .with_indent(1),
                    );
                    summary.failed.push(FileFailure {
                        file_name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if summary.cancelled {
            self.reporter.warning(format!(
                "Run cancelled after {} new file(s)",
                summary.converted.len()
            ));
        } else {
            self.reporter.success(format!(
                "All new {} files converted: {} converted, {} skipped, {} failed",
                self.config.normalized_extension(),
                summary.converted.len(),
                summary.skipped.len(),
                summary.failed.len()
            ));
        }
        self.reporter
            .info(format!("Processing log '{}' updated", log.path().display()));

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::read_rows;
    use crate::report::MemoryReporter;
    use crate::status::read_entries;
    use crate::transform::WicketPolicy;
    use serde_json::{json, Value};
    use tempfile::{tempdir, TempDir};

    fn match_json(teams: Value, deliveries: usize) -> Value {
        let deliveries: Vec<Value> = (0..deliveries)
            .map(|i| {
                json!({
                    "batter": format!("Batter {i}"),
                    "bowler": "Bowler",
                    "non_striker": "Partner",
                    "runs": { "batter": 1, "extras": 0, "total": 1 }
                })
            })
            .collect();
        json!({
            "info": {
                "teams": teams,
                "dates": ["2022-05-29"],
                "outcome": { "winner": "Gujarat Titans", "by": { "wickets": 7 } }
            },
            "innings": [{ "team": "Rajasthan Royals", "overs": [{ "over": 0, "deliveries": deliveries }] }]
        })
    }

    fn good_match(deliveries: usize) -> Value {
        match_json(json!(["Rajasthan Royals", "Gujarat Titans"]), deliveries)
    }

    struct Workspace {
        _root: TempDir,
        input: PathBuf,
        output: PathBuf,
        log: PathBuf,
    }

    impl Workspace {
        fn new() -> Self {
            let root = tempdir().unwrap();
            let input = root.path().join("json_files");
            fs::create_dir_all(&input).unwrap();
            Self {
                output: root.path().join("processed_files"),
                log: root.path().join("status.csv"),
                input,
                _root: root,
            }
        }

        fn put(&self, name: &str, content: &str) {
            fs::write(self.input.join(name), content).unwrap();
        }

        fn put_json(&self, name: &str, value: &Value) {
            self.put(name, &value.to_string());
        }

        fn driver(&self) -> BatchDriver {
            BatchDriver::new(DriverConfig::new(&self.input, &self.output, &self.log))
        }

        fn observed_driver(&self) -> (BatchDriver, Arc<MemoryReporter>) {
            let reporter = Arc::new(MemoryReporter::new());
            let driver = self.driver().with_reporter(reporter.clone());
            (driver, reporter)
        }
    }

    #[test]
    fn test_converts_and_logs_new_files() {
        let ws = Workspace::new();
        ws.put_json("1.json", &good_match(3));
        ws.put_json("2.json", &good_match(2));
        ws.put("notes.txt", "not a match");

        let summary = ws.driver().run().unwrap();
        assert_eq!(summary.converted, vec!["1.json", "2.json"]);
        assert_eq!(summary.rows_written, 5);
        assert!(summary.failed.is_empty());

        let rows = read_rows(fs::File::open(ws.output.join("1.csv")).unwrap()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].team_bowling, "Gujarat Titans");
        assert!(!ws.output.join("notes.csv").exists());

        let entries = read_entries(&ws.log).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, vec!["1.json", "2.json"]);
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let ws = Workspace::new();
        ws.put_json("1.json", &good_match(1));
        ws.put_json("2.json", &good_match(1));

        ws.driver().run().unwrap();
        let before = read_entries(&ws.log).unwrap().len();

        let second = ws.driver().run().unwrap();
        assert!(second.converted.is_empty());
        assert_eq!(second.skipped, vec!["1.json", "2.json"]);
        assert_eq!(read_entries(&ws.log).unwrap().len(), before);
    }

    #[test]
    fn test_bad_files_are_reported_not_logged() {
        let ws = Workspace::new();
        ws.put("a_broken.json", "{\"info\": ");
        ws.put("b_empty.json", "{}");
        ws.put_json("c_three_teams.json", &match_json(json!(["A", "B", "Rajasthan Royals"]), 1));
        let mut no_date = good_match(1);
        no_date["info"]["dates"] = json!([]);
        ws.put_json("d_no_date.json", &no_date);
        ws.put_json("e_good.json", &good_match(1));

        let (driver, reporter) = ws.observed_driver();
        let summary = driver.run().unwrap();
        assert_eq!(summary.converted, vec!["e_good.json"]);
        let failed: Vec<_> = summary.failed.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(
            failed,
            vec!["a_broken.json", "b_empty.json", "c_three_teams.json", "d_no_date.json"]
        );
        assert!(summary.failed[1].reason.contains("empty"));

        for name in &failed {
            let problems = reporter.problems_mentioning(name);
            assert_eq!(problems.len(), 1, "{name}: {problems:?}");
            assert_eq!(problems[0].level, LogLevel::Error);
        }
        assert!(reporter.problems_mentioning("e_good.json").is_empty());

        let log = ProcessingLog::open(&ws.log).unwrap();
        assert_eq!(log.len(), 1);
        assert!(!log.contains("a_broken.json"));

        // Failed files are retried on the next run.
        let (driver, reporter) = ws.observed_driver();
        let retry = driver.run().unwrap();
        assert_eq!(retry.failed.len(), 4);
        assert_eq!(retry.skipped, vec!["e_good.json"]);

        let skipped = reporter.problems_mentioning("e_good.json");
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].level, LogLevel::Warning);
        assert!(skipped[0].message.contains("already processed"));
    }

    #[test]
    fn test_blank_log_row_is_ignored() {
        let ws = Workspace::new();
        fs::write(&ws.log, "File Name,Time\n,2023-06-01 09:15:00\n").unwrap();
        ws.put_json("1.json", &good_match(2));

        let (driver, reporter) = ws.observed_driver();
        let summary = driver.run().unwrap();
        assert_eq!(summary.converted, vec!["1.json"]);

        let warnings = reporter.problems_mentioning("line 2");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, LogLevel::Warning);

        let second = ws.driver().run().unwrap();
        assert_eq!(second.skipped, vec!["1.json"]);
    }

    #[test]
    fn test_logged_name_matches_verbatim() {
        let ws = Workspace::new();
        fs::write(&ws.log, "File Name,Time\n 1.json,2023-06-01 09:15:00\n").unwrap();
        ws.put_json("1.json", &good_match(1));

        let summary = ws.driver().run().unwrap();
        assert_eq!(summary.converted, vec!["1.json"]);

        let again = ws.driver().run().unwrap();
        assert_eq!(again.skipped, vec!["1.json"]);
        assert_eq!(read_entries(&ws.log).unwrap().len(), 2);
    }

    #[test]
    fn test_zero_delivery_match_writes_header_only() {
        let ws = Workspace::new();
        ws.put_json("0.json", &good_match(0));

        let summary = ws.driver().run().unwrap();
        assert_eq!(summary.converted, vec!["0.json"]);
        let content = fs::read_to_string(ws.output.join("0.csv")).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("match_number,date,"));
    }

    #[test]
    fn test_extension_filter_is_exact() {
        let ws = Workspace::new();
        ws.put_json("1.json", &good_match(1));
        ws.put_json("2.JSON", &good_match(1));
        ws.put_json("3.json.bak", &good_match(1));

        let summary = ws.driver().run().unwrap();
        assert_eq!(summary.converted, vec!["1.json"]);
    }

    #[test]
    fn test_cancelled_before_first_file() {
        let ws = Workspace::new();
        ws.put_json("1.json", &good_match(1));

        let driver = ws.driver();
        driver.cancel_flag().store(true, Ordering::Relaxed);
        let summary = driver.run().unwrap();

        assert!(summary.cancelled);
        assert!(summary.converted.is_empty());
        assert!(!ws.log.exists());
    }

    /// Raises the stop flag once the named file has been converted.
    struct StopAfter {
        file_name: &'static str,
        flag: Arc<AtomicBool>,
    }

    impl Reporter for StopAfter {
        fn report(&self, entry: LogEntry) {
            if entry.message.starts_with(&format!("{} → ", self.file_name)) {
                self.flag.store(true, Ordering::Relaxed);
            }
        }
    }

    #[test]
    fn test_cancelled_between_files() {
        let ws = Workspace::new();
        ws.put_json("1.json", &good_match(3));
        ws.put_json("2.json", &good_match(1));
        ws.put_json("3.json", &good_match(1));

        let driver = ws.driver();
        let stop = StopAfter {
            file_name: "1.json",
            flag: driver.cancel_flag(),
        };
        let summary = driver.with_reporter(Arc::new(stop)).run().unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.converted, vec!["1.json"]);
        assert!(summary.skipped.is_empty());
        assert!(summary.failed.is_empty());
        assert_eq!(summary.rows_written, 3);

        let entries = read_entries(&ws.log).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name, "1.json");
        assert!(!ws.output.join("2.csv").exists());

        // The next run picks up where the cancelled one stopped.
        let resumed = ws.driver().run().unwrap();
        assert_eq!(resumed.converted, vec!["2.json", "3.json"]);
        assert_eq!(resumed.skipped, vec!["1.json"]);
    }

    #[test]
    fn test_wicket_policy_reaches_rows() {
        let ws = Workspace::new();
        let mut value = good_match(1);
        value["innings"][0]["overs"][0]["deliveries"][0]["wickets"] = json!([
            { "player_out": "Batter 0", "kind": "run out" },
            { "player_out": "Partner", "kind": "run out" }
        ]);
        ws.put_json("w.json", &value);

        let config = DriverConfig::new(&ws.input, &ws.output, &ws.log)
            .with_wicket_policy(WicketPolicy::Joined);
        BatchDriver::new(config).run().unwrap();

        let rows = read_rows(fs::File::open(ws.output.join("w.csv")).unwrap()).unwrap();
        assert_eq!(rows[0].player_out, "Batter 0; Partner");
        assert_eq!(rows[0].iswicket_delivery, 1);
    }

    #[test]
    fn test_missing_input_dir_aborts() {
        let ws = Workspace::new();
        let config = DriverConfig::new(ws.input.join("nope"), &ws.output, &ws.log);
        let err = BatchDriver::new(config).run().unwrap_err();
        assert!(matches!(err, DriverError::Config(_)));
    }

    #[test]
    fn test_convert_file_direct() {
        let ws = Workspace::new();
        ws.put_json("m.json", &good_match(4));
        fs::create_dir_all(&ws.output).unwrap();
        let out = ws.output.join("m.csv");

        let rows = convert_file(&ws.input.join("m.json"), &out, &FlattenOptions::default()).unwrap();
        assert_eq!(rows, 4);
        assert!(out.exists());
    }
}
