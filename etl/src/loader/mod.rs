//! Bulk loader - appends tabular output files to a relational table.
//!
//! [`TableSink`] is the seam; [`SqliteSink`] is the bundled implementation.
//! Each file is loaded independently: a file that fails to parse or insert is
//! reported and the next file is still attempted. Rows are only ever
//! appended, never replaced.

use rusqlite::{params, Connection};
use std::fs::File;
use std::path::Path;

use crate::config::validate_table_name;
use crate::driver::discover_files;
use crate::error::{LoadError, LoadResult};
use crate::models::{FlatRow, COLUMNS};
use crate::output::OUTPUT_EXTENSION;
use crate::report::{LogEntry, LogLevel, Reporter};

/// Destination for a batch of flat rows.
pub trait TableSink {
    /// Append `rows`, returning how many were written.
    fn append(&mut self, rows: &[FlatRow]) -> LoadResult<usize>;
}

/// SQL type for an output column.
fn column_type(name: &str) -> &'static str {
    match name {
        "over" | "runs_batter" | "runs_extras" | "runs_total" | "legbyes" | "byes"
        | "no of balls" | "noballs" | "wides" | "iswicket_delivery" => "INTEGER",
        _ => "TEXT",
    }
}

fn quoted_columns() -> Vec<String> {
    COLUMNS.iter().map(|c| format!("\"{}\"", c)).collect()
}

/// Appends rows to a SQLite table, creating it on first use.
pub struct SqliteSink {
    conn: Connection,
    table: String,
}

impl SqliteSink {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>, table: &str) -> LoadResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        Self::with_connection(conn, table)
    }

    pub fn in_memory(table: &str) -> LoadResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, table)
    }

    fn with_connection(conn: Connection, table: &str) -> LoadResult<Self> {
        validate_table_name(table)?;

        let columns = COLUMNS
            .iter()
            .map(|c| format!("    \"{}\" {}", c, column_type(c)))
            .collect::<Vec<_>>()
            .join(",\n");
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (\n{}\n);",
            table, columns
        ))?;

        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Total rows currently in the table.
    pub fn row_count(&self) -> LoadResult<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM \"{}\"", self.table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TableSink for SqliteSink {
    fn append(&mut self, rows: &[FlatRow]) -> LoadResult<usize> {
        let placeholders = (1..=COLUMNS.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            self.table,
            quoted_columns().join(", "),
            placeholders
        );

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for r in rows {
                stmt.execute(params![
                    r.match_number,
                    r.date,
                    r.gender,
                    r.match_type,
                    r.teams,
                    r.team1,
                    r.team2,
                    r.team_batting,
                    r.team_bowling,
                    r.venue,
                    r.toss_winner,
                    r.toss_decision,
                    r.umpires,
                    r.batter,
                    r.bowler,
                    r.non_striker,
                    r.over,
                    r.runs_batter,
                    r.runs_extras,
                    r.runs_total,
                    r.legbyes,
                    r.byes,
                    r.no_of_balls as i64,
                    r.noballs,
                    r.wides,
                    r.player_out,
                    r.kind,
                    r.fielders,
                    r.winner,
                    r.player_of_match,
                    r.iswicket_delivery,
                    r.won_by,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }
}

/// Read a tabular file, checking its header against [`COLUMNS`].
pub fn read_table_file(path: &Path) -> LoadResult<Vec<FlatRow>> {
    let mut reader = csv::Reader::from_reader(File::open(path)?);

    let headers = reader.headers()?;
    if !headers.iter().eq(COLUMNS.iter().copied()) {
        return Err(LoadError::SchemaMismatch(format!(
            "expected {} columns starting with '{}', found [{}]",
            COLUMNS.len(),
            COLUMNS[0],
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let rows = reader.deserialize().collect::<Result<Vec<FlatRow>, _>>()?;
    Ok(rows)
}

/// Result of loading one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLoadOutcome {
    pub file_name: String,
    /// Rows inserted, or the error message.
    pub result: Result<usize, String>,
}

/// Outcome of [`load_directory`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub outcomes: Vec<FileLoadOutcome>,
}

impl LoadSummary {
    pub fn loaded_files(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed_files(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    pub fn rows_loaded(&self) -> usize {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok()).sum()
    }
}

/// Load one file into `sink`.
pub fn load_file<S: TableSink + ?Sized>(path: &Path, sink: &mut S) -> LoadResult<usize> {
    let rows = read_table_file(path)?;
    sink.append(&rows)
}

/// Append every `.csv` file in `dir` to `sink`, in file-name order.
///
/// Only an unreadable directory is an error; per-file failures are recorded
/// in the summary and reported as errors.
pub fn load_directory<S, R>(dir: &Path, sink: &mut S, reporter: &R) -> LoadResult<LoadSummary>
where
    S: TableSink + ?Sized,
    R: Reporter,
{
    let files = discover_files(dir, OUTPUT_EXTENSION)?;
    reporter.info(format!("🗄️  Loading {} file(s) from {}", files.len(), dir.display()));

    let mut summary = LoadSummary::default();
    for path in &files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let result = match load_file(path, sink) {
            Ok(rows) => {
                reporter.report(
                    LogEntry::new(LogLevel::Info, format!("{}: {} rows inserted", file_name, rows))
                        .with_indent(1),
                );
                Ok(rows)
            }
            Err(e) => {
                reporter.report(
                    LogEntry::new(
                        LogLevel::Error,
                        format!("Error inserting data from {}: {}", file_name, e),
                    )
                    .with_indent(1),
                );
                Err(e.to_string())
            }
        };
        summary.outcomes.push(FileLoadOutcome { file_name, result });
    }

    if summary.failed_files() > 0 {
        reporter.warning(format!(
            "{} file(s) loaded, {} failed",
            summary.loaded_files(),
            summary.failed_files()
        ));
    } else {
        reporter.success(format!(
            "{} file(s) loaded, {} rows",
            summary.loaded_files(),
            summary.rows_loaded()
        ));
    }

    Ok(summary)
}
