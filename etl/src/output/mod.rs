//! Tabular (CSV) output for flat rows.
//!
//! The header row is written explicitly so that a match with no deliveries
//! still produces a well-formed file with the full column list.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::OutputResult;
use crate::models::{FlatRow, COLUMNS};

/// Extension used for tabular output files.
pub const OUTPUT_EXTENSION: &str = "csv";

/// Write `rows` as CSV, header first.
pub fn write_rows<W: Write>(writer: W, rows: &[FlatRow]) -> OutputResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(COLUMNS)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write `rows` to it.
pub fn write_rows_to_path(path: &Path, rows: &[FlatRow]) -> OutputResult<()> {
    let file = File::create(path)?;
    write_rows(BufWriter::new(file), rows)
}

/// Read rows back from CSV produced by [`write_rows`].
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<FlatRow>, csv::Error> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader.deserialize().collect()
}

/// Output location for an input file: same stem, `.csv`, inside `output_dir`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "output".into());
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    output_dir.join(name)
}
