//! ipl-etl CLI - Flatten Cricsheet match JSON into per-delivery CSV
//!
//! # Commands
//!
//! ```bash
//! ipl-etl convert 1359475.json                  # One match file to one CSV
//! ipl-etl batch --input-dir json_files \
//!               --output-dir processed_files \
//!               --log status.csv                # Convert every new file in a directory
//! ipl-etl load --dir processed_files --database ipl.db
//! ipl-etl columns                               # Print the output schema
//! ```
//!
//! Directory, log and database paths can also come from the environment
//! (`IPL_ETL_*`), including a `.env` file in the working directory.

use clap::{Parser, Subcommand};
use ipl_etl::config::{DEFAULT_EXTENSION, DEFAULT_TABLE};
use ipl_etl::report::{Reporter, StderrReporter};
use ipl_etl::{
    convert_file, load_directory, output_path_for, BatchDriver, DriverConfig, FlattenOptions,
    LoadConfig, SqliteSink, WicketPolicy, COLUMNS,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

#[derive(Parser)]
#[command(name = "ipl-etl")]
#[command(about = "Flatten cricket match records into per-delivery CSV rows", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single match file to CSV
    Convert {
        /// Input match JSON file
        input: PathBuf,

        /// Output CSV file (default: input path with .csv extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How several wickets on one ball fill the wicket columns: last | joined
        #[arg(long, default_value = "last")]
        wickets: WicketPolicy,
    },

    /// Convert every not-yet-processed match file in a directory
    Batch {
        /// Directory containing match files
        #[arg(long, env = "IPL_ETL_INPUT_DIR")]
        input_dir: PathBuf,

        /// Directory for the CSV output
        #[arg(long, env = "IPL_ETL_OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Processing log (File Name,Time)
        #[arg(long, env = "IPL_ETL_LOG")]
        log: PathBuf,

        /// Extension of match files
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,

        /// How several wickets on one ball fill the wicket columns: last | joined
        #[arg(long, default_value = "last")]
        wickets: WicketPolicy,
    },

    /// Append CSV output files to a SQLite table
    Load {
        /// Directory containing CSV output files
        #[arg(long, env = "IPL_ETL_OUTPUT_DIR")]
        dir: PathBuf,

        /// SQLite database file
        #[arg(long, env = "IPL_ETL_DATABASE")]
        database: PathBuf,

        /// Target table
        #[arg(long, env = "IPL_ETL_TABLE", default_value = DEFAULT_TABLE)]
        table: String,
    },

    /// Print the output columns
    Columns,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            wickets,
        } => cmd_convert(&input, output.as_deref(), wickets),

        Commands::Batch {
            input_dir,
            output_dir,
            log,
            extension,
            wickets,
        } => {
            let config = DriverConfig::new(input_dir, output_dir, log)
                .with_extension(extension)
                .with_wicket_policy(wickets);
            cmd_batch(config).await
        }

        Commands::Load {
            dir,
            database,
            table,
        } => cmd_load(LoadConfig::new(dir, database).with_table(table)),

        Commands::Columns => cmd_columns(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    wickets: WicketPolicy,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| output_path_for(input, input.parent().unwrap_or(Path::new(""))));

    let reporter = StderrReporter;
    reporter.info(format!("📄 Converting: {}", input.display()));
    let options = FlattenOptions { wicket_policy: wickets };
    let rows = convert_file(input, &output, &options)?;
    reporter.success(format!(
        "Conversion successful. CSV file '{}' created ({} rows).",
        output.display(),
        rows
    ));
    Ok(())
}

async fn cmd_batch(config: DriverConfig) -> Result<(), Box<dyn std::error::Error>> {
    let driver = BatchDriver::new(config);
    let cancel = driver.cancel_flag();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            StderrReporter.warning("Ctrl-C received, finishing the current file...");
            cancel.store(true, Ordering::Relaxed);
        }
    });

    let summary = tokio::task::spawn_blocking(move || driver.run()).await??;

    eprintln!(
        "\n📊 Results: {} converted, {} skipped, {} failed, {} rows",
        summary.converted.len(),
        summary.skipped.len(),
        summary.failed.len(),
        summary.rows_written
    );

    if summary.cancelled {
        return Err("run cancelled".into());
    }
    Ok(())
}

fn cmd_load(config: LoadConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let reporter = StderrReporter;
    let mut sink = SqliteSink::open(&config.database, &config.table)?;
    reporter.success(format!(
        "Connected to {} (table '{}')",
        config.database.display(),
        sink.table()
    ));

    let summary = load_directory(&config.dir, &mut sink, &reporter)?;
    eprintln!(
        "\n📊 Results: {} loaded, {} failed, {} rows",
        summary.loaded_files(),
        summary.failed_files(),
        summary.rows_loaded()
    );
    Ok(())
}

fn cmd_columns() -> Result<(), Box<dyn std::error::Error>> {
    for column in COLUMNS {
        println!("{}", column);
    }
    Ok(())
}
