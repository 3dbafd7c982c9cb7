//! Bulkops CLI - validate bulk CSV batches
//!
//! # Commands
//!
//! ```bash
//! bulkops validate input.csv --kind person    # Validate and output records
//! bulkops process input.csv --kind wage       # Full pipeline with progress logs
//! bulkops sample --kind person                # Emit a sample CSV
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bulkops::{
    process_batch, read_batch_file, validate_batch_with, ColumnBinding, ImportOptions, Schema,
    ValidateOptions,
};

#[derive(Parser)]
#[command(name = "bulkops")]
#[command(about = "Validate bulk CSV batches for facility account management", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Which import schema to apply.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum BatchKind {
    /// Person batch (inmate accounts)
    Person,
    /// Wage batch
    Wage,
}

impl BatchKind {
    fn schema(self) -> Schema {
        match self {
            BatchKind::Person => Schema::person_batch(),
            BatchKind::Wage => Schema::wage_batch(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a CSV file and output parsed records as JSON
    Validate {
        /// Input CSV file
        input: PathBuf,

        /// Import schema to validate against
        #[arg(short, long, value_enum)]
        kind: BatchKind,

        /// Field delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Bind columns by header name instead of schema position
        #[arg(long)]
        by_header: bool,

        /// Output file for parsed records (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the full import pipeline with progress logs
    Process {
        /// Input CSV file
        input: PathBuf,

        /// Import schema to validate against
        #[arg(short, long, value_enum)]
        kind: BatchKind,

        /// Field delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Simulated upload latency in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Output file for the full report (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Emit a sample CSV for an import schema
    Sample {
        /// Import schema to sample
        #[arg(short, long, value_enum)]
        kind: BatchKind,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            input,
            kind,
            delimiter,
            by_header,
            output,
        } => cmd_validate(&input, kind, delimiter, by_header, output.as_deref()),

        Commands::Process {
            input,
            kind,
            delimiter,
            delay_ms,
            output,
        } => cmd_process(&input, kind, delimiter, delay_ms, output.as_deref()).await,

        Commands::Sample { kind, output } => cmd_sample(kind, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn validate_options(delimiter: char, by_header: bool) -> ValidateOptions {
    ValidateOptions {
        field_delimiter: delimiter,
        binding: if by_header {
            ColumnBinding::ByHeader
        } else {
            ColumnBinding::Positional
        },
        ..ValidateOptions::default()
    }
}

fn cmd_validate(
    input: &Path,
    kind: BatchKind,
    delimiter: char,
    by_header: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Validating: {}", input.display());

    let schema = kind.schema();
    let raw = read_batch_file(input)?;
    let result = validate_batch_with(&raw, &schema, &validate_options(delimiter, by_header));

    if !result.is_valid {
        eprintln!("\n❌ {} validation error(s):", result.errors.len());
        for line in result.error_lines() {
            eprintln!("   - {}", line);
        }
        std::process::exit(1);
    }

    eprintln!(
        "✅ {} valid {} parsed",
        result.parsed_data.len(),
        schema.record_noun()
    );
    let json = serde_json::to_string_pretty(&result.parsed_data)?;
    write_output(&json, output)?;

    Ok(())
}

async fn cmd_process(
    input: &Path,
    kind: BatchKind,
    delimiter: char,
    delay_ms: Option<u64>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let schema = kind.schema();
    let raw = read_batch_file(input)?;
    let options = ImportOptions {
        validate: validate_options(delimiter, false),
        processing_delay: delay_ms.map(Duration::from_millis),
    };

    let report = process_batch(&raw, &schema, &options).await;

    let json = serde_json::to_string_pretty(&report)?;
    write_output(&json, output)?;

    if report.status != "ready" {
        std::process::exit(1);
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_sample(kind: BatchKind, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let sample = kind.schema().sample_csv();
    write_output(&sample, output)?;
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
