use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};

use weave_shift::io::{self, TableFormat};
use weave_shift::{pipeline, validate, EndPairing, ShiftConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Parquet,
}

impl From<Format> for TableFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => TableFormat::Csv,
            Format::Parquet => TableFormat::Parquet,
        }
    }
}

/// Convert an A/B/C shift loom log into AA/BB shift runtime and output.
#[derive(Debug, Parser)]
#[command(name = "weave-shift", version)]
struct Cli {
    /// Loom event log (.csv or .parquet)
    input: PathBuf,

    /// Output file; defaults to new_shift_data_<timestamp> in the current directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Format of the default output file
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Leading readings per shift and loom whose pick counter is zeroed
    #[arg(long, default_value_t = 5)]
    warmup_readings: usize,

    /// Let each STOP close at most one running period
    #[arg(long)]
    exclusive_pairing: bool,

    /// Also write the validated, corrected event log to this file
    #[arg(long)]
    corrected_log: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<bool> {
    let config = ShiftConfig {
        warmup_readings: cli.warmup_readings,
        end_pairing: if cli.exclusive_pairing {
            EndPairing::Exclusive
        } else {
            EndPairing::Shared
        },
        ..ShiftConfig::default()
    };

    let df = io::read_table(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    info!("loaded {} rows from {}", df.height(), cli.input.display());

    if let Some(path) = &cli.corrected_log {
        let (records, _) = pipeline::corrected_records(&df, &config)?;
        let mut corrected = validate::records_to_frame(&records)?;
        io::write_table(&mut corrected, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("corrected log written to {}", path.display());
    }

    let mut conversion = pipeline::convert(&df, &config);
    if let Some(message) = &conversion.message {
        eprintln!("{message}");
        return Ok(false);
    }
    for dropped in &conversion.dropped {
        warn!("row {} dropped: {}", dropped.row, dropped.reason);
    }
    if conversion.is_empty() {
        eprintln!("No valid data to write after processing.");
        return Ok(true);
    }

    let output = cli.output.unwrap_or_else(|| {
        let now = chrono::Local::now().naive_local();
        PathBuf::from(io::default_output_name(now, cli.format.into()))
    });
    io::write_table(&mut conversion.table, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Wrote {} shift rows to {}",
        conversion.table.height(),
        output.display()
    );
    Ok(true)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}
