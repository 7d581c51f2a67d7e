use anyhow::{Context, Result, bail};
use batchpile::{Accumulator, AccumulatorConfig};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Group newline-delimited items into fixed-size batches
#[derive(Parser, Debug)]
#[command(name = "batchpile", version)]
struct Cli {
    /// Input file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Items per batch
    #[arg(short, long, conflicts_with = "config")]
    capacity: Option<usize>,

    /// JSON file holding an accumulator config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extract once this many items are held (default: only at end of input)
    #[arg(long)]
    flush_at: Option<usize>,
}

#[derive(Serialize)]
struct FlushRecord {
    flush: usize,
    batches: Vec<Vec<String>>,
}

fn load_config(cli: &Cli) -> Result<AccumulatorConfig> {
    if let Some(path) = &cli.config {
        let raw = fs::read_to_string(path)
            .context(format!("Failed to read config at {}", path.display()))?;
        return serde_json::from_str(&raw)
            .context(format!("Invalid config in {}", path.display()));
    }

    Ok(cli
        .capacity
        .map(AccumulatorConfig::new)
        .unwrap_or_default())
}

fn emit(out: &mut impl Write, flush: usize, batches: Vec<Vec<String>>) -> Result<()> {
    let record = FlushRecord { flush, batches };
    serde_json::to_writer(&mut *out, &record).context("Failed to encode batches")?;
    writeln!(out)?;
    Ok(())
}

/// Feed every input line through the accumulator, writing one record per flush.
///
/// Items already held are flushed before a read error is returned.
/// Returns the number of flushes written.
fn drain(
    reader: impl BufRead,
    out: &mut impl Write,
    accumulator: &mut Accumulator<String>,
    flush_at: Option<usize>,
) -> Result<usize> {
    let mut flushes = 0;
    let mut read_error = None;

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                read_error = Some(e);
                break;
            }
        };
        accumulator.add(line);

        if flush_at.is_some_and(|limit| accumulator.accumulated_items_count() >= limit) {
            flushes += 1;
            emit(out, flushes, accumulator.extract())?;
        }
    }

    // Shutdown flush for whatever is left
    if !accumulator.is_empty() {
        flushes += 1;
        emit(out, flushes, accumulator.extract())?;
    }

    if let Some(e) = read_error {
        return Err(e).context("Failed to read input");
    }
    Ok(flushes)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    if cli.flush_at == Some(0) {
        bail!("--flush-at must be at least 1");
    }

    let mut accumulator: Accumulator<String> = config.build()?;

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            fs::File::open(path).context(format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let flushes = drain(reader, &mut out, &mut accumulator, cli.flush_at)?;

    debug!(flushes, capacity = accumulator.capacity(), "input drained");
    Ok(())
}
