use tally::{load_file, Engine, SourceFormat};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::io::stdout;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Print aggregate figures for a transaction dataset.
#[derive(Debug, Parser)]
#[command(name = "tally", version)]
struct Args {
    /// JSON or CSV file of raw transaction rows
    #[arg(default_value = "transactions.json")]
    input: PathBuf,

    /// Input format; `auto` picks by file extension
    #[arg(long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    /// Include sent total and open-issue status for this client (repeatable)
    #[arg(long = "client", value_name = "NAME")]
    clients: Vec<String>,

    /// Print transactions grouped by beneficiary as CSV instead of the summary
    #[arg(long)]
    beneficiaries: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Auto,
    Json,
    Csv,
}

impl From<Format> for SourceFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Auto => SourceFormat::Auto,
            Format::Json => SourceFormat::Json,
            Format::Csv => SourceFormat::Csv,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(input = %args.input.display(), "Processing transactions");

    let transactions = load_file(&args.input, args.format.into())
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let engine = Engine::new(transactions);

    if args.beneficiaries {
        engine
            .write_beneficiaries(stdout())
            .context("Failed to write beneficiary report")?;
        return Ok(());
    }

    let clients: Vec<&str> = args.clients.iter().map(String::as_str).collect();
    let summary = engine.summary(&clients);
    for client in summary.unknown_clients() {
        warn!(client, "Client not found on any transaction");
    }

    summary
        .write_json(stdout())
        .context("Failed to write summary")?;
    println!();

    Ok(())
}
