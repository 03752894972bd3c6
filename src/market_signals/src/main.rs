use std::{io, path::Path};

use anyhow::{Context, Result};
use clap::Parser;
use market_signals::{
    DataPoint, filter_by_range,
    cli::{
        commands::{Cli, Commands, InputArgs, OutputFormat},
        params::{resolve_range, resolve_settings},
    },
    io::sink::{CsvSink, DataSink, JsonSink},
    pipeline::{process_path, summarize},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the data; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load(config: Option<&Path>, args: &InputArgs) -> Result<Vec<DataPoint>> {
    let settings = resolve_settings(config, args).context("invalid settings")?;

    let points = process_path(&args.input, &settings.oscillator)
        .with_context(|| format!("file rejected: {}", args.input.display()))?;

    let points = match resolve_range(args, &points).context("invalid date range")? {
        Some(range) => {
            let filtered = filter_by_range(&points, &range);
            info!(
                start = %range.start(),
                end = %range.end(),
                kept = filtered.len(),
                "applied date range"
            );
            filtered
        }
        None => points,
    };

    Ok(points)
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Process {
            args,
            format,
            pretty,
        } => {
            let points = load(config, &args)?;
            let stdout = io::stdout().lock();
            let written = match format {
                OutputFormat::Json => JsonSink::new(stdout).pretty(pretty).write(&points)?,
                OutputFormat::Csv => CsvSink::new(stdout).write(&points)?,
            };
            info!(written, "wrote enriched series");
        }
        Commands::Summary { args } => {
            let points = load(config, &args)?;
            let summary = summarize(&points);
            println!("rows       {}", summary.rows);
            println!("first      {}", fmt_opt(summary.first));
            println!("last       {}", fmt_opt(summary.last));
            println!("k defined  {}", summary.k_defined);
            println!("d defined  {}", summary.d_defined);
            println!("last k     {}", fmt_opt(summary.last_k.map(|k| format!("{k:.2}"))));
            println!("last d     {}", fmt_opt(summary.last_d.map(|d| format!("{d:.2}"))));
        }
    }

    Ok(())
}
