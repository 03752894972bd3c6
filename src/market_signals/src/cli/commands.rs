use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a settings file (market_signals.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// CSV file with a header row (Datetime,Open,High,Low,Close,Volume,P_buy[,P_sell,price_diff,return])
    #[arg(short, long)]
    pub input: PathBuf,

    /// %K lookback in bars; overrides settings and MARKET_SIGNALS_PERIOD
    #[arg(long)]
    pub period: Option<usize>,

    /// %D smoothing length; overrides settings and MARKET_SIGNALS_D_PERIOD
    #[arg(long)]
    pub d_period: Option<usize>,

    /// First calendar day to keep in the output (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last calendar day to keep in the output, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enrich a CSV file and write the series to stdout
    Process {
        #[command(flatten)]
        args: InputArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Enrich a CSV file and print a short summary
    Summary {
        #[command(flatten)]
        args: InputArgs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}
