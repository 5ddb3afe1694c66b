//! Command-line arguments for `stock-portfolio`.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `add` | Add a stock, or replace one with the same symbol |
//! | `edit` | Change selected fields of a tracked stock |
//! | `remove` | Stop tracking a stock |
//! | `list` | Show holdings without fetching prices |
//! | `show` | Valuation table with current prices and CAGR |
//! | `project` | Projected value after one period at a given return |
//! | `export` | Print holdings as CSV |

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use stock_portfolio_core::models::settings::QuoteSource;

/// Track stock holdings and value them against live quotes.
#[derive(Debug, Parser)]
#[command(name = "stock-portfolio", author, version, about)]
pub struct Cli {
    /// Directory holding the saved portfolio (defaults to the user data dir).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Market-data provider used by `show` and `project`.
    #[arg(long, global = true, value_enum, default_value_t = SourceArg::AlphaVantage)]
    pub source: SourceArg,

    /// Alpha Vantage API key. Falls back to $ALPHAVANTAGE_API_KEY.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    AlphaVantage,
    Yahoo,
}

impl From<SourceArg> for QuoteSource {
    fn from(value: SourceArg) -> Self {
        match value {
            SourceArg::AlphaVantage => QuoteSource::AlphaVantage,
            SourceArg::Yahoo => QuoteSource::YahooFinance,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a stock, or replace one with the same symbol.
    Add(AddArgs),
    /// Change selected fields of a tracked stock.
    Edit(EditArgs),
    /// Stop tracking a stock.
    Remove(SymbolArgs),
    /// Show holdings without fetching prices.
    List,
    /// Valuation table with current prices and CAGR.
    Show,
    /// Projected value after one period at a given return.
    Project(ProjectArgs),
    /// Print holdings as CSV.
    Export,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub symbol: String,

    #[arg(long)]
    pub quantity: u64,

    #[arg(long)]
    pub price: f64,

    /// Purchase date, YYYY-MM-DD.
    #[arg(long)]
    pub date: NaiveDate,

    #[arg(long)]
    pub sector: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub symbol: String,

    #[arg(long)]
    pub quantity: Option<u64>,

    #[arg(long)]
    pub price: Option<f64>,

    /// Purchase date, YYYY-MM-DD.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub sector: Option<String>,
}

#[derive(Debug, Args)]
pub struct SymbolArgs {
    pub symbol: String,
}

#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Expected rate of return: a fraction (0.1) or a percentage (10%).
    #[arg(long, value_parser = parse_rate, allow_hyphen_values = true)]
    pub rate: f64,
}

/// Accepts "0.1", "-0.05" or "10%".
pub fn parse_rate(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    let (number, scale) = match trimmed.strip_suffix('%') {
        Some(pct) => (pct.trim(), 100.0),
        None => (trimmed, 1.0),
    };
    let value: f64 = number
        .parse()
        .map_err(|_| format!("'{raw}' is not a number or percentage"))?;
    if !value.is_finite() {
        return Err(format!("'{raw}' is not a finite rate"));
    }
    Ok(value / scale)
}
