use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use stock_portfolio_core::errors::CoreError;
use stock_portfolio_core::models::holding::{is_valid_symbol, HoldingUpdate};
use stock_portfolio_core::models::portfolio::Portfolio;
use stock_portfolio_core::models::settings::{Settings, ALPHAVANTAGE_KEY};
use stock_portfolio_core::providers::registry::build_provider;
use stock_portfolio_core::storage::key_value::FileStore;
use stock_portfolio_core::PortfolioTracker;

use crate::cli::{AddArgs, Cli, Command, EditArgs, ProjectArgs};
use crate::error::CliError;
use crate::output;

const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";
const DATA_DIR_NAME: &str = "stock-portfolio";

/// Load the saved portfolio, apply one command, save if anything changed.
pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let mut store = FileStore::new(data_dir(cli)?);
    log::debug!("Data directory: {}", store.dir().display());
    let mut tracker = PortfolioTracker::new();
    tracker.load(&store)?;

    match &cli.command {
        Command::Add(args) => add(&mut tracker, args)?,
        Command::Edit(args) => edit(&mut tracker, args)?,
        Command::Remove(args) => {
            let symbol = resolve_symbol(tracker.portfolio(), &args.symbol);
            if report_not_found(tracker.remove_stock(&symbol).map(|_| ()))? {
                println!("Stock {symbol} removed.");
            }
        }
        Command::List => output::render_holdings(tracker.portfolio()),
        Command::Show => {
            let provider = build_provider(&settings(cli))?;
            let rows = tracker.valuation_report(provider.as_ref()).await;
            output::render_valuation(&rows, tracker.holding_count());
        }
        Command::Project(ProjectArgs { rate }) => {
            let provider = build_provider(&settings(cli))?;
            let rows = tracker.projection_report(provider.as_ref(), *rate).await;
            output::render_projection(&rows, *rate, tracker.holding_count());
        }
        Command::Export => print!("{}", tracker.export_holdings_to_csv()),
    }

    if tracker.has_unsaved_changes() {
        tracker.save(&mut store)?;
    }
    Ok(())
}

fn add(tracker: &mut PortfolioTracker, args: &AddArgs) -> Result<(), CliError> {
    let symbol = resolve_symbol(tracker.portfolio(), &args.symbol);
    if !is_valid_symbol(&symbol) {
        return Err(CliError::Validation(format!("'{}' is not a ticker symbol", args.symbol)));
    }
    validate_quantity(args.quantity)?;
    validate_price(args.price)?;
    validate_date(args.date)?;
    let sector = validate_sector(&args.sector)?;

    let replaced = tracker.add_stock(symbol.clone(), args.quantity, args.price, args.date, sector);
    if replaced.is_some() {
        println!("Stock {symbol} replaced.");
    } else {
        println!("Stock {symbol} added.");
    }
    Ok(())
}

fn edit(tracker: &mut PortfolioTracker, args: &EditArgs) -> Result<(), CliError> {
    let symbol = resolve_symbol(tracker.portfolio(), &args.symbol);

    let mut update = HoldingUpdate::new();
    if let Some(quantity) = args.quantity {
        validate_quantity(quantity)?;
        update = update.quantity(quantity);
    }
    if let Some(price) = args.price {
        validate_price(price)?;
        update = update.purchase_price(price);
    }
    if let Some(date) = args.date {
        validate_date(date)?;
        update = update.purchase_date(date);
    }
    if let Some(sector) = &args.sector {
        update = update.sector(validate_sector(sector)?);
    }
    if update.is_empty() {
        return Err(CliError::Validation(
            "nothing to change: pass --quantity, --price, --date or --sector".into(),
        ));
    }

    if report_not_found(tracker.edit_stock(&symbol, update))? {
        println!("Stock {symbol} edited.");
    }
    Ok(())
}

/// Print not-found outcomes instead of failing. Returns whether the operation happened.
fn report_not_found(result: Result<(), CoreError>) -> Result<bool, CliError> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.is_not_found() => {
            println!("{e}");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// The stored key `raw` refers to: an exact match, then a case-insensitive
/// one, otherwise the upper-cased input. Saved blobs may carry keys in any case.
fn resolve_symbol(portfolio: &Portfolio, raw: &str) -> String {
    let trimmed = raw.trim();
    if portfolio.contains(trimmed) {
        return trimmed.to_string();
    }
    portfolio
        .symbols()
        .into_iter()
        .find(|s| s.eq_ignore_ascii_case(trimmed))
        .map_or_else(|| trimmed.to_uppercase(), str::to_string)
}

fn validate_quantity(quantity: u64) -> Result<(), CliError> {
    if quantity == 0 {
        return Err(CliError::Validation("quantity must be at least 1".into()));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), CliError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CliError::Validation(format!(
            "purchase price must be a positive number, got {price}"
        )));
    }
    Ok(())
}

fn validate_date(date: NaiveDate) -> Result<(), CliError> {
    let today = Utc::now().date_naive();
    if date > today {
        return Err(CliError::Validation(format!(
            "purchase date {date} is in the future"
        )));
    }
    Ok(())
}

fn validate_sector(sector: &str) -> Result<String, CliError> {
    let trimmed = sector.trim();
    if trimmed.is_empty() {
        return Err(CliError::Validation("sector must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

fn settings(cli: &Cli) -> Settings {
    let mut settings = Settings::with_source(cli.source.into());
    let key = cli
        .api_key
        .clone()
        .or_else(|| std::env::var(API_KEY_ENV).ok());
    if let Some(key) = key {
        settings.set_api_key(ALPHAVANTAGE_KEY, key);
    }
    settings
}

fn data_dir(cli: &Cli) -> Result<PathBuf, CliError> {
    cli.data_dir
        .clone()
        .or_else(|| dirs::data_dir().map(|d| d.join(DATA_DIR_NAME)))
        .ok_or(CliError::NoDataDir)
}
