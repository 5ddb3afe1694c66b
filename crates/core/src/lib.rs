pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, NaiveDate, Utc};
use models::{
    holding::{Holding, HoldingUpdate},
    portfolio::Portfolio,
    report::{ProjectionRow, ValuationRow},
};
use providers::traits::QuoteProvider;
use services::{portfolio_service::PortfolioService, report_service::ReportService};
use storage::{
    key_value::KeyValueStore,
    manager::{RestoreOutcome, StorageManager},
};

use errors::CoreError;

/// Main entry point for the stock-portfolio core library.
/// Holds the holdings store and the services that work on it. Quote providers
/// are passed in per report, so editing holdings never needs network access.
#[must_use]
pub struct PortfolioTracker {
    portfolio: Portfolio,
    portfolio_service: PortfolioService,
    report_service: ReportService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioTracker")
            .field("holdings", &self.portfolio.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl PortfolioTracker {
    /// Create a tracker with no holdings.
    pub fn new() -> Self {
        Self {
            portfolio: Portfolio::new(),
            portfolio_service: PortfolioService::new(),
            report_service: ReportService::new(),
            dirty: false,
        }
    }

    // ── Holding Management ──────────────────────────────────────────

    /// Add a stock, or replace every field of an existing one with the same symbol.
    /// Returns the previous holding if one was replaced.
    pub fn add_stock(
        &mut self,
        symbol: impl Into<String>,
        quantity: u64,
        purchase_price: f64,
        purchase_date: NaiveDate,
        sector: impl Into<String>,
    ) -> Option<Holding> {
        let holding = Holding::new(quantity, purchase_price, purchase_date, sector);
        let previous = self
            .portfolio_service
            .add_or_replace(&mut self.portfolio, symbol, holding);
        self.dirty = true;
        previous
    }

    /// Update only the fields present in `update`.
    /// Returns `CoreError::HoldingNotFound` if the symbol isn't tracked.
    pub fn edit_stock(&mut self, symbol: &str, update: HoldingUpdate) -> Result<(), CoreError> {
        self.portfolio_service
            .edit(&mut self.portfolio, symbol, update)?;
        self.dirty = true;
        Ok(())
    }

    /// Remove a stock. Returns `CoreError::HoldingNotFound` if the symbol isn't tracked.
    pub fn remove_stock(&mut self, symbol: &str) -> Result<Holding, CoreError> {
        let removed = self
            .portfolio_service
            .remove(&mut self.portfolio, symbol)?;
        self.dirty = true;
        Ok(removed)
    }

    #[must_use]
    pub fn get_holding(&self, symbol: &str) -> Option<&Holding> {
        self.portfolio.get(symbol)
    }

    /// All (symbol, holding) pairs.
    pub fn holdings(&self) -> impl Iterator<Item = (&str, &Holding)> {
        self.portfolio.iter()
    }

    #[must_use]
    pub fn holding_count(&self) -> usize {
        self.portfolio.len()
    }

    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    // ── Reports ─────────────────────────────────────────────────────

    /// Valuation table as of now.
    pub async fn valuation_report(&self, provider: &dyn QuoteProvider) -> Vec<ValuationRow> {
        self.valuation_report_at(provider, Utc::now()).await
    }

    /// Valuation table with CAGR measured up to `as_of`.
    pub async fn valuation_report_at(
        &self,
        provider: &dyn QuoteProvider,
        as_of: DateTime<Utc>,
    ) -> Vec<ValuationRow> {
        self.report_service
            .build_valuation_report(&self.portfolio, provider, as_of)
            .await
    }

    /// Projected value of each holding after one period at `expected_rate_of_return`.
    pub async fn projection_report(
        &self,
        provider: &dyn QuoteProvider,
        expected_rate_of_return: f64,
    ) -> Vec<ProjectionRow> {
        self.report_service
            .build_projection_report(&self.portfolio, provider, expected_rate_of_return)
            .await
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Encode all holdings as a JSON blob.
    pub fn serialize(&self) -> Result<String, CoreError> {
        StorageManager::serialize(&self.portfolio)
    }

    /// Replace all holdings with the decoded blob.
    /// An absent or empty blob leaves the holdings untouched.
    pub fn restore(&mut self, blob: Option<&str>) -> Result<RestoreOutcome, CoreError> {
        let outcome = StorageManager::restore(&mut self.portfolio, blob)?;
        if let RestoreOutcome::Restored { .. } = outcome {
            self.dirty = false;
        }
        Ok(outcome)
    }

    /// Persist all holdings to `store`. Clears the unsaved-changes flag on success.
    pub fn save(&mut self, store: &mut dyn KeyValueStore) -> Result<(), CoreError> {
        StorageManager::save(&self.portfolio, store)?;
        self.dirty = false;
        Ok(())
    }

    /// Replace all holdings with those persisted in `store`, if any.
    pub fn load(&mut self, store: &dyn KeyValueStore) -> Result<RestoreOutcome, CoreError> {
        let outcome = StorageManager::load(&mut self.portfolio, store)?;
        if let RestoreOutcome::Restored { .. } = outcome {
            self.dirty = false;
        }
        Ok(outcome)
    }

    /// Returns `true` if holdings changed since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Export all holdings as a CSV string.
    /// Columns: symbol, quantity, purchase_price, purchase_date, sector
    #[must_use]
    pub fn export_holdings_to_csv(&self) -> String {
        let mut csv = String::from("symbol,quantity,purchase_price,purchase_date,sector\n");
        for (symbol, holding) in self.portfolio.iter() {
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                csv_field(symbol),
                holding.quantity,
                holding.purchase_price,
                holding.purchase_date,
                csv_field(&holding.sector),
            ));
        }
        csv
    }
}

/// Quote fields containing commas, quotes, or newlines.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl Default for PortfolioTracker {
    fn default() -> Self {
        Self::new()
    }
}
