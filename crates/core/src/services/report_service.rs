use chrono::{DateTime, Utc};

use crate::errors::CoreError;
use crate::models::holding::is_valid_symbol;
use crate::models::portfolio::Portfolio;
use crate::models::report::{ProjectionRow, ValuationRow};
use crate::providers::traits::QuoteProvider;
use crate::services::valuation_service::ValuationService;

/// Builds the valuation and projection tables.
///
/// Quotes are fetched one holding at a time, in store order: the fetch for
/// one symbol finishes before the next starts. A symbol whose quote fails is
/// logged and left out of the table; the rest of the report still builds.
/// Nothing is retried or cached, so every call re-fetches every price.
pub struct ReportService {
    valuation_service: ValuationService,
}

impl ReportService {
    pub fn new() -> Self {
        Self {
            valuation_service: ValuationService::new(),
        }
    }

    /// One row per holding whose quote succeeded.
    pub async fn build_valuation_report(
        &self,
        portfolio: &Portfolio,
        provider: &dyn QuoteProvider,
        as_of: DateTime<Utc>,
    ) -> Vec<ValuationRow> {
        let mut rows = Vec::with_capacity(portfolio.len());

        for (symbol, holding) in portfolio.iter() {
            let current_price = match self.fetch_quote(provider, symbol).await {
                Ok(price) => price,
                Err(e) => {
                    log::warn!("Skipping {symbol}: {e}");
                    continue;
                }
            };

            rows.push(ValuationRow {
                symbol: symbol.to_string(),
                quantity: holding.quantity,
                purchase_price: holding.purchase_price,
                purchase_date: holding.purchase_date,
                sector: holding.sector.clone(),
                current_price,
                current_value: self
                    .valuation_service
                    .current_value(holding.quantity, current_price),
                cagr: self.valuation_service.cagr(holding, current_price, as_of),
            });
        }

        rows
    }

    /// One row per holding whose quote succeeded, grown by `expected_rate_of_return`
    /// (a fraction: 0.10 = 10%).
    pub async fn build_projection_report(
        &self,
        portfolio: &Portfolio,
        provider: &dyn QuoteProvider,
        expected_rate_of_return: f64,
    ) -> Vec<ProjectionRow> {
        let mut rows = Vec::with_capacity(portfolio.len());

        for (symbol, holding) in portfolio.iter() {
            let current_price = match self.fetch_quote(provider, symbol).await {
                Ok(price) => price,
                Err(e) => {
                    log::warn!("Skipping {symbol}: {e}");
                    continue;
                }
            };

            let current_value = self
                .valuation_service
                .current_value(holding.quantity, current_price);

            rows.push(ProjectionRow {
                symbol: symbol.to_string(),
                current_value,
                projected_value: self
                    .valuation_service
                    .projected_value(current_value, expected_rate_of_return),
            });
        }

        rows
    }

    /// Guard the symbol, ask the provider, and reject prices that are not
    /// finite and non-negative.
    async fn fetch_quote(
        &self,
        provider: &dyn QuoteProvider,
        symbol: &str,
    ) -> Result<f64, CoreError> {
        if !is_valid_symbol(symbol) {
            return Err(CoreError::ValidationError(format!(
                "Malformed symbol '{symbol}' not sent to {}",
                provider.name()
            )));
        }

        log::debug!("Fetching quote for {symbol} from {}", provider.name());
        let price = provider.get_current_price(symbol).await?;

        if !price.is_finite() || price < 0.0 {
            return Err(CoreError::Api {
                provider: provider.name().to_string(),
                message: format!(
                    "Invalid price returned for {symbol}: {price} (must be finite and non-negative)"
                ),
            });
        }

        Ok(price)
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new()
    }
}
