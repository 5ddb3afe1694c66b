use async_trait::async_trait;

use crate::errors::CoreError;
use super::traits::QuoteProvider;

const PROVIDER_NAME: &str = "Yahoo Finance";

/// Yahoo Finance provider for stock quotes.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities, ETFs, indices.
/// - **Price used**: opening price of the latest bar in the 1-day range.
///
/// **Note**: Not WASM-compatible (uses native reqwest/tokio).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let resp = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Failed to fetch latest quote for {symbol}: {e}"),
            })?;

        let quote = resp.last_quote().map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("No quote data for {symbol}: {e}"),
        })?;

        Ok(quote.open)
    }
}
