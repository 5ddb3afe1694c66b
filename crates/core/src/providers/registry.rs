use crate::errors::CoreError;
use crate::models::settings::{QuoteSource, Settings, ALPHAVANTAGE_KEY};

use super::alphavantage::AlphaVantageProvider;
#[cfg(not(target_arch = "wasm32"))]
use super::yahoo_finance::YahooFinanceProvider;
use super::traits::QuoteProvider;

/// Build the quote provider selected in `settings`.
///
/// There is exactly one active provider per tracker: a failed quote is
/// reported and skipped, never retried against another source.
pub fn build_provider(settings: &Settings) -> Result<Box<dyn QuoteProvider>, CoreError> {
    match settings.quote_source {
        QuoteSource::AlphaVantage => {
            let key = settings.api_key(ALPHAVANTAGE_KEY).ok_or_else(|| {
                CoreError::NoProvider(format!(
                    "{} requires an API key (\"{ALPHAVANTAGE_KEY}\")",
                    QuoteSource::AlphaVantage
                ))
            })?;
            Ok(Box::new(AlphaVantageProvider::new(key.to_string())))
        }
        #[cfg(not(target_arch = "wasm32"))]
        QuoteSource::YahooFinance => Ok(Box::new(YahooFinanceProvider::new()?)),
        #[cfg(target_arch = "wasm32")]
        QuoteSource::YahooFinance => Err(CoreError::NoProvider(format!(
            "{} is not available on this target",
            QuoteSource::YahooFinance
        ))),
    }
}
