use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key under which the Alpha Vantage API key is stored in [`Settings::api_keys`].
pub const ALPHAVANTAGE_KEY: &str = "alphavantage";

/// Which market-data endpoint answers quote requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuoteSource {
    /// Alpha Vantage intraday series, requires an API key
    #[default]
    AlphaVantage,
    /// Yahoo Finance, no API key needed (native targets only)
    YahooFinance,
}

impl std::fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteSource::AlphaVantage => write!(f, "Alpha Vantage"),
            QuoteSource::YahooFinance => write!(f, "Yahoo Finance"),
        }
    }
}

/// Runtime configuration for the tracker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Provider used for current prices.
    pub quote_source: QuoteSource,

    /// API keys by provider name (e.g., "alphavantage").
    pub api_keys: HashMap<String, String>,
}

impl Settings {
    pub fn with_source(quote_source: QuoteSource) -> Self {
        Self {
            quote_source,
            api_keys: HashMap::new(),
        }
    }

    /// Set an API key, ignoring blank values.
    pub fn set_api_key(&mut self, provider: impl Into<String>, key: impl Into<String>) {
        let key = key.into();
        if !key.trim().is_empty() {
            self.api_keys.insert(provider.into(), key.trim().to_string());
        }
    }

    #[must_use]
    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys.get(provider).map(String::as_str)
    }
}
