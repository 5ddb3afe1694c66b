use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::QuoteProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_NAME: &str = "Alpha Vantage";

/// Bar width requested from the intraday endpoint.
pub const INTRADAY_INTERVAL: &str = "5min";

/// Alpha Vantage API provider for stock quotes.
///
/// - **Free tier**: 25 requests/day (across ALL endpoints).
/// - **Requires**: API key (set via settings as "alphavantage").
/// - **Price used**: opening price of the most recent 5-minute bar.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct IntradayResponse {
    #[serde(rename = "Meta Data")]
    meta_data: Option<MetaData>,

    #[serde(rename = "Time Series (5min)")]
    time_series: Option<HashMap<String, IntradayBar>>,

    #[serde(rename = "Error Message")]
    error_message: Option<String>,

    /// Rate-limit notices arrive as "Note" or "Information".
    #[serde(rename = "Note")]
    note: Option<String>,

    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize)]
struct MetaData {
    #[serde(rename = "3. Last Refreshed")]
    last_refreshed: String,
}

#[derive(Deserialize)]
struct IntradayBar {
    #[serde(rename = "1. open")]
    open: String,
}

fn api_error(message: String) -> CoreError {
    CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message,
    }
}

/// Extract the opening price of the last refreshed bar from an
/// `TIME_SERIES_INTRADAY` response body.
pub fn parse_intraday_open(symbol: &str, body: &str) -> Result<f64, CoreError> {
    let resp: IntradayResponse = serde_json::from_str(body)
        .map_err(|e| api_error(format!("Failed to parse intraday series for {symbol}: {e}")))?;

    if let Some(msg) = resp.error_message.or(resp.note).or(resp.information) {
        return Err(api_error(format!("{symbol}: {msg}")));
    }

    let last_refreshed = resp
        .meta_data
        .map(|m| m.last_refreshed)
        .ok_or_else(|| api_error(format!("No metadata for {symbol}")))?;

    let series = resp
        .time_series
        .ok_or_else(|| api_error(format!("No intraday series for {symbol}")))?;

    let bar = series.get(&last_refreshed).ok_or_else(|| {
        api_error(format!("No bar at {last_refreshed} for {symbol}"))
    })?;

    let price: f64 = bar
        .open
        .trim()
        .parse()
        .map_err(|e| api_error(format!("Invalid price format for {symbol}: {e}")))?;

    if !price.is_finite() {
        return Err(api_error(format!("Invalid price for {symbol}: {price}")));
    }

    Ok(price)
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let body = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "TIME_SERIES_INTRADAY"),
                ("symbol", symbol),
                ("interval", INTRADAY_INTERVAL),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_intraday_open(symbol, &body)
    }
}
