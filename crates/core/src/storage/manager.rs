use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

use super::key_value::KeyValueStore;

/// The single slot the whole holdings map is persisted under.
pub const PORTFOLIO_KEY: &str = "portfolio";

/// What a restore did to the in-memory store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The store was replaced by the decoded blob.
    Restored { holdings: usize },
    /// The blob was absent or empty; the store is unchanged.
    NothingToRestore,
}

/// High-level storage operations: holdings map ⇄ JSON blob ⇄ key-value slot.
pub struct StorageManager;

impl StorageManager {
    /// Encode the full holdings map.
    ///
    /// Format: `{"AAPL": {"quantity": 10, "purchasePrice": 100.0,
    /// "purchaseDate": "2024-01-02", "sector": "Tech"}, ...}`
    ///
    /// A non-finite purchase price has no JSON form and is a `Serialization` error.
    pub fn serialize(portfolio: &Portfolio) -> Result<String, CoreError> {
        if let Some((symbol, holding)) = portfolio
            .iter()
            .find(|(_, h)| !h.purchase_price.is_finite())
        {
            return Err(CoreError::Serialization(format!(
                "Purchase price of {symbol} is not a finite number: {}",
                holding.purchase_price
            )));
        }

        serde_json::to_string(portfolio)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))
    }

    /// Replace `portfolio` wholesale with the decoded blob.
    ///
    /// An absent or blank blob leaves the store untouched. So does a blob that
    /// fails to decode, which is reported as an error instead.
    pub fn restore(
        portfolio: &mut Portfolio,
        blob: Option<&str>,
    ) -> Result<RestoreOutcome, CoreError> {
        let blob = match blob {
            Some(b) if !b.trim().is_empty() => b,
            _ => return Ok(RestoreOutcome::NothingToRestore),
        };

        let decoded: Portfolio = serde_json::from_str(blob).map_err(|e| {
            CoreError::Deserialization(format!("Failed to deserialize portfolio: {e}"))
        })?;

        let holdings = decoded.len();
        *portfolio = decoded;
        Ok(RestoreOutcome::Restored { holdings })
    }

    /// Serialize and write to the portfolio slot.
    pub fn save(portfolio: &Portfolio, store: &mut dyn KeyValueStore) -> Result<(), CoreError> {
        let blob = Self::serialize(portfolio)?;
        store.persist(PORTFOLIO_KEY, &blob)?;
        log::info!("Portfolio saved ({} holdings).", portfolio.len());
        Ok(())
    }

    /// Read the portfolio slot and restore from it.
    pub fn load(
        portfolio: &mut Portfolio,
        store: &dyn KeyValueStore,
    ) -> Result<RestoreOutcome, CoreError> {
        let blob = store.retrieve(PORTFOLIO_KEY)?;
        let outcome = Self::restore(portfolio, blob.as_deref())?;
        match outcome {
            RestoreOutcome::Restored { holdings } => {
                log::info!("Portfolio loaded ({holdings} holdings).")
            }
            RestoreOutcome::NothingToRestore => log::info!("No portfolio found."),
        }
        Ok(outcome)
    }
}
