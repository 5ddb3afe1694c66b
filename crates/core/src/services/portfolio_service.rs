use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingUpdate};
use crate::models::portfolio::Portfolio;

/// Create / edit / remove operations on the holdings store.
///
/// Pure business logic: no I/O, no API calls. No input validation either:
/// whoever collects the input checks it before calling in.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Insert a holding, replacing any existing one under the same symbol wholesale.
    /// Returns the holding that was replaced, if any.
    pub fn add_or_replace(
        &self,
        portfolio: &mut Portfolio,
        symbol: impl Into<String>,
        holding: Holding,
    ) -> Option<Holding> {
        let symbol = symbol.into();
        let previous = portfolio.holdings.insert(symbol.clone(), holding);
        if previous.is_some() {
            log::info!("Stock {symbol} replaced.");
        } else {
            log::info!("Stock {symbol} added.");
        }
        previous
    }

    /// Overwrite only the supplied fields of an existing holding.
    pub fn edit(
        &self,
        portfolio: &mut Portfolio,
        symbol: &str,
        update: HoldingUpdate,
    ) -> Result<(), CoreError> {
        let holding = portfolio
            .holdings
            .get_mut(symbol)
            .ok_or_else(|| CoreError::HoldingNotFound(symbol.to_string()))?;

        holding.apply(update);
        log::info!("Stock {symbol} edited.");
        Ok(())
    }

    /// Delete a holding. Returns the removed record.
    pub fn remove(&self, portfolio: &mut Portfolio, symbol: &str) -> Result<Holding, CoreError> {
        let removed = portfolio
            .holdings
            .remove(symbol)
            .ok_or_else(|| CoreError::HoldingNotFound(symbol.to_string()))?;

        log::info!("Stock {symbol} removed.");
        Ok(removed)
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
