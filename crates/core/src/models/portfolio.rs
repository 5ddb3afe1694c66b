use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::holding::Holding;

/// The in-memory holdings store: symbol → holding.
///
/// Serializes transparently as the symbol map itself, so the persisted blob is
/// just `{"AAPL": {...}, "MSFT": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portfolio {
    pub holdings: BTreeMap<String, Holding>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.get(symbol)
    }

    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.holdings.contains_key(symbol)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// All (symbol, holding) pairs. Order is by symbol; callers must not rely on it.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Holding)> {
        self.holdings.iter().map(|(s, h)| (s.as_str(), h))
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.holdings.keys().map(String::as_str).collect()
    }
}
