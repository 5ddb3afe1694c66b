use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Longest ticker the quote guard lets through (e.g. "BRK-B", "^GSPC", "EURUSD=X").
pub const MAX_SYMBOL_LEN: usize = 12;

/// One tracked stock position.
///
/// The symbol is not part of the record: it is the key the holding is stored
/// under in [`Portfolio`](super::portfolio::Portfolio). Field names are
/// camelCase on the wire so the persisted blob keeps the
/// `{"AAPL": {"quantity": .., "purchasePrice": .., ..}}` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Number of shares held
    pub quantity: u64,

    /// Price per share at acquisition
    pub purchase_price: f64,

    /// Acquisition date (interpreted as 00:00 UTC for growth calculations)
    pub purchase_date: NaiveDate,

    /// Free-text classification label (e.g. "Tech", "Energy")
    pub sector: String,
}

impl Holding {
    pub fn new(
        quantity: u64,
        purchase_price: f64,
        purchase_date: NaiveDate,
        sector: impl Into<String>,
    ) -> Self {
        Self {
            quantity,
            purchase_price,
            purchase_date,
            sector: sector.into(),
        }
    }

    /// Total amount paid for the position.
    #[must_use]
    pub fn cost_basis(&self) -> f64 {
        self.quantity as f64 * self.purchase_price
    }

    /// Overwrite only the fields the update actually carries.
    pub fn apply(&mut self, update: HoldingUpdate) {
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(purchase_price) = update.purchase_price {
            self.purchase_price = purchase_price;
        }
        if let Some(purchase_date) = update.purchase_date {
            self.purchase_date = purchase_date;
        }
        if let Some(sector) = update.sector {
            self.sector = sector;
        }
    }
}

/// Partial update for an existing holding.
///
/// `None` means "leave as is"; `Some(0)` or `Some(String::new())` are real values
/// and do overwrite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingUpdate {
    pub quantity: Option<u64>,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    pub sector: Option<String>,
}

impl HoldingUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(mut self, quantity: u64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn purchase_price(mut self, purchase_price: f64) -> Self {
        self.purchase_price = Some(purchase_price);
        self
    }

    pub fn purchase_date(mut self, purchase_date: NaiveDate) -> Self {
        self.purchase_date = Some(purchase_date);
        self
    }

    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// True when no field was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none()
            && self.purchase_price.is_none()
            && self.purchase_date.is_none()
            && self.sector.is_none()
    }
}

/// Guard applied before a symbol is sent to a quote provider.
///
/// Accepts ASCII alphanumerics plus the punctuation real tickers use
/// (`.`, `-`, `^`, `=`), up to [`MAX_SYMBOL_LEN`] characters.
#[must_use]
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol.len() <= MAX_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
}
