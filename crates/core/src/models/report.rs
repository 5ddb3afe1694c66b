use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One line of the valuation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRow {
    pub symbol: String,
    pub quantity: u64,
    pub purchase_price: f64,
    pub purchase_date: NaiveDate,
    pub sector: String,

    /// Price returned by the quote provider
    pub current_price: f64,

    /// quantity × current_price
    pub current_value: f64,

    /// Compound annual growth rate as a fraction (0.25 = 25%).
    /// Exactly 0 when the purchase date is not in the past.
    pub cagr: f64,
}

impl ValuationRow {
    /// CAGR as a percentage, for display.
    #[must_use]
    pub fn cagr_pct(&self) -> f64 {
        self.cagr * 100.0
    }
}

/// One line of the future-value projection table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub symbol: String,
    pub current_value: f64,

    /// current_value × (1 + expected rate of return)
    pub projected_value: f64,
}

/// Sum of `current_value` across a valuation table.
#[must_use]
pub fn total_current_value(rows: &[ValuationRow]) -> f64 {
    rows.iter().map(|r| r.current_value).sum()
}

/// Sum of `projected_value` across a projection table.
#[must_use]
pub fn total_projected_value(rows: &[ProjectionRow]) -> f64 {
    rows.iter().map(|r| r.projected_value).sum()
}
