use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::models::holding::Holding;

/// Milliseconds in a Julian year (365.25 days).
pub const MS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Pure valuation math: value, holding period, compound annual growth.
///
/// **Time zone rule**: a purchase date means 00:00:00 UTC of that day. The
/// evaluation instant is always a UTC timestamp, so the same inputs give the
/// same CAGR on every machine.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// `(final / initial) ^ (1 / years) - 1`.
    ///
    /// `initial` must be > 0; the result is NaN or infinite otherwise. A
    /// non-positive `years` is not guarded here; see [`Self::cagr`].
    #[must_use]
    pub fn annualized_growth(&self, initial_value: f64, final_value: f64, years: f64) -> f64 {
        (final_value / initial_value).powf(1.0 / years) - 1.0
    }

    /// Years between the purchase date and `as_of`, at millisecond resolution.
    /// Negative when the purchase date lies in the future.
    #[must_use]
    pub fn elapsed_years(&self, purchase_date: NaiveDate, as_of: DateTime<Utc>) -> f64 {
        let purchased_at = purchase_date.and_time(NaiveTime::default()).and_utc();
        (as_of - purchased_at).num_milliseconds() as f64 / MS_PER_YEAR
    }

    /// CAGR of a holding at `current_price`; exactly 0 unless some time has passed.
    #[must_use]
    pub fn cagr(&self, holding: &Holding, current_price: f64, as_of: DateTime<Utc>) -> f64 {
        let years = self.elapsed_years(holding.purchase_date, as_of);
        if years > 0.0 {
            self.annualized_growth(holding.purchase_price, current_price, years)
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn current_value(&self, quantity: u64, price: f64) -> f64 {
        quantity as f64 * price
    }

    #[must_use]
    pub fn projected_value(&self, current_value: f64, expected_rate_of_return: f64) -> f64 {
        current_value * (1.0 + expected_rate_of_return)
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
