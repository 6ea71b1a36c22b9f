//! Daily closing price observation.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }

    /// Percent change from `previous` to `self`: (C[i] - C[i-1]) / C[i-1] * 100.
    ///
    /// Undefined (infinite or NaN) when the previous close is zero; callers
    /// are expected to have checked it.
    pub fn pct_change_from(&self, previous: &PricePoint) -> f64 {
        (self.close - previous.close) / previous.close * 100.0
    }
}
