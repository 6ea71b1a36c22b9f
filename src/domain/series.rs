//! Ordered price series helpers.

use chrono::NaiveDate;

use crate::domain::error::DataError;
use crate::domain::price::PricePoint;

/// Span and bounds of a non-empty series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub count: usize,
    pub min_close: f64,
    pub max_close: f64,
}

/// Stable ascending sort by date. Rows sharing a date keep their input order.
pub fn sort_by_date(series: &mut [PricePoint]) {
    series.sort_by_key(|p| p.date);
}

/// Fails on the first row whose date precedes its predecessor's.
/// Equal dates are allowed.
pub fn ensure_ascending(series: &[PricePoint]) -> Result<(), DataError> {
    for (i, pair) in series.windows(2).enumerate() {
        if pair[1].date < pair[0].date {
            return Err(DataError::Unsorted {
                index: i + 1,
                previous: pair[0].date,
                current: pair[1].date,
            });
        }
    }
    Ok(())
}

pub fn range(series: &[PricePoint]) -> Option<SeriesRange> {
    let first = series.first()?;
    let last = series.last()?;

    let min_close = series.iter().map(|p| p.close).fold(f64::INFINITY, f64::min);
    let max_close = series
        .iter()
        .map(|p| p.close)
        .fold(f64::NEG_INFINITY, f64::max);

    Some(SeriesRange {
        first: first.date,
        last: last.date,
        count: series.len(),
        min_close,
        max_close,
    })
}
