//! Big-move detection over an ordered daily price series.
//!
//! pct[i] = (C[i] - C[i-1]) / C[i-1] * 100
//! A row is flagged when |pct[i]| >= threshold. Upside iff pct[i] > 0.
//! The first row has no predecessor and is never flagged.

use std::fmt;

use chrono::NaiveDate;

use crate::domain::error::DataError;
use crate::domain::price::PricePoint;
use crate::domain::series::ensure_ascending;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Upside,
    Downside,
}

impl Direction {
    fn of(pct_change: f64) -> Self {
        if pct_change > 0.0 {
            Direction::Upside
        } else {
            Direction::Downside
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Upside => write!(f, "Upside"),
            Direction::Downside => write!(f, "Downside"),
        }
    }
}

/// A flagged day: the current point of a compared pair.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveEvent {
    pub date: NaiveDate,
    pub price: f64,
    pub pct_change: f64,
    pub direction: Direction,
}

/// Stateless detector bound to one threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BigMoveDetector {
    threshold_pct: f64,
}

impl BigMoveDetector {
    pub fn new(threshold_pct: f64) -> Result<Self, DataError> {
        if !threshold_pct.is_finite() || threshold_pct <= 0.0 {
            return Err(DataError::InvalidThreshold {
                value: threshold_pct,
            });
        }
        Ok(Self { threshold_pct })
    }

    pub fn threshold_pct(&self) -> f64 {
        self.threshold_pct
    }

    /// Scan `series` once and return every big move in input order.
    ///
    /// Either the full event list is returned or nothing is: the series is
    /// checked for ordering up front, and a bad price aborts the scan.
    pub fn detect(&self, series: &[PricePoint]) -> Result<Vec<MoveEvent>, DataError> {
        ensure_ascending(series)?;

        let mut events = Vec::new();
        for (i, pair) in series.windows(2).enumerate() {
            let previous = &pair[0];
            let current = &pair[1];

            if !previous.close.is_finite() || previous.close <= 0.0 {
                return Err(DataError::NonPositivePrice {
                    index: i,
                    date: previous.date,
                    close: previous.close,
                });
            }
            if !current.close.is_finite() {
                return Err(DataError::NonFinitePrice {
                    index: i + 1,
                    date: current.date,
                });
            }

            let pct_change = current.pct_change_from(previous);
            if !pct_change.is_finite() {
                return Err(DataError::UnrepresentableChange {
                    index: i + 1,
                    date: current.date,
                });
            }
            if pct_change.abs() >= self.threshold_pct {
                events.push(MoveEvent {
                    date: current.date,
                    price: current.close,
                    pct_change,
                    direction: Direction::of(pct_change),
                });
            }
        }

        Ok(events)
    }
}

/// Convenience wrapper: validate the threshold and run one detection pass.
pub fn detect(series: &[PricePoint], threshold_pct: f64) -> Result<Vec<MoveEvent>, DataError> {
    BigMoveDetector::new(threshold_pct)?.detect(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn make_series(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(date(i as u32 + 1), close))
            .collect()
    }

    #[test]
    fn empty_and_single_point_yield_nothing() {
        assert!(detect(&[], 15.0).unwrap().is_empty());
        assert!(detect(&make_series(&[100.0]), 0.001).unwrap().is_empty());
    }

    #[test]
    fn reference_scenario() {
        let series = make_series(&[100.0, 120.0, 121.0, 90.0]);
        let events = detect(&series, 15.0).unwrap();

        assert_eq!(events.len(), 2);

        assert_eq!(events[0].date, date(2));
        assert_eq!(events[0].price, 120.0);
        assert_relative_eq!(events[0].pct_change, 20.0);
        assert_eq!(events[0].direction, Direction::Upside);

        assert_eq!(events[1].date, date(4));
        assert_eq!(events[1].price, 90.0);
        assert_relative_eq!(events[1].pct_change, (90.0 - 121.0) / 121.0 * 100.0);
        assert_eq!(events[1].direction, Direction::Downside);
    }

    #[test]
    fn threshold_is_inclusive() {
        let events = detect(&make_series(&[100.0, 115.0]), 15.0).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].pct_change, 15.0);
    }

    #[test]
    fn exact_negative_threshold_is_downside() {
        let events = detect(&make_series(&[100.0, 80.0]), 20.0).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].direction, Direction::Downside);
    }

    #[test]
    fn zero_previous_price_is_an_error() {
        let err = detect(&make_series(&[0.0, 50.0]), 15.0).unwrap_err();
        assert_eq!(
            err,
            DataError::NonPositivePrice {
                index: 0,
                date: date(1),
                close: 0.0,
            }
        );
    }

    #[test]
    fn negative_previous_price_is_an_error() {
        let err = detect(&make_series(&[10.0, -5.0, 7.0]), 15.0).unwrap_err();
        assert!(matches!(err, DataError::NonPositivePrice { index: 1, .. }));
    }

    #[test]
    fn no_partial_results_on_error() {
        // The first pair is a big move, the bad price comes later.
        let result = detect(&make_series(&[100.0, 200.0, 0.0, 10.0]), 15.0);
        assert!(result.is_err());
    }

    #[test]
    fn non_finite_current_price_is_an_error() {
        let err = detect(&make_series(&[100.0, f64::NAN]), 15.0).unwrap_err();
        assert!(matches!(err, DataError::NonFinitePrice { index: 1, .. }));
    }

    #[test]
    fn subnormal_previous_price_overflows_to_an_error() {
        let err = detect(&make_series(&[1e-310, 1.0]), 15.0).unwrap_err();
        assert_eq!(
            err,
            DataError::UnrepresentableChange {
                index: 1,
                date: date(2),
            }
        );
    }

    #[test]
    fn zero_last_price_is_a_downside_move() {
        // Only previous prices are divisors, a final 0 is a -100% move.
        let events = detect(&make_series(&[50.0, 0.0]), 15.0).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].pct_change, -100.0);
        assert_eq!(events[0].direction, Direction::Downside);
    }

    #[test]
    fn unsorted_series_is_rejected() {
        let series = vec![
            PricePoint::new(date(2), 100.0),
            PricePoint::new(date(1), 150.0),
        ];
        let err = detect(&series, 15.0).unwrap_err();
        assert!(matches!(err, DataError::Unsorted { index: 1, .. }));
    }

    #[test]
    fn duplicate_dates_are_compared_as_is() {
        let series = vec![
            PricePoint::new(date(1), 100.0),
            PricePoint::new(date(1), 130.0),
        ];
        let events = detect(&series, 15.0).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date, date(1));
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        for value in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                BigMoveDetector::new(value),
                Err(DataError::InvalidThreshold { .. })
            ));
        }
    }

    #[test]
    fn thresholds_above_hundred_are_allowed() {
        let events = detect(&make_series(&[10.0, 40.0]), 250.0).unwrap();
        assert_eq!(events.len(), 1);
        assert_relative_eq!(events[0].pct_change, 300.0);
    }

    #[test]
    fn detector_is_reusable_across_series() {
        let detector = BigMoveDetector::new(10.0).unwrap();
        assert_eq!(detector.threshold_pct(), 10.0);
        assert_eq!(detector.detect(&make_series(&[100.0, 111.0])).unwrap().len(), 1);
        assert!(detector.detect(&make_series(&[100.0, 101.0])).unwrap().is_empty());
    }

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Upside.to_string(), "Upside");
        assert_eq!(Direction::Downside.to_string(), "Downside");
    }
}
