//! One detection run plus the projections the report renders.

use crate::domain::detector::{BigMoveDetector, MoveEvent};
use crate::domain::error::DataError;
use crate::domain::price::PricePoint;
use crate::domain::series::{self, SeriesRange};
use crate::domain::summary::{Histogram, MoveSummary};

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub ticker: String,
    pub threshold_pct: f64,
    pub series: Vec<PricePoint>,
    pub events: Vec<MoveEvent>,
    pub summary: MoveSummary,
    pub histogram: Histogram,
}

impl AnalysisReport {
    pub fn range(&self) -> Option<SeriesRange> {
        series::range(&self.series)
    }
}

pub fn analyze(
    ticker: &str,
    series: &[PricePoint],
    threshold_pct: f64,
    histogram_bins: usize,
) -> Result<AnalysisReport, DataError> {
    let detector = BigMoveDetector::new(threshold_pct)?;
    let events = detector.detect(series)?;
    let summary = MoveSummary::from_events(&events);
    let histogram = Histogram::build(&events, histogram_bins);

    Ok(AnalysisReport {
        ticker: ticker.to_string(),
        threshold_pct,
        series: series.to_vec(),
        events,
        summary,
        histogram,
    })
}
