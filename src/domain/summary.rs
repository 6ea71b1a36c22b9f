//! Read-only projections over a detected event list: counts and histogram.

use crate::domain::detector::{Direction, MoveEvent};

pub const DEFAULT_HISTOGRAM_BINS: usize = 20;
pub const MAX_HISTOGRAM_BINS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoveSummary {
    pub total: usize,
    pub upside: usize,
    pub downside: usize,
    /// Largest positive pct_change, if any upside move was seen.
    pub largest_gain: Option<f64>,
    /// Most negative pct_change, if any downside move was seen.
    pub largest_drop: Option<f64>,
}

impl MoveSummary {
    pub fn from_events(events: &[MoveEvent]) -> Self {
        let mut summary = MoveSummary {
            total: events.len(),
            ..Default::default()
        };

        for e in events {
            match e.direction {
                Direction::Upside => {
                    summary.upside += 1;
                    summary.largest_gain = Some(
                        summary
                            .largest_gain
                            .map_or(e.pct_change, |g| g.max(e.pct_change)),
                    );
                }
                Direction::Downside => {
                    summary.downside += 1;
                    summary.largest_drop = Some(
                        summary
                            .largest_drop
                            .map_or(e.pct_change, |d| d.min(e.pct_change)),
                    );
                }
            }
        }

        summary
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub upside: usize,
    pub downside: usize,
}

impl HistogramBin {
    pub fn total(&self) -> usize {
        self.upside + self.downside
    }
}

/// Equal-width histogram of pct_change, counted separately per direction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Bins span [min, max] of the observed pct_change. The maximum falls in
    /// the last bin. The bin count is clamped to `1..=MAX_HISTOGRAM_BINS`.
    pub fn build(events: &[MoveEvent], bins: usize) -> Self {
        if events.is_empty() {
            return Self::default();
        }

        let min = events
            .iter()
            .map(|e| e.pct_change)
            .fold(f64::INFINITY, f64::min);
        let max = events
            .iter()
            .map(|e| e.pct_change)
            .fold(f64::NEG_INFINITY, f64::max);

        let span = max - min;
        let bin_count = if span > 0.0 {
            bins.clamp(1, MAX_HISTOGRAM_BINS)
        } else {
            1
        };
        let width = if span > 0.0 {
            span / bin_count as f64
        } else {
            0.0
        };

        let mut out: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                lower: min + i as f64 * width,
                upper: if i + 1 == bin_count {
                    max
                } else {
                    min + (i + 1) as f64 * width
                },
                upside: 0,
                downside: 0,
            })
            .collect();

        for e in events {
            let idx = if width > 0.0 {
                (((e.pct_change - min) / width) as usize).min(bin_count - 1)
            } else {
                0
            };
            match e.direction {
                Direction::Upside => out[idx].upside += 1,
                Direction::Downside => out[idx].downside += 1,
            }
        }

        Self { bins: out }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(HistogramBin::total).sum()
    }

    /// Tallest bar, for chart scaling.
    pub fn max_bin_total(&self) -> usize {
        self.bins.iter().map(HistogramBin::total).max().unwrap_or(0)
    }
}
