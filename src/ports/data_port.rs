//! Price series source port trait.

use crate::domain::error::AnalyzerError;
use crate::domain::price::PricePoint;
use crate::domain::series::{self, SeriesRange};

/// Supplies a parsed daily series for a ticker, already sorted ascending by date.
pub trait DataPort {
    fn fetch_series(&self, ticker: &str) -> Result<Vec<PricePoint>, AnalyzerError>;

    fn get_data_range(&self, ticker: &str) -> Result<Option<SeriesRange>, AnalyzerError> {
        let points = self.fetch_series(ticker)?;
        Ok(series::range(&points))
    }
}
