#![allow(dead_code)]

use bigmove::domain::analysis::AnalysisReport;
use bigmove::domain::error::AnalyzerError;
pub use bigmove::domain::price::PricePoint;
use bigmove::ports::data_port::DataPort;
use bigmove::ports::report_port::ReportPort;
use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
    pub fetches: Cell<usize>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            fetches: Cell::new(0),
        }
    }

    pub fn with_series(mut self, ticker: &str, series: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), series);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(&self, ticker: &str) -> Result<Vec<PricePoint>, AnalyzerError> {
        self.fetches.set(self.fetches.get() + 1);
        if let Some(reason) = self.errors.get(ticker) {
            return Err(AnalyzerError::Source {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(ticker).cloned().unwrap_or_default())
    }
}

/// Records every report handed to it instead of writing files.
#[derive(Default)]
pub struct CapturingReportPort {
    pub written: RefCell<Vec<(String, usize, PathBuf)>>,
}

impl ReportPort for CapturingReportPort {
    fn write(&self, report: &AnalysisReport, output_path: &Path) -> Result<(), AnalyzerError> {
        self.written.borrow_mut().push((
            report.ticker.clone(),
            report.events.len(),
            output_path.to_path_buf(),
        ));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_point(date: &str, close: f64) -> PricePoint {
    PricePoint::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), close)
}

/// Consecutive calendar days starting at `start`, one point per close.
pub fn make_series(start: &str, closes: &[f64]) -> Vec<PricePoint> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint::new(start + chrono::Duration::days(i as i64), close))
        .collect()
}

pub fn series_csv(series: &[PricePoint]) -> String {
    let mut out = String::from("Date,Close\n");
    for p in series {
        out.push_str(&format!("{},{}\n", p.date.format("%Y-%m-%d"), p.close));
    }
    out
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
