//! CSV price source and event export.
//!
//! Input files need a header row with a date column and a closing-price
//! column (matched by name, case-insensitive). Other columns are ignored.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::adapters::series_cache::SeriesCache;
use crate::domain::detector::MoveEvent;
use crate::domain::error::AnalyzerError;
use crate::domain::price::PricePoint;
use crate::domain::series::sort_by_date;
use crate::ports::data_port::DataPort;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, PartialEq)]
pub struct CsvColumns {
    pub date: String,
    pub close: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            close: "Close".to_string(),
        }
    }
}

enum Location {
    /// `<dir>/<TICKER>.csv`, falling back to `<dir>/<TICKER>_sample.csv`.
    Directory(PathBuf),
    /// One file serves every ticker.
    File(PathBuf),
}

pub struct CsvAdapter {
    location: Location,
    columns: CsvColumns,
    cache: RefCell<SeriesCache>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            location: Location::Directory(base_path),
            columns: CsvColumns::default(),
            cache: RefCell::new(SeriesCache::default()),
        }
    }

    pub fn from_file(path: PathBuf) -> Self {
        Self {
            location: Location::File(path),
            columns: CsvColumns::default(),
            cache: RefCell::new(SeriesCache::default()),
        }
    }

    pub fn with_columns(mut self, columns: CsvColumns) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = RefCell::new(SeriesCache::new(capacity));
        self
    }

    /// Drop every cached series so the next fetch re-reads and re-parses.
    pub fn invalidate_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    pub fn cached_series(&self) -> usize {
        self.cache.borrow().len()
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        match &self.location {
            Location::File(path) => path.clone(),
            Location::Directory(dir) => {
                let primary = dir.join(format!("{}.csv", ticker));
                if primary.exists() {
                    primary
                } else {
                    dir.join(format!("{}_sample.csv", ticker))
                }
            }
        }
    }
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self, ticker: &str) -> Result<Vec<PricePoint>, AnalyzerError> {
        let path = self.csv_path(ticker);
        let content = fs::read(&path).map_err(|e| AnalyzerError::Source {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let series = self
            .cache
            .borrow_mut()
            .get_or_try_insert(&content, |bytes| parse_series(bytes, &self.columns))?;

        info!(
            ticker,
            path = %path.display(),
            rows = series.len(),
            "loaded price series"
        );
        Ok(series)
    }
}

/// Parse CSV bytes into a series sorted ascending by date.
pub fn parse_series(content: &[u8], columns: &CsvColumns) -> Result<Vec<PricePoint>, AnalyzerError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers = rdr.headers().map_err(|e| AnalyzerError::Source {
        reason: format!("CSV header error: {}", e),
    })?;
    let date_idx = column_index(headers, &columns.date)?;
    let close_idx = column_index(headers, &columns.close)?;

    let mut series = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| AnalyzerError::Source {
            reason: format!("CSV parse error: {}", e),
        })?;

        let date_str = record
            .get(date_idx)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AnalyzerError::Source {
                reason: format!("missing {} value in row {}", columns.date, row),
            })?;
        let date = parse_date(date_str).ok_or_else(|| AnalyzerError::Source {
            reason: format!("invalid date '{}' in row {}", date_str, row),
        })?;

        let close: f64 = record
            .get(close_idx)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AnalyzerError::Source {
                reason: format!("missing {} value in row {}", columns.close, row),
            })?
            .parse()
            .map_err(|e| AnalyzerError::Source {
                reason: format!("invalid {} value in row {}: {}", columns.close, row, e),
            })?;

        series.push(PricePoint::new(date, close));
    }

    sort_by_date(&mut series);
    debug!(rows = series.len(), "parsed CSV price series");
    Ok(series)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, AnalyzerError> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| AnalyzerError::Source {
            reason: format!("missing {} column", name),
        })
}

/// Accepts plain dates, date-times and RFC 3339 timestamps; the time of day
/// is dropped.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Write detected events as `Date,Price,PctChange,Type`.
pub fn write_events(path: &Path, events: &[MoveEvent]) -> Result<(), AnalyzerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let report_err = |e: csv::Error| AnalyzerError::Report {
        reason: format!("failed to write {}: {}", path.display(), e),
    };

    let mut wtr = csv::Writer::from_path(path).map_err(report_err)?;
    wtr.write_record(["Date", "Price", "PctChange", "Type"])
        .map_err(report_err)?;
    for e in events {
        wtr.write_record([
            e.date.format("%Y-%m-%d").to_string(),
            e.price.to_string(),
            e.pct_change.to_string(),
            e.direction.to_string(),
        ])
        .map_err(report_err)?;
    }
    wtr.flush()?;

    info!(path = %path.display(), events = events.len(), "wrote big moves CSV");
    Ok(())
}
