//! Domain error types.

use chrono::NaiveDate;

/// Malformed or inconsistent input handed to the detector.
///
/// Never retried; the caller decides whether to abort or to clean the
/// series and try again.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    #[error("non-positive price {close} on {date} (row {index}) makes the next percent change undefined")]
    NonPositivePrice {
        index: usize,
        date: NaiveDate,
        close: f64,
    },

    #[error("non-finite price on {date} (row {index})")]
    NonFinitePrice { index: usize, date: NaiveDate },

    #[error("percent change on {date} (row {index}) overflows")]
    UnrepresentableChange { index: usize, date: NaiveDate },

    #[error("series not sorted by date: row {index} ({current}) comes after {previous}")]
    Unsorted {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("threshold must be a finite positive percentage, got {value}")]
    InvalidThreshold { value: f64 },
}

/// Top-level error type for bigmove.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("price source error: {reason}")]
    Source { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AnalyzerError {
    /// Process exit status for this error category.
    pub fn exit_code(&self) -> u8 {
        match self {
            AnalyzerError::Io(_) | AnalyzerError::Report { .. } => 1,
            AnalyzerError::ConfigParse { .. }
            | AnalyzerError::ConfigInvalid { .. } => 2,
            AnalyzerError::Source { .. } => 3,
            AnalyzerError::Data(_) => 4,
        }
    }
}

impl From<&AnalyzerError> for std::process::ExitCode {
    fn from(err: &AnalyzerError) -> Self {
        std::process::ExitCode::from(err.exit_code())
    }
}
