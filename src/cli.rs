//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};

use crate::adapters::csv_adapter::{self, CsvAdapter, CsvColumns};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::series_cache::DEFAULT_CAPACITY;
use crate::adapters::typst_report::TypstReportAdapter;
use crate::domain::analysis::{analyze, AnalysisReport};
use crate::domain::config_validation::{validate_config, validate_sweep_range, MAX_SWEEP_STEPS};
use crate::domain::detector::BigMoveDetector;
use crate::domain::error::AnalyzerError;
use crate::domain::summary::{MoveSummary, DEFAULT_HISTOGRAM_BINS, MAX_HISTOGRAM_BINS};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_TICKER: &str = "AAPL";
pub const DEFAULT_THRESHOLD: f64 = 15.0;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OUTPUT: &str = "report.typ";
pub const DEFAULT_SWEEP_FROM: f64 = 5.0;
pub const DEFAULT_SWEEP_TO: f64 = 50.0;
pub const DEFAULT_SWEEP_STEP: f64 = 1.0;

#[derive(Parser, Debug)]
#[command(name = "bigmove", about = "Flag big day-over-day moves in daily closing prices")]
pub struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every command that loads a series.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// INI configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// CSV file with Date and Close columns
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Ticker symbol used for titles and data lookup
    #[arg(long)]
    pub ticker: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect big moves and write a report
    Analyze {
        #[command(flatten)]
        source: SourceArgs,
        /// Minimum absolute percent change to flag
        #[arg(short, long)]
        threshold: Option<f64>,
        /// Report output path (.typ)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write detected moves as CSV
        #[arg(long)]
        events_csv: Option<PathBuf>,
    },
    /// Count big moves over a range of thresholds
    Sweep {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        from: Option<f64>,
        #[arg(long)]
        to: Option<f64>,
        #[arg(long)]
        step: Option<f64>,
    },
    /// Show the date range and price bounds of a series
    Info {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Everything `analyze` needs, after merging config file and CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub ticker: String,
    pub input: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub columns: CsvColumns,
    pub cache_capacity: usize,
    pub threshold_pct: f64,
    pub histogram_bins: usize,
    pub output: PathBuf,
    pub template_path: Option<PathBuf>,
    pub events_csv: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepRow {
    pub threshold_pct: f64,
    pub summary: MoveSummary,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze {
            source,
            threshold,
            output,
            events_csv,
        } => run_analyze(&source, threshold, output, events_csv),
        Command::Sweep {
            source,
            from,
            to,
            step,
        } => run_sweep_command(&source, from, to, step),
        Command::Info { source } => run_info(&source),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, AnalyzerError> {
    let Some(path) = path else {
        return Ok(FileConfigAdapter::empty());
    };
    info!(path = %path.display(), "loading config");
    let adapter = FileConfigAdapter::from_file(path).map_err(|e| AnalyzerError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })?;
    validate_config(&adapter)?;
    Ok(adapter)
}

fn config_path(config: &dyn ConfigPort, section: &str, key: &str) -> Option<PathBuf> {
    if !config.has_key(section, key) {
        return None;
    }
    config
        .get_string(section, key)
        .map(|s| PathBuf::from(s.trim()))
}

pub fn resolve_ticker(ticker_override: Option<&str>, config: &dyn ConfigPort) -> String {
    ticker_override
        .map(str::to_string)
        .or_else(|| config.get_string("analysis", "ticker"))
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TICKER.to_string())
}

pub fn build_analysis_settings(
    config: &dyn ConfigPort,
    source: &SourceArgs,
    threshold: Option<f64>,
    output: Option<PathBuf>,
    events_csv: Option<PathBuf>,
) -> Result<AnalysisSettings, AnalyzerError> {
    let columns = CsvColumns {
        date: config
            .get_string("data", "date_column")
            .unwrap_or_else(|| CsvColumns::default().date),
        close: config
            .get_string("data", "close_column")
            .unwrap_or_else(|| CsvColumns::default().close),
    };

    let threshold_pct =
        threshold.unwrap_or_else(|| config.get_double("analysis", "threshold", DEFAULT_THRESHOLD));
    // Fail before any file is touched.
    BigMoveDetector::new(threshold_pct)?;

    let histogram_bins = config.get_int("analysis", "histogram_bins", DEFAULT_HISTOGRAM_BINS as i64);
    let cache_capacity = config.get_int("data", "cache_capacity", DEFAULT_CAPACITY as i64);

    Ok(AnalysisSettings {
        ticker: resolve_ticker(source.ticker.as_deref(), config),
        input: source
            .input
            .clone()
            .or_else(|| config_path(config, "data", "input")),
        data_dir: config_path(config, "data", "dir").unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        columns,
        cache_capacity: cache_capacity.max(1) as usize,
        threshold_pct,
        histogram_bins: histogram_bins.clamp(1, MAX_HISTOGRAM_BINS as i64) as usize,
        output: output
            .or_else(|| config_path(config, "report", "output"))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        template_path: config_path(config, "report", "template_path"),
        events_csv: events_csv.or_else(|| config_path(config, "report", "events_csv")),
    })
}

pub fn build_data_port(settings: &AnalysisSettings) -> CsvAdapter {
    let adapter = match &settings.input {
        Some(path) => CsvAdapter::from_file(path.clone()),
        None => CsvAdapter::new(settings.data_dir.clone()),
    };
    adapter
        .with_columns(settings.columns.clone())
        .with_cache_capacity(settings.cache_capacity)
}

/// Load, detect, render. Writes the report and the optional events CSV.
pub fn run_analysis_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    settings: &AnalysisSettings,
) -> Result<AnalysisReport, AnalyzerError> {
    let series = data_port.fetch_series(&settings.ticker)?;
    if series.len() < 2 {
        warn!(
            ticker = %settings.ticker,
            rows = series.len(),
            "series too short for any comparison"
        );
    }

    info!(
        ticker = %settings.ticker,
        threshold = settings.threshold_pct,
        "detecting big moves"
    );
    let report = analyze(
        &settings.ticker,
        &series,
        settings.threshold_pct,
        settings.histogram_bins,
    )?;
    debug!(events = report.events.len(), "detection finished");

    report_port.write(&report, &settings.output)?;
    if let Some(path) = &settings.events_csv {
        csv_adapter::write_events(path, &report.events)?;
    }

    Ok(report)
}

fn run_analyze(
    source: &SourceArgs,
    threshold: Option<f64>,
    output: Option<PathBuf>,
    events_csv: Option<PathBuf>,
) -> Result<(), AnalyzerError> {
    let config = load_config(source.config.as_deref())?;
    let settings = build_analysis_settings(&config, source, threshold, output, events_csv)?;

    let data_port = build_data_port(&settings);
    let report_port = match &settings.template_path {
        Some(path) => TypstReportAdapter::with_template(path.clone()),
        None => TypstReportAdapter::new(),
    };

    let report = run_analysis_pipeline(&data_port, &report_port, &settings)?;
    print_summary(&report);
    eprintln!("\nReport written to: {}", settings.output.display());
    Ok(())
}

pub fn print_summary(report: &AnalysisReport) {
    let s = &report.summary;
    eprintln!("\n=== Big Moves for {} ===", report.ticker);
    eprintln!("Threshold:        {:.2}%", report.threshold_pct);
    if let Some(range) = report.range() {
        eprintln!(
            "Data:             {} days, {} to {}",
            range.count, range.first, range.last
        );
    }
    eprintln!("Total Big Moves:  {}", s.total);
    eprintln!("Upside Moves:     {}", s.upside);
    eprintln!("Downside Moves:   {}", s.downside);
    if let Some(gain) = s.largest_gain {
        eprintln!("Largest Gain:     {:+.2}%", gain);
    }
    if let Some(drop) = s.largest_drop {
        eprintln!("Largest Drop:     {:+.2}%", drop);
    }
}

/// Thresholds from..=to in `step` increments, computed by index so that
/// rounding does not accumulate. Never yields more than `MAX_SWEEP_STEPS + 1`
/// values.
pub fn sweep_thresholds(from: f64, to: f64, step: f64) -> Vec<f64> {
    let raw = ((to - from) / step + 1e-9).floor();
    let steps = if raw.is_nan() {
        0
    } else {
        raw.clamp(0.0, MAX_SWEEP_STEPS as f64) as usize
    };
    (0..=steps).map(|i| from + i as f64 * step).collect()
}

/// Re-run detection for each threshold. The series is fetched through the
/// data port on every step, so a caching port parses it only once.
pub fn run_sweep(
    data_port: &dyn DataPort,
    ticker: &str,
    thresholds: &[f64],
) -> Result<Vec<SweepRow>, AnalyzerError> {
    let mut rows = Vec::with_capacity(thresholds.len());
    for &threshold_pct in thresholds {
        let series = data_port.fetch_series(ticker)?;
        let events = BigMoveDetector::new(threshold_pct)?.detect(&series)?;
        rows.push(SweepRow {
            threshold_pct,
            summary: MoveSummary::from_events(&events),
        });
    }
    Ok(rows)
}

pub fn format_sweep_table(rows: &[SweepRow]) -> String {
    let mut out = String::from("threshold_pct,total,upside,downside\n");
    for row in rows {
        out.push_str(&format!(
            "{:.2},{},{},{}\n",
            row.threshold_pct, row.summary.total, row.summary.upside, row.summary.downside
        ));
    }
    out
}

fn run_sweep_command(
    source: &SourceArgs,
    from: Option<f64>,
    to: Option<f64>,
    step: Option<f64>,
) -> Result<(), AnalyzerError> {
    let config = load_config(source.config.as_deref())?;
    let settings = build_analysis_settings(&config, source, None, None, None)?;

    let from = from.unwrap_or_else(|| config.get_double("sweep", "from", DEFAULT_SWEEP_FROM));
    let to = to.unwrap_or_else(|| config.get_double("sweep", "to", DEFAULT_SWEEP_TO));
    let step = step.unwrap_or_else(|| config.get_double("sweep", "step", DEFAULT_SWEEP_STEP));
    validate_sweep_range(from, to, step)?;

    let thresholds = sweep_thresholds(from, to, step);
    info!(
        ticker = %settings.ticker,
        from, to, step,
        steps = thresholds.len(),
        "running threshold sweep"
    );

    let data_port = build_data_port(&settings);
    let rows = run_sweep(&data_port, &settings.ticker, &thresholds)?;
    debug!(cached = data_port.cached_series(), "sweep finished");

    print!("{}", format_sweep_table(&rows));
    Ok(())
}

fn run_info(source: &SourceArgs) -> Result<(), AnalyzerError> {
    let config = load_config(source.config.as_deref())?;
    let settings = build_analysis_settings(&config, source, None, None, None)?;
    let data_port = build_data_port(&settings);

    match data_port.get_data_range(&settings.ticker)? {
        Some(range) => println!(
            "{}: {} days, {} to {}, close {:.2} to {:.2}",
            settings.ticker, range.count, range.first, range.last, range.min_close, range.max_close
        ),
        None => eprintln!("{}: no data found", settings.ticker),
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), AnalyzerError> {
    load_config(Some(config_path))?;
    eprintln!("Configuration is valid.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cli_parses_analyze_flags() {
        let cli = Cli::try_parse_from([
            "bigmove",
            "-v",
            "analyze",
            "--input",
            "data/AAPL_sample.csv",
            "--threshold",
            "12.5",
            "--ticker",
            "aapl",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Analyze {
                source, threshold, ..
            } => {
                assert_eq!(source.input, Some(PathBuf::from("data/AAPL_sample.csv")));
                assert_eq!(source.ticker.as_deref(), Some("aapl"));
                assert_eq!(threshold, Some(12.5));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_validate_requires_config() {
        assert!(Cli::try_parse_from(["bigmove", "validate"]).is_err());
    }

    #[test]
    fn resolve_ticker_precedence() {
        let config = FileConfigAdapter::from_string("[analysis]\nticker = msft\n").unwrap();
        assert_eq!(resolve_ticker(Some("tsla"), &config), "TSLA");
        assert_eq!(resolve_ticker(None, &config), "MSFT");
        assert_eq!(resolve_ticker(None, &FileConfigAdapter::empty()), "AAPL");
    }

    #[test]
    fn settings_defaults() {
        let settings = build_analysis_settings(
            &FileConfigAdapter::empty(),
            &SourceArgs::default(),
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(settings.ticker, "AAPL");
        assert_eq!(settings.threshold_pct, 15.0);
        assert_eq!(settings.histogram_bins, 20);
        assert_eq!(settings.input, None);
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert_eq!(settings.output, PathBuf::from("report.typ"));
        assert_eq!(settings.columns, CsvColumns::default());
        assert_eq!(settings.events_csv, None);
    }

    #[test]
    fn settings_flags_override_config() {
        let config = FileConfigAdapter::from_string(
            "[analysis]\nthreshold = 20\n[report]\noutput = from_config.typ\n",
        )
        .unwrap();
        let source = SourceArgs {
            config: None,
            input: Some(PathBuf::from("x.csv")),
            ticker: None,
        };
        let settings =
            build_analysis_settings(&config, &source, Some(7.5), Some("cli.typ".into()), None)
                .unwrap();
        assert_eq!(settings.threshold_pct, 7.5);
        assert_eq!(settings.output, PathBuf::from("cli.typ"));
        assert_eq!(settings.input, Some(PathBuf::from("x.csv")));
    }

    #[test]
    fn settings_reject_bad_threshold_flag() {
        let err = build_analysis_settings(
            &FileConfigAdapter::empty(),
            &SourceArgs::default(),
            Some(-1.0),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, AnalyzerError::Data(_)));
    }

    #[test]
    fn sweep_thresholds_inclusive() {
        let t = sweep_thresholds(5.0, 50.0, 1.0);
        assert_eq!(t.len(), 46);
        assert_eq!(t[0], 5.0);
        assert_eq!(t[45], 50.0);

        let t = sweep_thresholds(0.1, 0.3, 0.1);
        assert_eq!(t.len(), 3);
        assert_relative_eq!(t[2], 0.3, epsilon = 1e-12);

        assert_eq!(sweep_thresholds(10.0, 10.0, 5.0), vec![10.0]);
    }

    #[test]
    fn sweep_thresholds_bounded_for_huge_ranges() {
        let t = sweep_thresholds(1.0, 1e300, 1e-300);
        assert_eq!(t.len(), MAX_SWEEP_STEPS + 1);
    }

    #[test]
    fn sweep_table_format() {
        let rows = vec![SweepRow {
            threshold_pct: 5.0,
            summary: MoveSummary {
                total: 3,
                upside: 2,
                downside: 1,
                largest_gain: Some(9.0),
                largest_drop: Some(-6.0),
            },
        }];
        assert_eq!(
            format_sweep_table(&rows),
            "threshold_pct,total,upside,downside\n5.00,3,2,1\n"
        );
    }
}
