//! Configuration validation.
//!
//! Keys are optional; a key that is present must hold a usable value.

use crate::domain::error::AnalyzerError;
use crate::domain::summary::MAX_HISTOGRAM_BINS;
use crate::ports::config_port::ConfigPort;

/// Upper bound on `(to - from) / step` for a threshold sweep.
pub const MAX_SWEEP_STEPS: usize = 10_000;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    validate_data_config(config)?;
    validate_analysis_config(config)?;
    validate_sweep_config(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    for key in ["date_column", "close_column"] {
        if let Some(value) = config.get_string("data", key) {
            if value.trim().is_empty() {
                return Err(invalid("data", key, "column name must not be empty"));
            }
        }
    }
    if let Some(capacity) = optional_integer(config, "data", "cache_capacity")? {
        if capacity < 1 {
            return Err(invalid(
                "data",
                "cache_capacity",
                "cache_capacity must be a positive integer",
            ));
        }
    }
    Ok(())
}

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    if let Some(ticker) = config.get_string("analysis", "ticker") {
        if ticker.trim().is_empty() {
            return Err(invalid("analysis", "ticker", "ticker must not be empty"));
        }
    }
    if let Some(threshold) = optional_number(config, "analysis", "threshold")? {
        if threshold <= 0.0 {
            return Err(invalid(
                "analysis",
                "threshold",
                "threshold must be a positive percentage",
            ));
        }
    }
    if let Some(bins) = optional_integer(config, "analysis", "histogram_bins")? {
        if bins < 1 || bins > MAX_HISTOGRAM_BINS as i64 {
            return Err(invalid(
                "analysis",
                "histogram_bins",
                &format!("histogram_bins must be between 1 and {MAX_HISTOGRAM_BINS}"),
            ));
        }
    }
    Ok(())
}

pub fn validate_sweep_config(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    let from = optional_number(config, "sweep", "from")?;
    let to = optional_number(config, "sweep", "to")?;
    let step = optional_number(config, "sweep", "step")?;

    if let Some(from) = from {
        if from <= 0.0 {
            return Err(invalid("sweep", "from", "from must be positive"));
        }
    }
    if let Some(step) = step {
        if step <= 0.0 {
            return Err(invalid("sweep", "step", "step must be positive"));
        }
    }
    if let (Some(from), Some(to)) = (from, to) {
        if to < from {
            return Err(invalid("sweep", "to", "to must not be less than from"));
        }
        if let Some(step) = step {
            check_sweep_steps(from, to, step)?;
        }
    }
    Ok(())
}

/// Checks a sweep range supplied directly (CLI flags override config).
pub fn validate_sweep_range(from: f64, to: f64, step: f64) -> Result<(), AnalyzerError> {
    if !from.is_finite() || from <= 0.0 {
        return Err(invalid("sweep", "from", "from must be positive"));
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(invalid("sweep", "step", "step must be positive"));
    }
    if !to.is_finite() || to < from {
        return Err(invalid("sweep", "to", "to must not be less than from"));
    }
    check_sweep_steps(from, to, step)
}

fn check_sweep_steps(from: f64, to: f64, step: f64) -> Result<(), AnalyzerError> {
    let steps = (to - from) / step;
    if steps.is_nan() || steps > MAX_SWEEP_STEPS as f64 {
        return Err(invalid(
            "sweep",
            "step",
            &format!("range covers more than {MAX_SWEEP_STEPS} steps"),
        ));
    }
    Ok(())
}

/// Parsed the same way `ConfigPort::get_int` parses, so a value that passes
/// here is never replaced by a default later.
fn optional_integer(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<i64>, AnalyzerError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|_| invalid(section, key, &format!("'{raw}' is not an integer")))
}

fn optional_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, AnalyzerError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(None);
    };
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, &format!("'{raw}' is not a number")))?;
    if !value.is_finite() {
        return Err(invalid(section, key, "value must be finite"));
    }
    Ok(Some(value))
}

fn invalid(section: &str, key: &str, reason: &str) -> AnalyzerError {
    AnalyzerError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
