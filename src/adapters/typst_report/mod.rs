//! Typst report generation.
//!
//! Reads a Typst template (either the built-in default or a custom file via
//! `template_path`), resolves all `{{PLACEHOLDER}}` markers by calling helpers
//! from `chart_svg` and `tables`, and writes the final `.typ` file.

pub mod chart_svg;
pub mod default_template;
pub mod tables;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::analysis::AnalysisReport;
use crate::domain::error::AnalyzerError;
use crate::ports::report_port::ReportPort;

fn embed_svg(svg: &str, fallback: &str) -> String {
    if svg.is_empty() {
        fallback.to_string()
    } else {
        format!(
            "#image.decode(\n\"{}\",\n  width: 100%,\n)",
            svg.replace('\\', "\\\\").replace('"', "\\\"")
        )
    }
}

/// Resolve all `{{PLACEHOLDER}}`s in the given template string and return
/// the final Typst markup ready to be written to a `.typ` file.
pub fn resolve(template: &str, report: &AnalysisReport) -> String {
    let mut output = template.to_string();

    output = output.replace("{{TITLE}}", &tables::render_title(report));
    output = output.replace(
        "{{ANALYSIS_SUMMARY}}",
        &tables::render_analysis_summary(report),
    );

    let price_svg = chart_svg::generate_price_svg(&report.series, &report.events);
    output = output.replace(
        "{{PRICE_CHART_SVG}}",
        &embed_svg(&price_svg, "_No price data._"),
    );

    output = output.replace("{{MOVES_TABLE}}", &tables::render_moves_table(&report.events));
    output = output.replace(
        "{{STATISTICS_TABLE}}",
        &tables::render_statistics_table(&report.summary),
    );

    let histogram_svg = chart_svg::generate_histogram_svg(&report.histogram);
    output = output.replace(
        "{{HISTOGRAM_SVG}}",
        &embed_svg(&histogram_svg, "_No big moves to chart._"),
    );

    output
}

/// Writes `.typ` reports, from the built-in template or a custom one.
#[derive(Default)]
pub struct TypstReportAdapter {
    template_path: Option<PathBuf>,
}

impl TypstReportAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(template_path: PathBuf) -> Self {
        Self {
            template_path: Some(template_path),
        }
    }

    fn load_template(&self) -> Result<String, AnalyzerError> {
        match &self.template_path {
            Some(path) => fs::read_to_string(path).map_err(|e| AnalyzerError::Report {
                reason: format!("failed to read template {}: {}", path.display(), e),
            }),
            None => Ok(default_template::template().to_string()),
        }
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(&self, report: &AnalysisReport, output_path: &Path) -> Result<(), AnalyzerError> {
        let template = self.load_template()?;
        let content = resolve(&template, report);

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, content)?;

        info!(path = %output_path.display(), "report written");
        Ok(())
    }
}
