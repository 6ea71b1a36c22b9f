//! Report generation port trait.

use std::path::Path;

use crate::domain::analysis::AnalysisReport;
use crate::domain::error::AnalyzerError;

/// Port for rendering an analysis to a file.
pub trait ReportPort {
    fn write(&self, report: &AnalysisReport, output_path: &Path) -> Result<(), AnalyzerError>;
}
