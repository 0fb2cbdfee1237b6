pub mod json;
pub mod md;

use crate::benchmark::{BenchmarkDelta, SectorBenchmark};
use crate::error::EsgError;
use crate::types::pillar::Pillar;
use crate::types::report::ScoreReport;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

/// Everything a renderer may show alongside the score report.
#[derive(Debug, Clone)]
pub struct ReportView<'a> {
    pub sector: Option<&'a str>,
    pub report: &'a ScoreReport,
    pub benchmark: Option<(&'a SectorBenchmark, BenchmarkDelta)>,
    pub critical_pillars: Vec<Pillar>,
    pub threshold: f64,
}

pub fn render(view: &ReportView<'_>, format: OutputFormat) -> Result<String, EsgError> {
    match format {
        OutputFormat::Json => json::to_json(view.report).map_err(EsgError::Json),
        OutputFormat::Md => Ok(md::to_markdown(view)),
    }
}
