use crate::scoring::weights::SectorTable;
use crate::types::pillar::PillarMap;
use crate::types::report::ScoreReport;
use serde::{Deserialize, Serialize};

/// Average scores (0..=100) observed for a sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorBenchmark {
    pub sector: String,
    pub overall: u8,
    pub pillars: PillarMap<u8>,
}

/// Signed difference between a report and a benchmark; positive means the
/// assessment is above the sector average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkDelta {
    pub overall: i16,
    pub pillars: PillarMap<i16>,
}

pub fn default_benchmarks() -> Vec<SectorBenchmark> {
    let row = |sector: &str, overall, e, s, g| SectorBenchmark {
        sector: sector.to_string(),
        overall,
        pillars: PillarMap::new(e, s, g),
    };
    vec![
        row("Manufacturing", 51, 55, 46, 52),
        row("Agriculture/Food", 54, 60, 49, 43),
        row("Textile/Fashion", 48, 50, 45, 47),
        row("Tech", 63, 54, 66, 70),
        row("Finance", 66, 49, 62, 78),
        row("Construction", 52, 58, 45, 48),
        row("Furniture", 50, 56, 44, 47),
        row("Transportation", 47, 48, 45, 50),
    ]
}

/// Exact (case-insensitive) name match first, then any benchmark whose name
/// falls in the same sector family as `sector`.
pub fn find_benchmark<'a>(
    benchmarks: &'a [SectorBenchmark],
    table: &SectorTable,
    sector: &str,
) -> Option<&'a SectorBenchmark> {
    let wanted = sector.trim();
    if wanted.is_empty() {
        return None;
    }
    if let Some(exact) = benchmarks
        .iter()
        .find(|benchmark| benchmark.sector.eq_ignore_ascii_case(wanted))
    {
        return Some(exact);
    }
    let family = table.find(wanted)?;
    benchmarks
        .iter()
        .find(|benchmark| table.find(&benchmark.sector) == Some(family))
}

pub fn compare(report: &ScoreReport, benchmark: &SectorBenchmark) -> BenchmarkDelta {
    let diff = |ours: u8, theirs: u8| i16::from(ours) - i16::from(theirs);
    BenchmarkDelta {
        overall: diff(report.overall, benchmark.overall),
        pillars: report
            .pillars
            .map(|pillar, score| diff(*score, benchmark.pillars[pillar])),
    }
}
