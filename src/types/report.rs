use crate::scoring::rating::Rating;
use crate::scoring::weights::PillarWeights;
use crate::types::pillar::PillarMap;
use serde::{Deserialize, Serialize};

/// Why a pillar score was held under its uncapped value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CapReason {
    /// A critical question was answered "No" (or maturity 0).
    CriticalNo { count: usize },
    /// A critical question was left unanswered.
    CriticalUnanswered { count: usize },
}

impl CapReason {
    pub fn describe(&self) -> String {
        match self {
            Self::CriticalNo { count } => format!("Critical \"No\" on {count} item(s)"),
            Self::CriticalUnanswered { count } => {
                format!("Critical unanswered on {count} item(s)")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarDetail {
    pub score: u8,
    pub capped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_reason: Option<CapReason>,
    /// Number of answered questions aggregated into the pillar.
    pub n: usize,
    /// Sum of effective weights of the answered questions, rounded to 2 places.
    pub w_sum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetails {
    pub pillar: PillarMap<PillarDetail>,
    pub sector_pillar_weights: PillarWeights,
    pub unanswered: Vec<String>,
    pub critical_hits: PillarMap<Vec<String>>,
    pub critical_unknowns: PillarMap<Vec<String>>,
}

/// Output of a scoring run. Recomputed whenever questions or answers change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub overall: u8,
    pub rating: Rating,
    pub pillars: PillarMap<u8>,
    pub details: ReportDetails,
}

impl ScoreReport {
    /// Pillar scores on the `[0, 1]` scale.
    pub fn pillar_fractions(&self) -> PillarMap<f64> {
        self.pillars.map(|_, score| f64::from(*score) / 100.0)
    }
}
