use crate::error::Result;
use crate::scoring::options::ScoringOptions;
use crate::scoring::rating::RatingBand;
use crate::scoring::weights::PillarWeights;
use crate::types::answer::AnswerMap;
use crate::types::question::QuestionRecord;
use crate::types::report::ScoreReport;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Minimum spacing between two submitted assessments (six 30-day months).
pub const COOLDOWN_DAYS: i64 = 180;

/// A submitted assessment as persisted by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub sector: Option<String>,
    pub created_at: DateTime<Utc>,
    pub fingerprint: String,
    pub critical: bool,
    pub threshold: f64,
    pub answers: AnswerMap,
    pub report: ScoreReport,
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    questions: &'a [QuestionRecord],
    answers: &'a AnswerMap,
    sector: Option<&'a str>,
    treat_unknown_as_zero: bool,
    allow_partial: bool,
    critical_cap_no: f64,
    critical_cap_unknown: f64,
    pillar_weights: PillarWeights,
    bands: &'a [RatingBand],
}

/// SHA-256 over everything that influences the report. Equal fingerprints
/// mean re-scoring would reproduce the stored report.
pub fn fingerprint(
    questions: &[QuestionRecord],
    answers: &AnswerMap,
    options: &ScoringOptions,
) -> Result<String> {
    let input = FingerprintInput {
        questions,
        answers,
        sector: options.sector.as_deref(),
        treat_unknown_as_zero: options.treat_unknown_as_zero,
        allow_partial: options.allow_partial,
        critical_cap_no: options.critical_cap_no,
        critical_cap_unknown: options.critical_cap_unknown,
        pillar_weights: options.resolved_pillar_weights(),
        bands: options.rating_scale.bands(),
    };
    let bytes = serde_json::to_vec(&input)?;
    Ok(sha256_hex(&bytes))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// True while a new assessment is still blocked by the previous one.
pub fn is_cooldown_active(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(created_at) < Duration::days(COOLDOWN_DAYS)
}

pub fn write_record(path: &Path, record: &AssessmentRecord) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let rendered = serde_json::to_string_pretty(record)?;
    std::fs::write(path, rendered)?;
    Ok(())
}

pub fn read_record(path: &Path) -> Result<AssessmentRecord> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
