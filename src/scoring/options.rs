use crate::error::EsgError;
use crate::scoring::rating::RatingScale;
use crate::scoring::weights::{PillarWeights, SectorTable};
use crate::types::answer::AnswerPolicy;

pub const DEFAULT_CRITICAL_CAP_NO: f64 = 0.40;
pub const DEFAULT_CRITICAL_CAP_UNKNOWN: f64 = 0.60;

/// Every knob of a scoring run, resolved once per call.
///
/// | field | default |
/// |---|---|
/// | `sector` | none (fallback weights) |
/// | `treat_unknown_as_zero` | `false` |
/// | `allow_partial` | `false` |
/// | `critical_cap_no` | `0.40` |
/// | `critical_cap_unknown` | `0.60` |
/// | `pillar_weights_override` | none |
/// | `sector_table` | built-in sector families |
/// | `rating_scale` | AAA (85) down to B (35), else CCC |
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringOptions {
    pub sector: Option<String>,
    pub treat_unknown_as_zero: bool,
    pub allow_partial: bool,
    pub critical_cap_no: f64,
    pub critical_cap_unknown: f64,
    /// Bypasses the sector lookup when set.
    pub pillar_weights_override: Option<PillarWeights>,
    pub sector_table: SectorTable,
    pub rating_scale: RatingScale,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            sector: None,
            treat_unknown_as_zero: false,
            allow_partial: false,
            critical_cap_no: DEFAULT_CRITICAL_CAP_NO,
            critical_cap_unknown: DEFAULT_CRITICAL_CAP_UNKNOWN,
            pillar_weights_override: None,
            sector_table: SectorTable::default(),
            rating_scale: RatingScale::default(),
        }
    }
}

impl ScoringOptions {
    pub fn for_sector(sector: impl Into<String>) -> Self {
        Self {
            sector: Some(sector.into()),
            ..Self::default()
        }
    }

    pub fn answer_policy(&self) -> AnswerPolicy {
        AnswerPolicy {
            allow_partial: self.allow_partial,
            treat_unknown_as_zero: self.treat_unknown_as_zero,
        }
    }

    /// Rejects cap combinations a caller assembled from several sources.
    /// [`score_assessment`](crate::scoring::score_assessment) itself tolerates
    /// any values.
    pub fn validate(&self) -> Result<(), EsgError> {
        if self.critical_cap_unknown < self.critical_cap_no {
            return Err(EsgError::InvalidOptions(format!(
                "critical_cap_unknown ({:.2}) must not be below critical_cap_no ({:.2})",
                self.critical_cap_unknown, self.critical_cap_no
            )));
        }
        Ok(())
    }

    /// Normalized E/S/G weights: override, else sector lookup, else fallback.
    pub fn resolved_pillar_weights(&self) -> PillarWeights {
        self.pillar_weights_override
            .unwrap_or_else(|| self.sector_table.lookup(self.sector.as_deref()))
            .normalized()
    }
}
