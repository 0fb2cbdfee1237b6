use crate::error::EsgError;
use crate::scoring::critical::DEFAULT_CRITICAL_THRESHOLD;
use crate::scoring::options::ScoringOptions;
use crate::scoring::rating::{Rating, RatingBand, RatingScale};
use crate::scoring::weights::{PillarWeights, SectorRule, SectorTable};
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EsgConfig {
    pub scoring: Option<ScoringConfig>,
    pub weights: Option<WeightsConfig>,
    #[serde(default)]
    pub sectors: Vec<SectorConfig>,
    #[serde(default)]
    pub bands: Vec<BandConfig>,
    pub telemetry: Option<TelemetryConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringConfig {
    pub sector: Option<String>,
    pub treat_unknown_as_zero: Option<bool>,
    pub allow_partial: Option<bool>,
    pub critical_cap_no: Option<f64>,
    pub critical_cap_unknown: Option<f64>,
    pub critical_threshold: Option<f64>,
}

/// Pillar weight override. A missing component counts as 1 before
/// normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeightsConfig {
    #[serde(rename = "E")]
    pub e: Option<f64>,
    #[serde(rename = "S")]
    pub s: Option<f64>,
    #[serde(rename = "G")]
    pub g: Option<f64>,
}

impl WeightsConfig {
    pub fn to_weights(&self) -> PillarWeights {
        PillarWeights::new(
            self.e.unwrap_or(1.0),
            self.s.unwrap_or(1.0),
            self.g.unwrap_or(1.0),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectorConfig {
    pub name: String,
    pub keywords: Vec<String>,
    #[serde(rename = "E")]
    pub e: f64,
    #[serde(rename = "S")]
    pub s: f64,
    #[serde(rename = "G")]
    pub g: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BandConfig {
    pub rating: String,
    pub min: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: Option<String>,
}

impl EsgConfig {
    pub fn critical_threshold(&self) -> f64 {
        self.scoring
            .as_ref()
            .and_then(|scoring| scoring.critical_threshold)
            .unwrap_or(DEFAULT_CRITICAL_THRESHOLD)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.telemetry
            .as_ref()
            .and_then(|telemetry| telemetry.log_level.as_deref())
    }

    /// Scoring options with every configured value applied over the defaults.
    /// Call [`EsgConfig::validate`] first.
    pub fn scoring_options(&self) -> ScoringOptions {
        let defaults = ScoringOptions::default();
        let scoring = self.scoring.clone().unwrap_or_default();

        let sector_table = if self.sectors.is_empty() {
            defaults.sector_table.clone()
        } else {
            SectorTable::new(
                self.sectors
                    .iter()
                    .map(|sector| SectorRule {
                        name: sector.name.clone(),
                        keywords: sector.keywords.iter().map(|k| k.to_lowercase()).collect(),
                        weights: PillarWeights::new(sector.e, sector.s, sector.g),
                    })
                    .collect(),
            )
        };

        let rating_scale = if self.bands.is_empty() {
            defaults.rating_scale.clone()
        } else {
            let bands = self
                .bands
                .iter()
                .filter_map(|band| {
                    band.rating
                        .parse::<Rating>()
                        .ok()
                        .map(|rating| RatingBand {
                            rating,
                            min: band.min,
                        })
                })
                .collect();
            RatingScale::new(bands, Rating::Ccc)
        };

        ScoringOptions {
            sector: scoring.sector,
            treat_unknown_as_zero: scoring
                .treat_unknown_as_zero
                .unwrap_or(defaults.treat_unknown_as_zero),
            allow_partial: scoring.allow_partial.unwrap_or(defaults.allow_partial),
            critical_cap_no: scoring.critical_cap_no.unwrap_or(defaults.critical_cap_no),
            critical_cap_unknown: scoring
                .critical_cap_unknown
                .unwrap_or(defaults.critical_cap_unknown),
            pillar_weights_override: self.weights.as_ref().map(WeightsConfig::to_weights),
            sector_table,
            rating_scale,
        }
    }

    pub fn validate(&self) -> Result<(), EsgError> {
        let unit = |name: &str, value: Option<f64>| -> Result<(), EsgError> {
            match value {
                Some(value) if !(0.0..=1.0).contains(&value) => Err(EsgError::ConfigParse(
                    format!("{name} must be between 0.0 and 1.0"),
                )),
                _ => Ok(()),
            }
        };

        if let Some(scoring) = &self.scoring {
            unit("scoring.critical_cap_no", scoring.critical_cap_no)?;
            unit("scoring.critical_cap_unknown", scoring.critical_cap_unknown)?;
            unit("scoring.critical_threshold", scoring.critical_threshold)?;

            let cap_no = scoring
                .critical_cap_no
                .unwrap_or(crate::scoring::options::DEFAULT_CRITICAL_CAP_NO);
            let cap_unknown = scoring
                .critical_cap_unknown
                .unwrap_or(crate::scoring::options::DEFAULT_CRITICAL_CAP_UNKNOWN);
            if cap_unknown < cap_no {
                return Err(EsgError::ConfigParse(format!(
                    "scoring.critical_cap_unknown ({cap_unknown:.2}) must not be below scoring.critical_cap_no ({cap_no:.2})"
                )));
            }
        }

        if let Some(weights) = &self.weights {
            validate_weights("weights", weights.to_weights())?;
        }

        let mut names = HashSet::new();
        for sector in &self.sectors {
            let name = sector.name.trim();
            if name.is_empty() {
                return Err(EsgError::ConfigParse(
                    "sectors.name must be non-empty".to_string(),
                ));
            }
            if !names.insert(name.to_lowercase()) {
                return Err(EsgError::ConfigParse(format!(
                    "sectors contains duplicate sector: {name}"
                )));
            }
            if sector.keywords.iter().all(|keyword| keyword.trim().is_empty()) {
                return Err(EsgError::ConfigParse(format!(
                    "sectors.{name}.keywords must contain at least one keyword"
                )));
            }
            validate_weights(
                &format!("sectors.{name}"),
                PillarWeights::new(sector.e, sector.s, sector.g),
            )?;
        }

        let mut previous: Option<u8> = None;
        for band in &self.bands {
            band.rating.parse::<Rating>().map_err(|_| {
                EsgError::ConfigParse(format!("bands contains unknown rating: {}", band.rating))
            })?;
            if band.min > 100 {
                return Err(EsgError::ConfigParse(format!(
                    "bands.{}.min must be between 0 and 100",
                    band.rating
                )));
            }
            if let Some(previous) = previous {
                if band.min >= previous {
                    return Err(EsgError::ConfigParse(
                        "bands must be listed in strictly descending min order".to_string(),
                    ));
                }
            }
            previous = Some(band.min);
        }

        Ok(())
    }
}

fn validate_weights(name: &str, weights: PillarWeights) -> Result<(), EsgError> {
    if [weights.e, weights.s, weights.g]
        .iter()
        .any(|weight| !weight.is_finite() || *weight < 0.0)
    {
        return Err(EsgError::InvalidWeights(format!(
            "{name} values must be finite and non-negative"
        )));
    }
    Ok(())
}
