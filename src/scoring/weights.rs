use crate::types::pillar::Pillar;
use serde::{Deserialize, Serialize};

/// Relative emphasis of E/S/G for a sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarWeights {
    #[serde(rename = "E")]
    pub e: f64,
    #[serde(rename = "S")]
    pub s: f64,
    #[serde(rename = "G")]
    pub g: f64,
}

impl PillarWeights {
    pub const EQUAL: PillarWeights = PillarWeights {
        e: 1.0 / 3.0,
        s: 1.0 / 3.0,
        g: 1.0 / 3.0,
    };

    pub const fn new(e: f64, s: f64, g: f64) -> Self {
        Self { e, s, g }
    }

    pub fn get(&self, pillar: Pillar) -> f64 {
        match pillar {
            Pillar::Environmental => self.e,
            Pillar::Social => self.s,
            Pillar::Governance => self.g,
        }
    }

    pub fn sum(&self) -> f64 {
        self.e + self.s + self.g
    }

    /// Rescales to sum to 1. Negative or non-finite components count as 0;
    /// a zero total falls back to equal thirds.
    pub fn normalized(&self) -> Self {
        let clean = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
        let (e, s, g) = (clean(self.e), clean(self.s), clean(self.g));
        let exponent = downscale_exponent(e.max(s).max(g));
        let (e, s, g) = (
            scale_pow2(e, -exponent),
            scale_pow2(s, -exponent),
            scale_pow2(g, -exponent),
        );
        let sum = e + s + g;
        if sum <= 0.0 {
            return Self::EQUAL;
        }
        Self::new(e / sum, s / sum, g / sum)
    }
}

/// Smallest power of two that brings `max` down to at most 1, so that sums
/// of scaled weights stay finite. 0 for weights already in range.
pub(crate) fn downscale_exponent(max: f64) -> i32 {
    if max.is_finite() && max > 1.0 {
        max.log2().ceil() as i32
    } else {
        0
    }
}

/// `value * 2^exponent`, split in two factors so neither over- or underflows.
/// Exact whenever the result is a normal float.
pub(crate) fn scale_pow2(value: f64, exponent: i32) -> f64 {
    let half = exponent / 2;
    value * 2f64.powi(half) * 2f64.powi(exponent - half)
}

/// One row of the sector table: any keyword contained in the lowercased
/// sector name selects `weights`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRule {
    pub name: String,
    pub keywords: Vec<String>,
    #[serde(flatten)]
    pub weights: PillarWeights,
}

impl SectorRule {
    pub fn new(name: &str, keywords: &[&str], weights: PillarWeights) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            weights,
        }
    }

    pub fn matches(&self, sector_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| !keyword.is_empty() && sector_lower.contains(keyword.as_str()))
    }
}

/// Ordered sector lookup; the first matching rule wins.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorTable {
    rules: Vec<SectorRule>,
    fallback: PillarWeights,
}

pub const UNKNOWN_SECTOR_WEIGHTS: PillarWeights = PillarWeights::new(0.34, 0.33, 0.33);

impl Default for SectorTable {
    fn default() -> Self {
        Self {
            rules: vec![
                SectorRule::new(
                    "Heavy industry",
                    &["manufacturing", "construction", "chemicals", "mining"],
                    PillarWeights::new(0.50, 0.30, 0.20),
                ),
                SectorRule::new(
                    "Consumer goods",
                    &["textile", "fashion", "apparel", "furniture"],
                    PillarWeights::new(0.45, 0.35, 0.20),
                ),
                SectorRule::new(
                    "Agri-food",
                    &["agriculture", "food", "beverage"],
                    PillarWeights::new(0.50, 0.35, 0.15),
                ),
                SectorRule::new(
                    "Transport",
                    &["transport", "transportation", "logistics"],
                    PillarWeights::new(0.50, 0.30, 0.20),
                ),
                SectorRule::new(
                    "Technology",
                    &["tech", "technology", "software", "it"],
                    PillarWeights::new(0.25, 0.35, 0.40),
                ),
                SectorRule::new(
                    "Financial services",
                    &["finance", "bank", "insurance", "asset"],
                    PillarWeights::new(0.20, 0.30, 0.50),
                ),
            ],
            fallback: UNKNOWN_SECTOR_WEIGHTS,
        }
    }
}

impl SectorTable {
    pub fn new(rules: Vec<SectorRule>) -> Self {
        Self {
            rules,
            fallback: UNKNOWN_SECTOR_WEIGHTS,
        }
    }

    pub fn rules(&self) -> &[SectorRule] {
        &self.rules
    }

    pub fn fallback(&self) -> PillarWeights {
        self.fallback
    }

    pub fn find(&self, sector: &str) -> Option<&SectorRule> {
        let lower = sector.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&lower))
    }

    /// Raw (un-normalized) weights for `sector`; no sector or no match yields
    /// the fallback row.
    pub fn lookup(&self, sector: Option<&str>) -> PillarWeights {
        sector
            .and_then(|sector| self.find(sector))
            .map(|rule| rule.weights)
            .unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn huge_weights_normalize_without_overflow() {
        let weights = PillarWeights::new(f64::MAX, f64::MAX, 0.0).normalized();
        assert_eq!(weights, PillarWeights::new(0.5, 0.5, 0.0));

        let weights = PillarWeights::new(1e308, 1e308, 1e308).normalized();
        assert_close(weights.sum(), 1.0);
        assert_close(weights.e, 1.0 / 3.0);
    }

    #[test]
    fn power_of_two_scaling_is_exact() {
        assert_eq!(downscale_exponent(0.7), 0);
        assert_eq!(downscale_exponent(4.0), 2);
        assert_eq!(downscale_exponent(f64::MAX), 1024);
        assert_eq!(scale_pow2(3.0, -2), 0.75);
        assert!(scale_pow2(f64::MAX, -1024) <= 1.0);
        assert_eq!(scale_pow2(scale_pow2(1e308, -1024), 1024), 1e308);
    }

    #[test]
    fn lookup_matches_keywords_case_insensitively() {
        let table = SectorTable::default();
        assert_eq!(
            table.lookup(Some("Finance")),
            PillarWeights::new(0.20, 0.30, 0.50)
        );
        assert_eq!(
            table.lookup(Some("Agriculture/Food")),
            PillarWeights::new(0.50, 0.35, 0.15)
        );
        assert_eq!(
            table.lookup(Some("Textile/Fashion")),
            PillarWeights::new(0.45, 0.35, 0.20)
        );
        assert_eq!(
            table.lookup(Some("SOFTWARE services")),
            PillarWeights::new(0.25, 0.35, 0.40)
        );
    }

    #[test]
    fn lookup_is_first_match_wins() {
        let table = SectorTable::default();
        // "construction" (row 1) beats "logistics" (row 4).
        assert_eq!(
            table.lookup(Some("construction logistics")),
            PillarWeights::new(0.50, 0.30, 0.20)
        );
        // containment, not equality: "hospitality" contains "it".
        assert_eq!(
            table.lookup(Some("Hospitality")),
            PillarWeights::new(0.25, 0.35, 0.40)
        );
    }

    #[test]
    fn unknown_or_missing_sector_uses_fallback() {
        let table = SectorTable::default();
        assert_eq!(table.lookup(Some("Retail")), UNKNOWN_SECTOR_WEIGHTS);
        assert_eq!(table.lookup(Some("")), UNKNOWN_SECTOR_WEIGHTS);
        assert_eq!(table.lookup(None), UNKNOWN_SECTOR_WEIGHTS);
    }

    #[test]
    fn every_row_normalizes_to_one() {
        let table = SectorTable::default();
        for rule in table.rules() {
            assert_close(rule.weights.normalized().sum(), 1.0);
        }
        assert_close(table.fallback().normalized().sum(), 1.0);
    }

    #[test]
    fn normalization_handles_degenerate_weights() {
        assert_eq!(PillarWeights::new(0.0, 0.0, 0.0).normalized(), PillarWeights::EQUAL);
        let w = PillarWeights::new(2.0, -1.0, f64::NAN).normalized();
        assert_close(w.e, 1.0);
        assert_close(w.s, 0.0);
        assert_close(w.g, 0.0);
        let w = PillarWeights::new(1.0, 1.0, 2.0).normalized();
        assert_close(w.g, 0.5);
    }
}
