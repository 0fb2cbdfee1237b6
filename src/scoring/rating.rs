use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Qualitative rating, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "BBB")]
    Bbb,
    #[serde(rename = "BB")]
    Bb,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "CCC")]
    Ccc,
}

impl Rating {
    pub const ALL: [Rating; 7] = [
        Rating::Aaa,
        Rating::Aa,
        Rating::A,
        Rating::Bbb,
        Rating::Bb,
        Rating::B,
        Rating::Ccc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aaa => "AAA",
            Self::Aa => "AA",
            Self::A => "A",
            Self::Bbb => "BBB",
            Self::Bb => "BB",
            Self::B => "B",
            Self::Ccc => "CCC",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Rating::ALL
            .into_iter()
            .find(|rating| rating.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown rating: {value}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingBand {
    pub rating: Rating,
    /// Inclusive lower bound on the 0..=100 overall score.
    pub min: u8,
}

/// Bands evaluated top-down; scores below every band get the floor rating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingScale {
    bands: Vec<RatingBand>,
    floor: Rating,
}

impl Default for RatingScale {
    fn default() -> Self {
        let band = |rating, min| RatingBand { rating, min };
        Self {
            bands: vec![
                band(Rating::Aaa, 85),
                band(Rating::Aa, 75),
                band(Rating::A, 65),
                band(Rating::Bbb, 55),
                band(Rating::Bb, 45),
                band(Rating::B, 35),
            ],
            floor: Rating::Ccc,
        }
    }
}

impl RatingScale {
    pub fn new(bands: Vec<RatingBand>, floor: Rating) -> Self {
        Self { bands, floor }
    }

    pub fn bands(&self) -> &[RatingBand] {
        &self.bands
    }

    pub fn rate(&self, overall: u8) -> Rating {
        self.bands
            .iter()
            .find(|band| overall >= band.min)
            .map(|band| band.rating)
            .unwrap_or(self.floor)
    }
}
