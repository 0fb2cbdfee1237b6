use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Highest level on the 0..=4 maturity scale.
pub const MAX_MATURITY: f64 = 4.0;

/// Answers keyed by question id.
pub type AnswerMap = BTreeMap<String, Answer>;

/// A caller-supplied answer in one of the two accepted shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Maturity level on the 0..=4 scale, clamped on normalization.
    Numeric(f64),
    Legacy(LegacyAnswer),
    Unanswered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyAnswer {
    Yes,
    No,
    Partial,
    /// `"Unknown"` or the empty string.
    Unknown,
    /// Any other literal, e.g. `"NA"`. Never scored.
    Other(String),
}

impl LegacyAnswer {
    pub fn parse(value: &str) -> Self {
        match value {
            "Yes" => Self::Yes,
            "No" => Self::No,
            "Partial" => Self::Partial,
            "Unknown" | "" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Partial => "Partial",
            Self::Unknown => "Unknown",
            Self::Other(value) => value,
        }
    }
}

/// How ambiguous answers are converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerPolicy {
    pub allow_partial: bool,
    pub treat_unknown_as_zero: bool,
}

impl Answer {
    pub fn score(score: f64) -> Self {
        Self::Numeric(score)
    }

    pub fn text(value: &str) -> Self {
        Self::Legacy(LegacyAnswer::parse(value))
    }

    /// Converts the answer to a value in `[0, 1]`, or `None` when it must be
    /// left out of both numerator and denominator.
    ///
    /// `treat_unknown_as_zero` only applies to the blank forms (`Unknown`,
    /// empty string, missing). Unrecognised literals and `Partial` without
    /// `allow_partial` stay excluded.
    pub fn normalize(&self, policy: AnswerPolicy) -> Option<f64> {
        match self {
            Self::Numeric(score) if score.is_nan() => None,
            Self::Numeric(score) => Some(score.clamp(0.0, MAX_MATURITY) / MAX_MATURITY),
            Self::Legacy(LegacyAnswer::Yes) => Some(1.0),
            Self::Legacy(LegacyAnswer::No) => Some(0.0),
            Self::Legacy(LegacyAnswer::Partial) if policy.allow_partial => Some(0.5),
            Self::Legacy(LegacyAnswer::Unknown) | Self::Unanswered
                if policy.treat_unknown_as_zero =>
            {
                Some(0.0)
            }
            _ => None,
        }
    }

    /// True for answers that signal a gap: `No`, `Unknown`, `NA`, or maturity 0.
    pub fn is_deficit(&self) -> bool {
        match self {
            Self::Numeric(score) => *score <= 0.0,
            Self::Legacy(LegacyAnswer::No | LegacyAnswer::Unknown) => true,
            Self::Legacy(LegacyAnswer::Other(value)) => value == "NA",
            _ => false,
        }
    }
}

/// Looks up an answer, treating a missing key as unanswered.
pub fn answer_for<'a>(answers: &'a AnswerMap, id: &str) -> &'a Answer {
    const UNANSWERED: &Answer = &Answer::Unanswered;
    answers.get(id).unwrap_or(UNANSWERED)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnswer {
    Numeric {
        score: f64,
        #[allow(dead_code)]
        #[serde(default)]
        label: Option<String>,
    },
    Text(String),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for Answer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawAnswer::deserialize(deserializer)? {
            RawAnswer::Numeric { score, .. } => Answer::Numeric(score),
            RawAnswer::Text(value) => Answer::text(&value),
            RawAnswer::Other(_) => Answer::Unanswered,
        })
    }
}

#[derive(Serialize)]
struct NumericRepr {
    score: f64,
}

impl Serialize for Answer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Answer::Numeric(score) => NumericRepr { score: *score }.serialize(serializer),
            Answer::Legacy(legacy) => serializer.serialize_str(legacy.as_str()),
            Answer::Unanswered => serializer.serialize_none(),
        }
    }
}
