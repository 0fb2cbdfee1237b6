use crate::types::pillar::Pillar;
use serde::{Deserialize, Serialize};

/// A catalog question as seen by the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub pillar: Pillar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub critical: bool,
    /// Raw weight as supplied; see [`QuestionRecord::effective_weight`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl QuestionRecord {
    pub fn new(id: impl Into<String>, pillar: Pillar) -> Self {
        Self {
            id: id.into(),
            pillar,
            text: None,
            tags: Vec::new(),
            critical: false,
            weight: None,
        }
    }

    pub fn critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    /// Weight used for aggregation: 1 unless the raw weight is finite and positive.
    pub fn effective_weight(&self) -> f64 {
        match self.weight {
            Some(weight) if weight.is_finite() && weight > 0.0 => weight,
            _ => 1.0,
        }
    }
}

/// Lowercases, trims, drops empties, and deduplicates keeping first occurrence.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
