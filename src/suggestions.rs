//! Improvement suggestions ranked against the gaps in an assessment.

use crate::types::answer::{answer_for, AnswerMap};
use crate::types::pillar::{Pillar, PillarMap};
use crate::types::question::{normalize_tags, QuestionRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const DEFAULT_LIMIT: usize = 10;
const ALL_SECTORS: &str = "All";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub text: String,
    pub sectors: Vec<String>,
    pub tags: Vec<String>,
}

impl Suggestion {
    fn new(id: &str, text: &str, sectors: &[&str], tags: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            sectors: sectors.iter().map(|s| s.to_string()).collect(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Sector names compare case-insensitively, like catalog lookups.
    pub fn applies_to(&self, sector: &str) -> bool {
        let sector = sector.trim();
        self.sectors
            .iter()
            .any(|candidate| candidate == ALL_SECTORS || candidate.eq_ignore_ascii_case(sector))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSuggestion {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    pub score: f64,
}

pub fn default_pool() -> Vec<Suggestion> {
    vec![
        Suggestion::new(
            "E-ppas-001",
            "Switch to renewable electricity (PPA or green tariff) with a 12-24 month roadmap.",
            &["Manufacturing", "Textile/Fashion", "Tech", "Furniture"],
            &["energy", "scope2", "quick-win"],
        ),
        Suggestion::new(
            "E-led-002",
            "Complete LED retrofit and add smart occupancy sensors in warehouses and offices.",
            &["Manufacturing", "Construction", "Furniture", "Transportation"],
            &["energy-efficiency", "opex"],
        ),
        Suggestion::new(
            "E-meter-003",
            "Install sub-metering and a monthly energy KPI dashboard (kWh/unit, kWh/m2).",
            &["Manufacturing", "Textile/Fashion", "Agriculture/Food"],
            &["metrics", "energy"],
        ),
        Suggestion::new(
            "S-wellbeing-101",
            "Adopt an employee wellbeing program (flex hours, EAP, burnout prevention).",
            &["Manufacturing", "Tech", "Finance", "Textile/Fashion", "Furniture"],
            &["people", "policy"],
        ),
        Suggestion::new(
            "S-supply-102",
            "Create a supplier code of conduct and risk-tier suppliers (Tier1/Tier2) with annual checks.",
            &["Textile/Fashion", "Manufacturing", "Agriculture/Food"],
            &["supply-chain", "human-rights"],
        ),
        Suggestion::new(
            "G-policy-201",
            "Approve a sustainability policy at board level and assign ESG ownership (RACI).",
            &[ALL_SECTORS],
            &["governance", "foundations"],
        ),
        Suggestion::new(
            "G-report-202",
            "Publish an annual ESG summary on your website with 5-8 core KPIs.",
            &[ALL_SECTORS],
            &["transparency", "communication"],
        ),
        Suggestion::new(
            "E-water-004",
            "Run a water-use audit and set reduction targets per process step.",
            &["Manufacturing", "Agriculture/Food", "Textile/Fashion"],
            &["water", "metrics"],
        ),
        Suggestion::new(
            "E-waste-005",
            "Introduce waste segregation KPIs and a take-back contract for key materials.",
            &["Manufacturing", "Furniture", "Construction"],
            &["waste", "circularity"],
        ),
        Suggestion::new(
            "S-training-103",
            "Train all staff on ethics and anti-corruption; track completion quarterly.",
            &[ALL_SECTORS],
            &["training", "ethics"],
        ),
        Suggestion::new(
            "G-supplier-203",
            "Add ESG clauses in purchase contracts and include right-to-audit.",
            &["Manufacturing", "Textile/Fashion", "Agriculture/Food"],
            &["governance", "procurement"],
        ),
        Suggestion::new(
            "E-logistics-006",
            "Optimize logistics: modal shift where feasible and a load-factor KPI by route.",
            &["Transportation", "Manufacturing", "Furniture"],
            &["scope3", "logistics"],
        ),
    ]
}

/// Pillar a suggestion tag strengthens, if any.
pub fn tag_pillar(tag: &str) -> Option<Pillar> {
    match tag {
        "energy" | "energy-efficiency" | "lighting" | "metering" | "scope2" | "water"
        | "waste" | "circularity" | "logistics" => Some(Pillar::Environmental),
        "people" | "health-safety" | "training" | "human-rights" => Some(Pillar::Social),
        "governance" | "policy" | "ethics" | "procurement" | "transparency" | "foundations" => {
            Some(Pillar::Governance)
        }
        _ => None,
    }
}

/// Accumulated weakness per tag and per pillar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeficitProfile {
    pub tags: HashMap<String, f64>,
    pub pillars: PillarMap<f64>,
    pub total: f64,
}

/// Each deficit answer adds 2 (critical) or 1 to every tag of its question
/// and to its pillar.
pub fn build_deficit_profile(questions: &[QuestionRecord], answers: &AnswerMap) -> DeficitProfile {
    let mut profile = DeficitProfile::default();
    for question in questions {
        if !answer_for(answers, &question.id).is_deficit() {
            continue;
        }
        let weight = if question.critical { 2.0 } else { 1.0 };
        profile.total += weight;

        let tags = if question.tags.is_empty() {
            vec![question.pillar.default_tag().to_string()]
        } else {
            question.tags.clone()
        };
        for tag in tags {
            *profile.tags.entry(tag).or_insert(0.0) += weight;
        }
        profile.pillars[question.pillar] += weight;
    }
    profile
}

fn rank_score(suggestion: &Suggestion, profile: &DeficitProfile) -> f64 {
    let tags = normalize_tags(&suggestion.tags);
    let mut score: f64 = tags
        .iter()
        .map(|tag| profile.tags.get(tag).copied().unwrap_or(0.0))
        .sum();

    let mut boosted: Vec<Pillar> = tags.iter().filter_map(|tag| tag_pillar(tag)).collect();
    boosted.sort();
    boosted.dedup();
    for pillar in boosted {
        score += profile.pillars[pillar] * 0.5;
    }

    if score == 0.0 && tags.iter().any(|tag| tag == "foundations") {
        score = 0.25;
    }
    score
}

/// Suggestions for `sector` ordered by how well they address the deficits.
///
/// Ties break on id. When nothing addresses a deficit the sector pool is
/// returned in its original order.
pub fn tailored_suggestions(
    pool: &[Suggestion],
    sector: Option<&str>,
    questions: &[QuestionRecord],
    answers: &AnswerMap,
    limit: usize,
) -> Vec<RankedSuggestion> {
    let profile = build_deficit_profile(questions, answers);
    let candidates: Vec<&Suggestion> = pool
        .iter()
        .filter(|suggestion| sector.map_or(true, |sector| suggestion.applies_to(sector)))
        .collect();

    let mut ranked: Vec<RankedSuggestion> = candidates
        .iter()
        .map(|suggestion| RankedSuggestion {
            suggestion: (*suggestion).clone(),
            score: rank_score(suggestion, &profile),
        })
        .collect();

    if ranked.iter().any(|entry| entry.score > 0.0) {
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.suggestion.id.cmp(&b.suggestion.id))
        });
    }
    ranked.truncate(limit);
    ranked
}
