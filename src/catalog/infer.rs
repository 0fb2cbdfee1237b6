use crate::types::pillar::Pillar;

#[derive(Debug, Clone, Copy)]
enum Needle {
    /// Anywhere in the text.
    Sub(&'static str),
    /// A whole word.
    Word(&'static str),
    /// The start of a word.
    Stem(&'static str),
    /// The end of a word.
    Suffix(&'static str),
    /// Two fragments separated by optional whitespace.
    Gap(&'static str, &'static str),
}

struct TagRule {
    needles: &'static [Needle],
    tags: &'static [&'static str],
}

use Needle::{Gap, Stem, Sub, Suffix, Word};

const TAG_RULES: &[TagRule] = &[
    TagRule {
        needles: &[Sub("renewable"), Sub("ppa"), Sub("green tariff")],
        tags: &["energy", "scope2"],
    },
    TagRule {
        needles: &[
            Gap("energy", "efficien"),
            Gap("energy", "saving"),
            Word("led"),
            Sub("lighting"),
        ],
        tags: &["energy-efficiency", "lighting"],
    },
    TagRule {
        needles: &[Sub("sub-meter"), Sub("submeter"), Sub("metering")],
        tags: &["metering", "energy"],
    },
    TagRule {
        needles: &[
            Stem("kpi"),
            Stem("track"),
            Stem("measure"),
            Stem("monitor"),
            Stem("target"),
            Stem("goal"),
            Stem("report"),
            Stem("disclos"),
        ],
        tags: &["metrics", "transparency"],
    },
    TagRule {
        needles: &[Sub("water")],
        tags: &["water"],
    },
    TagRule {
        needles: &[Sub("waste"), Sub("recycl"), Sub("circular")],
        tags: &["waste", "circularity"],
    },
    TagRule {
        needles: &[
            Sub("logistics"),
            Sub("transport"),
            Sub("delivery"),
            Sub("route"),
        ],
        tags: &["logistics"],
    },
    TagRule {
        needles: &[Sub("hazardous"), Sub("chemical")],
        tags: &["chemicals"],
    },
    TagRule {
        needles: &[Sub("supply chain"), Sub("supplier")],
        tags: &["procurement", "human-rights"],
    },
    TagRule {
        needles: &[Sub("health"), Sub("safety")],
        tags: &["health-safety", "training"],
    },
    TagRule {
        needles: &[
            Sub("diversity"),
            Sub("inclusion"),
            Sub("wage"),
            Sub("fair"),
        ],
        tags: &["people"],
    },
    TagRule {
        needles: &[Sub("training"), Suffix("train")],
        tags: &["training"],
    },
    TagRule {
        needles: &[Sub("community"), Sub("communities")],
        tags: &["people"],
    },
    TagRule {
        needles: &[
            Sub("ethics"),
            Sub("anti-corruption"),
            Sub("anticorruption"),
            Sub("bribery"),
        ],
        tags: &["ethics", "policy"],
    },
    TagRule {
        needles: &[Stem("policy"), Suffix("policies")],
        tags: &["policy", "governance"],
    },
    TagRule {
        needles: &[Sub("board"), Sub("governance"), Sub("oversight")],
        tags: &["governance", "foundations"],
    },
    TagRule {
        needles: &[Sub("biodivers")],
        tags: &["biodiversity"],
    },
    TagRule {
        needles: &[Sub("portfolio"), Sub("investment"), Suffix("finance")],
        tags: &["governance", "transparency"],
    },
];

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
}

fn needle_matches(needle: Needle, lower: &str) -> bool {
    match needle {
        Sub(fragment) => lower.contains(fragment),
        Word(word) => words(lower).any(|candidate| candidate == word),
        Stem(stem) => words(lower).any(|candidate| candidate.starts_with(stem)),
        Suffix(end) => words(lower).any(|candidate| candidate.ends_with(end)),
        Gap(first, second) => lower
            .match_indices(first)
            .any(|(at, _)| lower[at + first.len()..].trim_start().starts_with(second)),
    }
}

/// Derives practice-area tags from question text. Falls back to the pillar's
/// default tag when no rule fires.
pub fn infer_tags(text: &str, pillar: Pillar) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut out: Vec<String> = Vec::new();
    for rule in TAG_RULES {
        if rule.needles.iter().any(|needle| needle_matches(*needle, &lower)) {
            for tag in rule.tags {
                if !out.iter().any(|existing| existing == tag) {
                    out.push((*tag).to_string());
                }
            }
        }
    }
    if out.is_empty() {
        out.push(pillar.default_tag().to_string());
    }
    out
}

fn has_any(tags: &[String], wanted: &[&str]) -> bool {
    tags.iter().any(|tag| wanted.contains(&tag.as_str()))
}

/// Relative importance within the pillar on a 1..=3 scale.
pub fn infer_weight(pillar: Pillar, tags: &[String], critical: bool) -> f64 {
    if critical {
        return 3.0;
    }
    let (high, medium): (&[&str], &[&str]) = match pillar {
        Pillar::Environmental => (
            &["metrics", "scope2", "energy", "energy-efficiency"],
            &["water", "waste", "circularity", "chemicals", "biodiversity"],
        ),
        Pillar::Social => (
            &["health-safety", "human-rights"],
            &["people", "training"],
        ),
        Pillar::Governance => (
            &["ethics", "policy", "governance", "foundations"],
            &["transparency", "procurement", "metrics"],
        ),
    };
    if has_any(tags, high) {
        3.0
    } else if has_any(tags, medium) {
        2.0
    } else {
        1.0
    }
}
