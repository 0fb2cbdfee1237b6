//! Converts questionnaire answers into capped pillar scores, a sector-weighted
//! overall score, and a rating.
//!
//! The engine never fails: malformed weights, pillars, and scores degrade to
//! defaults so a partially completed questionnaire still produces a report.

pub mod critical;
pub mod options;
pub mod rating;
pub mod weights;

use crate::types::answer::{answer_for, AnswerMap};
use crate::types::pillar::{Pillar, PillarMap};
use crate::types::question::QuestionRecord;
use crate::types::report::{CapReason, PillarDetail, ReportDetails, ScoreReport};
use options::ScoringOptions;
use tracing::{debug, warn};
use weights::{downscale_exponent, scale_pow2};

#[derive(Debug, Clone, Default)]
struct Bucket {
    weighted_sum: f64,
    weight_sum: f64,
    answered: usize,
    critical_no: Vec<String>,
    critical_unknown: Vec<String>,
}

impl Bucket {
    /// Weighted mean of answered values, 0 when nothing was answered.
    fn base(&self) -> f64 {
        if self.weight_sum > 0.0 {
            self.weighted_sum / self.weight_sum
        } else {
            0.0
        }
    }

    /// Ceiling for the pillar. A critical "No" wins over a critical
    /// unanswered question; the caps never combine.
    fn cap(&self, options: &ScoringOptions) -> (f64, Option<CapReason>) {
        if !self.critical_no.is_empty() {
            let cap = unit_cap(options.critical_cap_no);
            return (
                cap,
                Some(CapReason::CriticalNo {
                    count: self.critical_no.len(),
                }),
            );
        }
        if !self.critical_unknown.is_empty() {
            let cap = unit_cap(options.critical_cap_unknown);
            if cap < 1.0 {
                return (
                    cap,
                    Some(CapReason::CriticalUnanswered {
                        count: self.critical_unknown.len(),
                    }),
                );
            }
        }
        (1.0, None)
    }
}

fn unit_cap(cap: f64) -> f64 {
    if cap.is_nan() {
        1.0
    } else {
        cap.clamp(0.0, 1.0)
    }
}

fn to_percent(fraction: f64) -> u8 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}

fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    }
}

/// Scores `questions` against `answers`.
///
/// Question order does not matter; answers whose key matches no question are
/// ignored. Identical inputs always yield an identical report.
pub fn score_assessment(
    questions: &[QuestionRecord],
    answers: &AnswerMap,
    options: &ScoringOptions,
) -> ScoreReport {
    let policy = options.answer_policy();
    let sector_pillar_weights = options.resolved_pillar_weights();

    // Weights are accumulated scaled down by a per-pillar power of two so
    // that the sums stay finite for any finite input.
    let exponents = PillarMap::from_fn(|pillar| {
        downscale_exponent(
            questions
                .iter()
                .filter(|question| question.pillar == pillar)
                .map(QuestionRecord::effective_weight)
                .fold(0.0, f64::max),
        )
    });

    let mut buckets: PillarMap<Bucket> = PillarMap::default();
    let mut unanswered = Vec::new();

    for question in questions {
        if let Some(raw) = question.weight {
            if !(raw.is_finite() && raw > 0.0) {
                warn!(question = %question.id, weight = raw, "invalid weight, using 1");
            }
        }
        let weight = scale_pow2(question.effective_weight(), -exponents[question.pillar]);
        let bucket = &mut buckets[question.pillar];

        let Some(value) = answer_for(answers, &question.id).normalize(policy) else {
            if question.critical {
                bucket.critical_unknown.push(question.id.clone());
            }
            unanswered.push(question.id.clone());
            continue;
        };

        bucket.weighted_sum += value * weight;
        bucket.weight_sum += weight;
        bucket.answered += 1;

        if question.critical && value == 0.0 {
            bucket.critical_no.push(question.id.clone());
        }
    }

    let details = buckets.map(|pillar, bucket| {
        let base = bucket.base();
        let (cap, cap_reason) = bucket.cap(options);
        let score = to_percent(base.min(cap));
        debug!(
            pillar = %pillar,
            base,
            cap,
            score,
            answered = bucket.answered,
            "pillar aggregated"
        );
        let w_sum = scale_pow2(bucket.weight_sum, exponents[pillar]);
        PillarDetail {
            score,
            capped: cap_reason.is_some(),
            cap_reason,
            n: bucket.answered,
            w_sum: if w_sum.is_finite() {
                round2(w_sum)
            } else {
                f64::MAX
            },
        }
    });

    let pillars = details.map(|_, detail| detail.score);
    let overall_fraction: f64 = Pillar::ALL
        .into_iter()
        .map(|pillar| f64::from(pillars[pillar]) / 100.0 * sector_pillar_weights.get(pillar))
        .sum();
    let overall = to_percent(overall_fraction);
    let rating = options.rating_scale.rate(overall);

    let PillarMap { e, s, g } = buckets;
    ScoreReport {
        overall,
        rating,
        pillars,
        details: ReportDetails {
            pillar: details,
            sector_pillar_weights,
            unanswered,
            critical_hits: PillarMap::new(e.critical_no, s.critical_no, g.critical_no),
            critical_unknowns: PillarMap::new(
                e.critical_unknown,
                s.critical_unknown,
                g.critical_unknown,
            ),
        },
    }
}
