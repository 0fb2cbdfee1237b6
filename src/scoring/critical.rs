use crate::types::pillar::Pillar;
use std::collections::HashMap;

/// Pillar score (0..1) at or below which the critical alert fires.
pub const DEFAULT_CRITICAL_THRESHOLD: f64 = 0.20;

/// True when any pillar score (on the `[0, 1]` scale) is at or below
/// `threshold`. Missing pillars count as 1 and never trigger.
pub fn has_critical_pillar(scores: &HashMap<Pillar, f64>, threshold: f64) -> bool {
    critical_pillars(scores, threshold).next().is_some()
}

/// Pillars at or below `threshold`, in E/S/G order.
pub fn critical_pillars(
    scores: &HashMap<Pillar, f64>,
    threshold: f64,
) -> impl Iterator<Item = Pillar> + '_ {
    Pillar::ALL.into_iter().filter(move |pillar| {
        let score = scores.get(pillar).copied().unwrap_or(1.0);
        score <= threshold
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(entries: &[(Pillar, f64)]) -> HashMap<Pillar, f64> {
        entries.iter().copied().collect()
    }

    #[test]
    fn fires_when_any_pillar_is_at_or_below_threshold() {
        let s = scores(&[
            (Pillar::Environmental, 0.9),
            (Pillar::Social, 0.15),
            (Pillar::Governance, 0.8),
        ]);
        assert!(has_critical_pillar(&s, DEFAULT_CRITICAL_THRESHOLD));
        assert_eq!(
            critical_pillars(&s, DEFAULT_CRITICAL_THRESHOLD).collect::<Vec<_>>(),
            vec![Pillar::Social]
        );

        let boundary = scores(&[(Pillar::Governance, 0.20)]);
        assert!(has_critical_pillar(&boundary, DEFAULT_CRITICAL_THRESHOLD));
    }

    #[test]
    fn missing_pillars_never_trigger() {
        assert!(!has_critical_pillar(&HashMap::new(), DEFAULT_CRITICAL_THRESHOLD));
        let s = scores(&[(Pillar::Environmental, 0.21)]);
        assert!(!has_critical_pillar(&s, DEFAULT_CRITICAL_THRESHOLD));
    }
}
