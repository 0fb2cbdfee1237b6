use crate::types::report::ScoreReport;

pub fn to_json(report: &ScoreReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::options::ScoringOptions;
    use crate::scoring::score_assessment;
    use crate::types::answer::{Answer, AnswerMap};
    use crate::types::pillar::Pillar;
    use crate::types::question::QuestionRecord;

    #[test]
    fn json_report_uses_pillar_letters_and_camel_case() {
        let questions = [
            QuestionRecord::new("q1", Pillar::Environmental).critical(true),
            QuestionRecord::new("q2", Pillar::Social),
        ];
        let answers: AnswerMap = [("q1".to_string(), Answer::text("Yes"))]
            .into_iter()
            .collect();
        let report = score_assessment(&questions, &answers, &ScoringOptions::default());

        let rendered = to_json(&report).expect("json should serialize");
        assert!(rendered.contains("\"overall\": 34"));
        assert!(rendered.contains("\"rating\": \"CCC\""));
        assert!(rendered.contains("\"wSum\""));
        assert!(rendered.contains("\"unanswered\": [\n      \"q2\"\n    ]"));
    }
}
