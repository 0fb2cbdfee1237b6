use super::ReportView;
use crate::types::pillar::{Pillar, PillarMap};

fn id_list(ids: &[String]) -> String {
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.join(", ")
    }
}

fn signed(delta: i16) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

fn push_pillar_lists(output: &mut String, title: &str, lists: &PillarMap<Vec<String>>) {
    output.push_str(&format!("## {title}\n\n"));
    if lists.iter().all(|(_, ids)| ids.is_empty()) {
        output.push_str("- none\n\n");
        return;
    }
    for (pillar, ids) in lists.iter().filter(|(_, ids)| !ids.is_empty()) {
        output.push_str(&format!("- {}: {}\n", pillar.label(), ids.join(", ")));
    }
    output.push('\n');
}

pub fn to_markdown(view: &ReportView<'_>) -> String {
    let report = view.report;
    let details = &report.details;
    let mut output = String::new();

    output.push_str("# ESG Assessment Report\n\n");
    if let Some(sector) = view.sector {
        output.push_str(&format!("Sector: {sector}\n\n"));
    }
    output.push_str(&format!(
        "Overall score: {} ({})\n\n",
        report.overall, report.rating
    ));

    output.push_str("## Pillar Scores\n\n");
    output.push_str("| Pillar | Score | Weight | Answered | Cap |\n");
    output.push_str("|---|---|---|---|---|\n");
    for pillar in Pillar::ALL {
        let detail = &details.pillar[pillar];
        output.push_str(&format!(
            "| {} | {} | {:.2} | {} | {} |\n",
            pillar.label(),
            detail.score,
            details.sector_pillar_weights.get(pillar),
            detail.n,
            detail
                .cap_reason
                .map(|reason| reason.describe())
                .unwrap_or_else(|| "-".to_string())
        ));
    }
    output.push('\n');

    if !view.critical_pillars.is_empty() {
        let names = view
            .critical_pillars
            .iter()
            .map(|pillar| pillar.label())
            .collect::<Vec<_>>()
            .join(", ");
        output.push_str(&format!(
            "> Critical: {names} at or below {:.0}%\n\n",
            view.threshold * 100.0
        ));
    }

    push_pillar_lists(&mut output, "Critical \"No\" Answers", &details.critical_hits);
    push_pillar_lists(
        &mut output,
        "Critical Questions Unanswered",
        &details.critical_unknowns,
    );

    output.push_str("## Unanswered\n\n");
    output.push_str(&format!("- {}\n\n", id_list(&details.unanswered)));

    if let Some((benchmark, delta)) = &view.benchmark {
        output.push_str(&format!("## Benchmark ({})\n\n", benchmark.sector));
        output.push_str("| | Sector avg | Delta |\n|---|---|---|\n");
        output.push_str(&format!(
            "| Overall | {} | {} |\n",
            benchmark.overall,
            signed(delta.overall)
        ));
        for pillar in Pillar::ALL {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                pillar.label(),
                benchmark.pillars[pillar],
                signed(delta.pillars[pillar])
            ));
        }
    }

    output
}
