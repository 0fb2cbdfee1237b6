use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FINANCE_CATALOG: &str = r#"
sector = "Finance"

[[questions]]
id = "e1"
text = "Do you measure the energy use of your offices?"
pillar = "E"
weight = 1.0

[[questions]]
id = "s1"
text = "Do you promote diversity and inclusion in hiring?"
category = "Social"
weight = 1.0

[[questions]]
id = "g1"
text = "Do you have a code of ethics for employees?"
category = "Governance"
critical = true
weight = 1.0
"#;

/// Command isolated from any user-global or working-directory config.
fn esgscore(workspace: &Path) -> Command {
    let mut cmd = Command::cargo_bin("esgscore").expect("binary should compile");
    cmd.env("HOME", workspace)
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(workspace);
    cmd
}

fn workspace(answers: &str) -> TempDir {
    let dir = TempDir::new().expect("temp dir should be created");
    fs::create_dir_all(dir.path().join("catalogs")).expect("catalog dir should create");
    fs::write(dir.path().join("catalogs/finance.toml"), FINANCE_CATALOG)
        .expect("catalog should write");
    fs::write(dir.path().join("answers.json"), answers).expect("answers should write");
    dir
}

#[test]
fn score_json_reports_weighted_overall() {
    let dir = workspace(r#"{"e1": {"score": 4}, "s1": "Yes", "g1": {"score": 3}}"#);

    esgscore(dir.path())
        .arg("score")
        .arg(dir.path().join("answers.json"))
        .arg("--catalog")
        .arg(dir.path().join("catalogs/finance.toml"))
        .arg("--format")
        .arg("json")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"overall\": 88"))
        .stdout(predicate::str::contains("\"rating\": \"AAA\""));
}

#[test]
fn score_markdown_includes_benchmark_for_catalog_sector() {
    let dir = workspace(r#"{"e1": {"score": 2}, "s1": "Yes", "g1": "Yes"}"#);

    esgscore(dir.path())
        .arg("score")
        .arg(dir.path().join("answers.json"))
        .arg("--catalog")
        .arg(dir.path().join("catalogs/finance.toml"))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("# ESG Assessment Report"))
        .stdout(predicate::str::contains("Sector: Finance"))
        .stdout(predicate::str::contains("## Benchmark (Finance)"));
}

#[test]
fn score_exits_one_when_a_pillar_is_critical() {
    let dir = workspace(r#"{"e1": {"score": 4}, "s1": "Yes", "g1": "No"}"#);

    esgscore(dir.path())
        .arg("score")
        .arg(dir.path().join("answers.json"))
        .arg("--catalog")
        .arg(dir.path().join("catalogs/finance.toml"))
        .arg("--format")
        .arg("json")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"criticalHits\""))
        .stdout(predicate::str::contains("\"g1\""));
}

#[test]
fn score_threshold_flag_controls_critical_exit() {
    let dir = workspace(r#"{"e1": {"score": 1}, "s1": "Yes", "g1": "Yes"}"#);

    esgscore(dir.path())
        .arg("score")
        .arg(dir.path().join("answers.json"))
        .arg("--catalog")
        .arg(dir.path().join("catalogs/finance.toml"))
        .assert()
        .code(0);

    esgscore(dir.path())
        .arg("score")
        .arg(dir.path().join("answers.json"))
        .arg("--catalog")
        .arg(dir.path().join("catalogs/finance.toml"))
        .arg("--threshold")
        .arg("0.25")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("> Critical: Environmental"));
}

#[test]
fn score_writes_assessment_record() {
    let dir = workspace(r#"{"e1": {"score": 4}, "s1": "Yes"}"#);
    let out = dir.path().join("records/latest.json");

    esgscore(dir.path())
        .arg("-q")
        .arg("score")
        .arg(dir.path().join("answers.json"))
        .arg("--catalog")
        .arg(dir.path().join("catalogs/finance.toml"))
        .arg("--out")
        .arg(&out)
        .assert()
        .stdout(predicate::str::is_empty());

    let record = fs::read_to_string(&out).expect("record should be written");
    assert!(record.contains("\"fingerprint\""));
    assert!(record.contains("\"createdAt\""));
    assert!(record.contains("\"criticalUnknowns\""));
}

#[test]
fn score_reports_missing_answers_file() {
    let dir = workspace("{}");

    esgscore(dir.path())
        .arg("score")
        .arg(dir.path().join("missing.json"))
        .arg("--catalog")
        .arg(dir.path().join("catalogs/finance.toml"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("path does not exist"));
}

#[test]
fn score_reports_malformed_answers() {
    let dir = workspace("[1, 2, 3]");

    esgscore(dir.path())
        .arg("score")
        .arg(dir.path().join("answers.json"))
        .arg("--catalog")
        .arg(dir.path().join("catalogs/finance.toml"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("answers parse error"));
}

#[test]
fn catalog_directory_requires_sector() {
    let dir = workspace(r#"{"e1": {"score": 4}}"#);

    esgscore(dir.path())
        .arg("score")
        .arg(dir.path().join("answers.json"))
        .arg("--catalog")
        .arg(dir.path().join("catalogs"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("--sector is required"));

    esgscore(dir.path())
        .arg("score")
        .arg(dir.path().join("answers.json"))
        .arg("--catalog")
        .arg(dir.path().join("catalogs"))
        .arg("--sector")
        .arg("finance")
        .assert()
        .stdout(predicate::str::contains("Sector: Finance"));
}

#[test]
fn config_file_overrides_pillar_weights() {
    let dir = workspace(r#"{"e1": {"score": 4}, "s1": "No", "g1": "Yes"}"#);
    fs::write(
        dir.path().join("esgscore.toml"),
        r#"
[weights]
E = 1.0
S = 0.0
G = 0.0
"#,
    )
    .expect("config should write");

    esgscore(dir.path())
        .arg("score")
        .arg(dir.path().join("answers.json"))
        .arg("--catalog")
        .arg(dir.path().join("catalogs/finance.toml"))
        .arg("--format")
        .arg("json")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"overall\": 100"));
}

#[test]
fn invalid_config_is_a_runtime_failure() {
    let dir = workspace("{}");
    fs::write(
        dir.path().join("esgscore.toml"),
        r#"
[scoring]
critical_cap_no = 3.0
"#,
    )
    .expect("config should write");

    esgscore(dir.path())
        .arg("sectors")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("critical_cap_no"));
}

#[test]
fn suggest_outputs_ranked_suggestions() {
    let dir = workspace(r#"{"e1": "No", "s1": "Yes", "g1": "Yes"}"#);

    esgscore(dir.path())
        .arg("suggest")
        .arg(dir.path().join("answers.json"))
        .arg("--catalog")
        .arg(dir.path().join("catalogs/finance.toml"))
        .arg("--limit")
        .arg("2")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("suggestions:"));
}

#[test]
fn sectors_lists_weights_and_benchmarks() {
    let dir = TempDir::new().expect("temp dir should be created");

    esgscore(dir.path())
        .arg("sectors")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Financial services: 0.20/0.30/0.50"))
        .stdout(predicate::str::contains("- other: 0.34/0.33/0.33"))
        .stdout(predicate::str::contains("- Tech: 63 54/66/70"));
}

const MIXED_CATALOG: &str = r#"
sector = "Finance"

[[questions]]
id = "e1"
pillar = "E"
weight = 1.0

[[questions]]
id = "e2"
pillar = "E"
critical = true
weight = 1.0

[[questions]]
id = "s1"
pillar = "S"
weight = 1.0

[[questions]]
id = "g1"
pillar = "G"
weight = 1.0
"#;

fn mixed_workspace(answers: &str) -> TempDir {
    let dir = workspace(answers);
    fs::write(dir.path().join("catalogs/finance.toml"), MIXED_CATALOG)
        .expect("catalog should write");
    dir
}

fn score_json(dir: &Path, extra: &[&str]) -> String {
    let output = esgscore(dir)
        .arg("score")
        .arg(dir.join("answers.json"))
        .arg("--catalog")
        .arg(dir.join("catalogs/finance.toml"))
        .args(["--format", "json"])
        .args(extra)
        .output()
        .expect("command should run");
    String::from_utf8(output.stdout).expect("stdout should be utf-8")
}

#[test]
fn builtin_questionnaire_scores_with_sector_only() {
    let answers = (1..=20)
        .map(|n| format!("\"Tech-{n}\": \"Yes\""))
        .collect::<Vec<_>>()
        .join(", ");
    let dir = workspace(&format!("{{{answers}}}"));

    esgscore(dir.path())
        .arg("score")
        .arg(dir.path().join("answers.json"))
        .args(["--sector", "tech", "--format", "json"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"overall\": 100"))
        .stdout(predicate::str::contains("\"unanswered\": []"));
}

#[test]
fn builtin_questionnaire_resolves_sector_key() {
    let dir = workspace(r#"{"AgricultureFood-1": "Yes"}"#);

    esgscore(dir.path())
        .arg("score")
        .arg(dir.path().join("answers.json"))
        .args(["--sector", "AgricultureFood"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Sector: Agriculture/Food"))
        .stdout(predicate::str::contains("AgricultureFood-16"));
}

#[test]
fn missing_sector_without_catalog_is_reported() {
    let dir = workspace("{}");

    esgscore(dir.path())
        .arg("score")
        .arg(dir.path().join("answers.json"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("--sector is required without --catalog"));

    esgscore(dir.path())
        .arg("score")
        .arg(dir.path().join("answers.json"))
        .args(["--sector", "Mining"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no catalog found for sector: Mining"));
}

#[test]
fn weights_flag_changes_overall() {
    let dir = mixed_workspace(r#"{"e1": "Yes", "e2": "Yes", "s1": "No", "g1": "Yes"}"#);

    assert!(score_json(dir.path(), &[]).contains("\"overall\": 70"));
    assert!(score_json(dir.path(), &["--weights", "1,0,0"]).contains("\"overall\": 100"));
}

#[test]
fn allow_partial_flag_and_its_negation_override_config() {
    let dir = mixed_workspace(r#"{"e1": "Yes", "e2": "Yes", "s1": "Partial", "g1": "Yes"}"#);

    assert!(score_json(dir.path(), &[]).contains("\"overall\": 70"));
    assert!(score_json(dir.path(), &["--allow-partial"]).contains("\"overall\": 85"));

    fs::write(
        dir.path().join("esgscore.toml"),
        "[scoring]\nallow_partial = true\n",
    )
    .expect("config should write");
    assert!(score_json(dir.path(), &[]).contains("\"overall\": 85"));
    assert!(score_json(dir.path(), &["--no-allow-partial"]).contains("\"overall\": 70"));
}

#[test]
fn treat_unknown_as_zero_turns_blank_critical_into_no() {
    let dir = mixed_workspace(r#"{"e1": "Yes", "s1": "Yes", "g1": "Yes"}"#);

    // e2 blank: unanswered cap 0.60 on a perfect E pillar.
    let default = score_json(dir.path(), &[]);
    assert!(default.contains("\"overall\": 92"));
    assert!(default.contains("\"criticalUnanswered\""));

    // e2 scored 0: mean 0.5 under the 0.40 "No" cap.
    let treated = score_json(dir.path(), &["--treat-unknown-as-zero"]);
    assert!(treated.contains("\"overall\": 88"));
    assert!(treated.contains("\"criticalNo\""));
}

#[test]
fn cap_flags_change_pillar_ceilings() {
    let blank = mixed_workspace(r#"{"e1": "Yes", "s1": "Yes", "g1": "Yes"}"#);
    assert!(score_json(blank.path(), &["--cap-unknown", "0.8"]).contains("\"overall\": 96"));

    let no = mixed_workspace(r#"{"e1": "Yes", "e2": "No", "s1": "Yes", "g1": "Yes"}"#);
    assert!(score_json(no.path(), &[]).contains("\"overall\": 88"));
    assert!(score_json(no.path(), &["--cap-no", "0.5"]).contains("\"overall\": 90"));
}

#[test]
fn inverted_cap_flags_are_rejected() {
    let dir = mixed_workspace("{}");

    esgscore(dir.path())
        .arg("score")
        .arg(dir.path().join("answers.json"))
        .arg("--catalog")
        .arg(dir.path().join("catalogs/finance.toml"))
        .args(["--cap-no", "0.7"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("must not be below"));
}

#[test]
fn record_cooldown_blocks_replacement_until_forced() {
    let dir = workspace(r#"{"e1": {"score": 4}, "s1": "Yes", "g1": "Yes"}"#);
    let out = dir.path().join("records/latest.json");
    let run = |extra: &[&str]| {
        let mut cmd = esgscore(dir.path());
        cmd.arg("-q")
            .arg("score")
            .arg(dir.path().join("answers.json"))
            .arg("--catalog")
            .arg(dir.path().join("catalogs/finance.toml"))
            .arg("--out")
            .arg(&out)
            .args(extra);
        cmd
    };

    run(&[]).assert().code(0);
    run(&[])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("assessment cooldown active"))
        .stderr(predicate::str::contains("--force"));
    run(&["--force"]).assert().code(0);

    let mut record: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("record should exist"))
            .expect("record should be json");
    record["createdAt"] = serde_json::Value::from("2020-01-01T00:00:00Z");
    fs::write(&out, record.to_string()).expect("record should rewrite");

    run(&[]).assert().code(0);
    let refreshed = fs::read_to_string(&out).expect("record should exist");
    assert!(!refreshed.contains("2020-01-01"));
}

#[test]
fn sectors_lists_builtin_questionnaires() {
    let dir = TempDir::new().expect("temp dir should be created");

    esgscore(dir.path())
        .arg("sectors")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("built-in questionnaires:"))
        .stdout(predicate::str::contains("- Manufacturing: 20 questions, 6 critical"))
        .stdout(predicate::str::contains("- Agriculture/Food: 20 questions, 1 critical"));
}
