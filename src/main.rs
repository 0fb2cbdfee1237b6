mod cli;

use clap::Parser;
use esgscore::benchmark::{compare, default_benchmarks, find_benchmark};
use esgscore::catalog::builtin::builtin_catalogs;
use esgscore::catalog::{Catalog, CatalogIndex};
use esgscore::config;
use esgscore::error::{EsgError, Result};
use esgscore::record::{self, AssessmentRecord};
use esgscore::report::{self, OutputFormat, ReportView};
use esgscore::scoring::critical::critical_pillars;
use esgscore::scoring::score_assessment;
use esgscore::suggestions::{default_pool, tailored_suggestions};
use esgscore::telemetry;
use esgscore::types::answer::AnswerMap;
use esgscore::types::config::EsgConfig;
use esgscore::{ScoringOptions, DEFAULT_CRITICAL_THRESHOLD};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const CRITICAL: i32 = 1;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn load_answers(path: &Path) -> Result<AnswerMap> {
    if !path.exists() {
        return Err(EsgError::PathNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| EsgError::AnswersParse(format!("{}: {}", path.display(), e)))
}

/// Where the questions came from. Index lookups resolve aliases, so the
/// catalog's own sector name is the canonical one.
enum Source {
    File,
    Index,
}

/// A catalog file, the catalog for `sector` inside a directory, or the
/// built-in questionnaire for `sector`.
fn load_catalog(path: Option<&Path>, sector: Option<&str>) -> Result<(Catalog, Source)> {
    let index = match path {
        Some(path) if !path.is_dir() => return Ok((Catalog::load(path)?, Source::File)),
        Some(path) => CatalogIndex::load_dir(path)?,
        None => builtin_catalogs()?,
    };
    let sector = sector.ok_or_else(|| {
        EsgError::UnknownSector(match path {
            Some(path) => format!("--sector is required when {} is a directory", path.display()),
            None => "--sector is required without --catalog".to_string(),
        })
    })?;
    Ok((index.require(sector)?.clone(), Source::Index))
}

struct Prepared {
    catalog: Catalog,
    answers: AnswerMap,
    options: ScoringOptions,
}

fn prepare(
    input: &cli::AssessmentInput,
    loaded: Option<&EsgConfig>,
) -> Result<Prepared> {
    let mut options = loaded
        .map(EsgConfig::scoring_options)
        .unwrap_or_default();
    if let Some(sector) = &input.sector {
        options.sector = Some(sector.clone());
    }
    let (catalog, source) = load_catalog(input.catalog.as_deref(), options.sector.as_deref())?;
    if options.sector.is_none() || matches!(source, Source::Index) {
        options.sector = Some(catalog.sector.clone());
    }
    let answers = load_answers(&input.answers)?;
    Ok(Prepared {
        catalog,
        answers,
        options,
    })
}

/// Refuses to replace a record at `path` that is younger than the cooldown.
fn check_cooldown(path: &Path, now: chrono::DateTime<chrono::Utc>, force: bool) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let previous = record::read_record(path)?;
    if !record::is_cooldown_active(previous.created_at, now) {
        return Ok(());
    }
    let next = previous.created_at + chrono::Duration::days(record::COOLDOWN_DAYS);
    if force {
        warn!(path = %path.display(), next = %next, "replacing record within cooldown");
        return Ok(());
    }
    Err(EsgError::CooldownActive(format!(
        "{} was recorded {}; next assessment allowed from {} (use --force to replace it)",
        path.display(),
        previous.created_at.format("%Y-%m-%d"),
        next.format("%Y-%m-%d")
    )))
}

fn score(cmd: &cli::ScoreCommand, loaded: Option<&EsgConfig>, quiet: bool) -> Result<i32> {
    let Prepared {
        catalog,
        answers,
        mut options,
    } = prepare(&cmd.input, loaded)?;

    if let Some(allow) = cmd.allow_partial() {
        options.allow_partial = allow;
    }
    if let Some(treat) = cmd.treat_unknown_as_zero() {
        options.treat_unknown_as_zero = treat;
    }
    if let Some(cap) = cmd.cap_no {
        options.critical_cap_no = cap;
    }
    if let Some(cap) = cmd.cap_unknown {
        options.critical_cap_unknown = cap;
    }
    if let Some(weights) = cmd.weights {
        options.pillar_weights_override = Some(weights);
    }
    options.validate()?;

    let now = chrono::Utc::now();
    if let Some(out) = &cmd.out {
        check_cooldown(out, now, cmd.force)?;
    }

    let report = score_assessment(&catalog.questions, &answers, &options);
    let threshold = cmd
        .threshold
        .or_else(|| loaded.map(EsgConfig::critical_threshold))
        .unwrap_or(DEFAULT_CRITICAL_THRESHOLD);
    let fractions: HashMap<_, _> = report
        .pillar_fractions()
        .iter()
        .map(|(pillar, score)| (pillar, *score))
        .collect();
    let critical = critical_pillars(&fractions, threshold).collect::<Vec<_>>();

    info!(
        sector = options.sector.as_deref().unwrap_or("-"),
        overall = report.overall,
        rating = %report.rating,
        unanswered = report.details.unanswered.len(),
        critical = !critical.is_empty(),
        "assessment scored"
    );

    let benchmarks = default_benchmarks();
    let benchmark = options
        .sector
        .as_deref()
        .and_then(|sector| find_benchmark(&benchmarks, &options.sector_table, sector))
        .map(|benchmark| (benchmark, compare(&report, benchmark)));

    if !quiet {
        let view = ReportView {
            sector: options.sector.as_deref(),
            report: &report,
            benchmark,
            critical_pillars: critical.clone(),
            threshold,
        };
        let format = match cmd.format {
            cli::ReportFormat::Json => OutputFormat::Json,
            cli::ReportFormat::Md => OutputFormat::Md,
        };
        println!("{}", report::render(&view, format)?);
    }

    if let Some(out) = &cmd.out {
        let assessment = AssessmentRecord {
            sector: options.sector.clone(),
            created_at: now,
            fingerprint: record::fingerprint(&catalog.questions, &answers, &options)?,
            critical: !critical.is_empty(),
            threshold,
            answers,
            report,
        };
        record::write_record(out, &assessment)?;
        info!(path = %out.display(), "assessment record written");
    }

    if critical.is_empty() {
        Ok(exit_code::SUCCESS)
    } else {
        Ok(exit_code::CRITICAL)
    }
}

fn suggest(cmd: &cli::SuggestCommand, loaded: Option<&EsgConfig>) -> Result<i32> {
    let Prepared {
        catalog,
        answers,
        options,
    } = prepare(&cmd.input, loaded)?;
    let pool = default_pool();
    let ranked = tailored_suggestions(
        &pool,
        options.sector.as_deref(),
        &catalog.questions,
        &answers,
        cmd.limit,
    );

    if ranked.is_empty() {
        println!("suggest: no suggestions");
        return Ok(exit_code::SUCCESS);
    }

    println!("suggestions:");
    for entry in &ranked {
        println!(
            "- {} [{:.2}] {}",
            entry.suggestion.id, entry.score, entry.suggestion.text
        );
    }
    Ok(exit_code::SUCCESS)
}

fn sectors(loaded: Option<&EsgConfig>) -> Result<i32> {
    let options = loaded
        .map(EsgConfig::scoring_options)
        .unwrap_or_default();

    println!("sector weights (E/S/G):");
    for rule in options.sector_table.rules() {
        let weights = rule.weights.normalized();
        println!(
            "- {}: {:.2}/{:.2}/{:.2} [{}]",
            rule.name,
            weights.e,
            weights.s,
            weights.g,
            rule.keywords.join(", ")
        );
    }
    let fallback = options.sector_table.fallback();
    println!(
        "- other: {:.2}/{:.2}/{:.2}",
        fallback.e, fallback.s, fallback.g
    );

    println!("built-in questionnaires:");
    for catalog in builtin_catalogs()?.catalogs() {
        let critical = catalog.questions.iter().filter(|q| q.critical).count();
        println!(
            "- {}: {} questions, {} critical",
            catalog.sector,
            catalog.questions.len(),
            critical
        );
    }

    println!("benchmarks (overall E/S/G):");
    for benchmark in default_benchmarks() {
        println!(
            "- {}: {} {}/{}/{}",
            benchmark.sector,
            benchmark.overall,
            benchmark.pillars.e,
            benchmark.pillars.s,
            benchmark.pillars.g
        );
    }
    Ok(exit_code::SUCCESS)
}

fn run() -> Result<i32> {
    let cli = cli::Cli::parse();

    let config_dir = cli
        .config
        .clone()
        .unwrap_or_else(|| std::path::PathBuf::from("."));
    if !config_dir.exists() {
        return Err(EsgError::PathNotFound(config_dir.display().to_string()));
    }
    let loaded = config::load_config(&config_dir)?;

    let level = telemetry::level_for(
        cli.verbose,
        cli.quiet,
        loaded.as_ref().and_then(EsgConfig::log_level),
    );
    telemetry::init(&level)?;

    match &cli.command {
        cli::Commands::Score(cmd) => score(cmd, loaded.as_ref(), cli.quiet),
        cli::Commands::Suggest(cmd) => suggest(cmd, loaded.as_ref()),
        cli::Commands::Sectors => sectors(loaded.as_ref()),
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
