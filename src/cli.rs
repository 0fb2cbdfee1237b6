use clap::{Args, Parser, Subcommand, ValueEnum};
use esgscore::scoring::weights::PillarWeights;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "esgscore",
    version,
    about = "ESG self-assessment scoring with sector-weighted pillar ratings"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding esgscore.toml (defaults to the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score an answers file against a question catalog
    Score(ScoreCommand),
    /// Rank improvement suggestions for the weakest areas
    Suggest(SuggestCommand),
    /// Print the sector weight table and benchmarks
    Sectors,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

#[derive(Args)]
pub struct AssessmentInput {
    /// JSON object mapping question id to answer
    pub answers: PathBuf,
    /// Catalog file (.toml/.json) or a directory of catalogs; the built-in
    /// questionnaire for --sector when omitted
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    #[arg(long)]
    pub sector: Option<String>,
}

#[derive(Args)]
pub struct ScoreCommand {
    #[command(flatten)]
    pub input: AssessmentInput,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Score "Partial" as 0.5
    #[arg(long, overrides_with = "no_allow_partial")]
    pub allow_partial: bool,
    #[arg(long, overrides_with = "allow_partial")]
    pub no_allow_partial: bool,
    /// Score Unknown and missing answers as 0
    #[arg(long, overrides_with = "no_treat_unknown_as_zero")]
    pub treat_unknown_as_zero: bool,
    #[arg(long, overrides_with = "treat_unknown_as_zero")]
    pub no_treat_unknown_as_zero: bool,
    #[arg(long, value_parser = parse_unit)]
    pub cap_no: Option<f64>,
    #[arg(long, value_parser = parse_unit)]
    pub cap_unknown: Option<f64>,
    /// Pillar weights as E,S,G (normalized to sum to 1)
    #[arg(long, value_parser = parse_weights)]
    pub weights: Option<PillarWeights>,
    /// Pillar score (0..1) at or below which the run exits with code 1
    #[arg(long, value_parser = parse_unit)]
    pub threshold: Option<f64>,
    /// Write the assessment record (report, answers, fingerprint) as JSON
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Overwrite a record at --out even within its 180-day cooldown
    #[arg(long, requires = "out")]
    pub force: bool,
}

impl ScoreCommand {
    pub fn allow_partial(&self) -> Option<bool> {
        switch(self.allow_partial, self.no_allow_partial)
    }

    pub fn treat_unknown_as_zero(&self) -> Option<bool> {
        switch(self.treat_unknown_as_zero, self.no_treat_unknown_as_zero)
    }
}

/// `--flag`/`--no-flag` pair; `None` leaves the configured value alone.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Args)]
pub struct SuggestCommand {
    #[command(flatten)]
    pub input: AssessmentInput,
    #[arg(long, default_value_t = esgscore::suggestions::DEFAULT_LIMIT)]
    pub limit: usize,
}

fn parse_unit(value: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("not a number: {value}"))?;
    if !(0.0..=1.0).contains(&parsed) {
        return Err(format!("{value} must be between 0.0 and 1.0"));
    }
    Ok(parsed)
}

fn parse_weights(value: &str) -> Result<PillarWeights, String> {
    let parts = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("not a number: {part}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let [e, s, g] = parts[..] else {
        return Err("expected three comma-separated weights E,S,G".to_string());
    };
    if [e, s, g].iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
        return Err("weights must be finite and non-negative".to_string());
    }
    Ok(PillarWeights::new(e, s, g))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_weight_triples() {
        assert_eq!(
            parse_weights("0.5, 0.3,0.2"),
            Ok(PillarWeights::new(0.5, 0.3, 0.2))
        );
        assert!(parse_weights("0.5,0.5").is_err());
        assert!(parse_weights("a,b,c").is_err());
        assert!(parse_weights("1,-1,1").is_err());
    }

    #[test]
    fn negated_switches_override_each_other() {
        let cli = Cli::try_parse_from([
            "esgscore",
            "score",
            "answers.json",
            "--allow-partial",
            "--no-allow-partial",
            "--no-treat-unknown-as-zero",
        ])
        .expect("arguments should parse");
        let Commands::Score(cmd) = cli.command else {
            panic!("expected score command");
        };
        assert_eq!(cmd.allow_partial(), Some(false));
        assert_eq!(cmd.treat_unknown_as_zero(), Some(false));
        assert_eq!(switch(false, false), None);
    }

    #[test]
    fn unit_values_are_bounded() {
        assert_eq!(parse_unit("0.4"), Ok(0.4));
        assert!(parse_unit("1.2").is_err());
        assert!(parse_unit("x").is_err());
    }
}
