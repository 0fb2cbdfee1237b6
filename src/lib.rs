//! ESG self-assessment scoring.
//!
//! [`score_assessment`] turns a question catalog and an answer map into a
//! [`ScoreReport`]: capped E/S/G pillar scores, a sector-weighted overall
//! score, and a rating band. The surrounding modules load catalogs and
//! configuration, compare against sector benchmarks, rank improvement
//! suggestions, and render or persist the result.

pub mod benchmark;
pub mod catalog;
pub mod config;
pub mod error;
pub mod record;
pub mod report;
pub mod scoring;
pub mod suggestions;
pub mod telemetry;
pub mod types;

pub use error::{EsgError, Result};
pub use scoring::critical::{has_critical_pillar, DEFAULT_CRITICAL_THRESHOLD};
pub use scoring::options::ScoringOptions;
pub use scoring::rating::Rating;
pub use scoring::score_assessment;
pub use scoring::weights::PillarWeights;
pub use types::answer::{Answer, AnswerMap};
pub use types::pillar::{Pillar, PillarMap};
pub use types::question::QuestionRecord;
pub use types::report::ScoreReport;
