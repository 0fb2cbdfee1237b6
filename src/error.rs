use thiserror::Error;

#[derive(Error, Debug)]
pub enum EsgError {
    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("catalog parse error: {0}")]
    CatalogParse(String),

    #[error("answers parse error: {0}")]
    AnswersParse(String),

    #[error("no catalog found for sector: {0}")]
    UnknownSector(String),

    #[error("invalid pillar weights: {0}")]
    InvalidWeights(String),

    #[error("telemetry error: {0}")]
    Telemetry(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scoring options: {0}")]
    InvalidOptions(String),

    #[error("assessment cooldown active: {0}")]
    CooldownActive(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EsgError>;
