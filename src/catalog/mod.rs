//! Question catalogs: per-sector question lists loaded from TOML or JSON and
//! normalized into [`QuestionRecord`]s.

pub mod builtin;
pub mod filesystem;
pub mod infer;

use crate::error::{EsgError, Result};
use crate::types::pillar::Pillar;
use crate::types::question::{normalize_tags, QuestionRecord};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Toml,
    Json,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Some(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawCatalog {
    sector: String,
    key: Option<String>,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawQuestion {
    id: Option<String>,
    #[serde(alias = "question")]
    text: Option<String>,
    pillar: Option<String>,
    category: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    critical: bool,
    weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub sector: String,
    /// Prefix of generated question ids. Defaults to `sector`; differs for
    /// names such as `Agriculture/Food` whose ids read `AgricultureFood-1`.
    pub key: String,
    pub questions: Vec<QuestionRecord>,
}

impl Catalog {
    pub fn parse_str(content: &str, format: CatalogFormat) -> Result<Self> {
        parse_raw(content, format)
            .map(Self::from_raw)
            .map_err(EsgError::CatalogParse)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(EsgError::PathNotFound(path.display().to_string()));
        }
        let format = CatalogFormat::from_path(path).ok_or_else(|| {
            EsgError::CatalogParse(format!(
                "{}: expected a .toml or .json catalog",
                path.display()
            ))
        })?;
        let content = std::fs::read_to_string(path)?;
        let catalog = parse_raw(&content, format)
            .map(Self::from_raw)
            .map_err(|e| EsgError::CatalogParse(format!("{}: {}", path.display(), e)))?;
        debug!(
            path = %path.display(),
            sector = %catalog.sector,
            questions = catalog.questions.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    fn from_raw(raw: RawCatalog) -> Self {
        let key = raw
            .key
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| raw.sector.clone());
        let questions = raw
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, question)| normalize_question(&key, index, question))
            .collect();
        Self {
            sector: raw.sector,
            key,
            questions,
        }
    }
}

fn parse_raw(content: &str, format: CatalogFormat) -> std::result::Result<RawCatalog, String> {
    match format {
        CatalogFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        CatalogFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    }
}

fn normalize_question(key: &str, index: usize, raw: RawQuestion) -> QuestionRecord {
    let pillar = Pillar::resolve(raw.pillar.as_deref(), raw.category.as_deref());
    if let Some(code) = raw.pillar.as_deref() {
        if Pillar::from_code(code).is_none() && !code.trim().is_empty() {
            warn!(pillar = code, "unrecognised pillar, using E");
        }
    }

    let explicit_tags = normalize_tags(&raw.tags);
    let tags = if explicit_tags.is_empty() {
        infer::infer_tags(raw.text.as_deref().unwrap_or_default(), pillar)
    } else {
        explicit_tags
    };

    let weight = match raw.weight {
        Some(weight) if weight.is_finite() => weight,
        _ => infer::infer_weight(pillar, &tags, raw.critical),
    };

    let id = raw
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| format!("{}-{}", key, index + 1));

    QuestionRecord {
        id,
        pillar,
        text: raw.text,
        tags,
        critical: raw.critical,
        weight: Some(weight),
    }
}

/// Catalogs keyed by lowercased sector name, also reachable by their key.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    catalogs: BTreeMap<String, Catalog>,
    aliases: BTreeMap<String, String>,
}

impl CatalogIndex {
    /// Loads every `.toml`/`.json` catalog beneath `root`. A later file for
    /// the same sector replaces an earlier one.
    pub fn load_dir(root: &Path) -> Result<Self> {
        if !root.exists() {
            return Err(EsgError::PathNotFound(root.display().to_string()));
        }
        let mut index = Self::default();
        for path in filesystem::catalog_files(root) {
            index.insert(Catalog::load(&path)?);
        }
        Ok(index)
    }

    pub fn insert(&mut self, catalog: Catalog) {
        let name = catalog.sector.to_lowercase();
        let key = catalog.key.to_lowercase();
        if key != name {
            self.aliases.insert(key, name.clone());
        }
        self.catalogs.insert(name, catalog);
    }

    pub fn get(&self, sector: &str) -> Option<&Catalog> {
        let wanted = sector.trim().to_lowercase();
        self.catalogs.get(&wanted).or_else(|| {
            self.aliases
                .get(&wanted)
                .and_then(|name| self.catalogs.get(name))
        })
    }

    pub fn require(&self, sector: &str) -> Result<&Catalog> {
        self.get(sector)
            .ok_or_else(|| EsgError::UnknownSector(sector.to_string()))
    }

    pub fn catalogs(&self) -> impl Iterator<Item = &Catalog> {
        self.catalogs.values()
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}
