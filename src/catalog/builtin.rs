//! Questionnaires shipped with the binary, one per supported sector.

use super::{parse_raw, Catalog, CatalogFormat, CatalogIndex};
use crate::error::{EsgError, Result};

const SOURCES: &[(&str, &str)] = &[
    ("manufacturing.toml", include_str!("builtin/manufacturing.toml")),
    ("agriculture_food.toml", include_str!("builtin/agriculture_food.toml")),
    ("textile_fashion.toml", include_str!("builtin/textile_fashion.toml")),
    ("tech.toml", include_str!("builtin/tech.toml")),
    ("finance.toml", include_str!("builtin/finance.toml")),
    ("construction.toml", include_str!("builtin/construction.toml")),
    ("furniture.toml", include_str!("builtin/furniture.toml")),
    ("transportation.toml", include_str!("builtin/transportation.toml")),
];

/// Index over every built-in questionnaire.
pub fn builtin_catalogs() -> Result<CatalogIndex> {
    let mut index = CatalogIndex::default();
    for (name, source) in SOURCES {
        let catalog = parse_raw(source, CatalogFormat::Toml)
            .map(Catalog::from_raw)
            .map_err(|e| EsgError::CatalogParse(format!("built-in {name}: {e}")))?;
        index.insert(catalog);
    }
    Ok(index)
}
