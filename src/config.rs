use crate::error::{EsgError, Result};
use crate::types::config::EsgConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "esgscore.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".esgscore/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/esgscore/config.toml";

/// Where a config file sits in the merge order, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigLayer {
    Global,
    Project,
    Local,
}

impl ConfigLayer {
    fn name(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Project => "project",
            Self::Local => "local",
        }
    }
}

/// Loads `esgscore.toml` from `root`, layered over the user-global file and
/// under `.esgscore/local.toml`. Returns `None` when the project file is absent.
pub fn load_config(root: &Path) -> Result<Option<EsgConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<EsgConfig>> {
    let project = root.join(DEFAULT_CONFIG_FILE);
    if !project.exists() {
        return Ok(None);
    }

    let layers = global_path
        .map(|path| (ConfigLayer::Global, path.to_path_buf()))
        .into_iter()
        .chain([
            (ConfigLayer::Project, project),
            (ConfigLayer::Local, root.join(DEFAULT_LOCAL_FILE)),
        ]);

    let mut merged = Value::Table(Map::new());
    for (layer, path) in layers {
        if !path.exists() {
            continue;
        }
        overlay(&mut merged, read_layer(&path)?);
        debug!(layer = layer.name(), path = %path.display(), "config layer applied");
    }

    let cfg: EsgConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| EsgError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(Some(cfg))
}

fn read_layer(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| EsgError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn sector_key(value: &Value) -> Option<String> {
    value
        .get("name")
        .and_then(Value::as_str)
        .map(|name| name.trim().to_lowercase())
}

/// Tables merge key by key. `[[sectors]]` entries merge by case-insensitive
/// name so a later layer can retune one sector without restating the rest.
/// Any other value, `[[bands]]` included, is replaced wholesale.
fn overlay(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Table(base), Value::Table(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(Value::Array(existing)) if key == "sectors" && value.is_array() => {
                        if let Value::Array(incoming) = value {
                            overlay_sectors(existing, incoming);
                        }
                    }
                    Some(existing) => overlay(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn overlay_sectors(existing: &mut Vec<Value>, incoming: Vec<Value>) {
    for sector in incoming {
        let key = sector_key(&sector);
        let position = key
            .as_ref()
            .and_then(|key| existing.iter().position(|e| sector_key(e).as_ref() == Some(key)));
        match position {
            Some(index) => existing[index] = sector,
            None => existing.push(sector),
        }
    }
}
