use super::CatalogFormat;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Catalog files under `root`, sorted for a stable load order.
pub fn catalog_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| CatalogFormat::from_path(path).is_some())
        .collect();
    files.sort();
    files
}
