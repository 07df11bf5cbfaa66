//! Plugin settings directory: `<configdir>/plugin.d/<section>.toml`.

use crate::config::ClientConfig;
use std::ffi::OsStr;
use std::path::Path;

/// Fold every `plugin.d/*.toml` file into `config` as `<section>.<key>` settings.
/// Unreadable or malformed files are skipped with a warning.
pub fn merge_into(config: &mut ClientConfig, dir: &Path) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    let mut files: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension() == Some(OsStr::new("toml")))
        .collect();
    files.sort();

    for path in files {
        let section = match path.file_stem().and_then(|s| s.to_str()) {
            Some(s) => s.to_string(),
            None => {
                tracing::warn!("Invalid plugin config filename (non-UTF8): {:?}", path);
                continue;
            }
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Failed to read plugin config {}: {}", path.display(), e);
                continue;
            }
        };

        let table: toml::Table = match toml::from_str(&content) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("Failed to parse plugin config {}: {}", path.display(), e);
                continue;
            }
        };

        match serde_json::to_value(&table) {
            Ok(values) => config.merge_plugin_section(&section, &values),
            Err(e) => {
                tracing::warn!("Failed to convert plugin config {}: {}", path.display(), e);
            }
        }
    }
}
