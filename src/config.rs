//! Configuration System
//!
//! Layered client configuration: built-in defaults, the system file, the user file and
//! `CHORIA__*` environment overrides, followed by per-plugin files from `plugin.d`.
//! Plugin settings are exposed flattened to dotted keys (`choria.srv_domain`).

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::user_config_path;
pub use sources::system_file::SYSTEM_CONFIG_PATH;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Plugin library roots; agent DDLs live under `<libdir>/mcollective/agent`
    #[serde(default = "default_libdir")]
    pub libdir: Vec<PathBuf>,

    /// Raw plugin settings, nested or dotted
    #[serde(default)]
    pub plugin: BTreeMap<String, serde_json::Value>,

    /// External command used to perform RPC requests
    #[serde(default)]
    pub dispatcher: DispatcherConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_libdir() -> Vec<PathBuf> {
    vec![PathBuf::from(merge::merge_policy::DEFAULT_LIBDIR)]
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            libdir: default_libdir(),
            plugin: BTreeMap::new(),
            dispatcher: DispatcherConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    #[serde(default = "default_dispatch_command")]
    pub command: String,

    /// Arguments placed before `<agent> <action>`
    #[serde(default = "default_dispatch_args")]
    pub args: Vec<String>,
}

fn default_dispatch_command() -> String {
    merge::merge_policy::DEFAULT_DISPATCH_COMMAND.to_string()
}

fn default_dispatch_args() -> Vec<String> {
    vec![merge::merge_policy::DEFAULT_DISPATCH_SUBCOMMAND.to_string()]
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            command: default_dispatch_command(),
            args: default_dispatch_args(),
        }
    }
}

impl ClientConfig {
    /// Plugin settings flattened to `section.key = value` strings.
    pub fn plugin_settings(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for (key, value) in &self.plugin {
            flatten_into(key, value, &mut out);
        }
        out
    }

    /// Add settings read from `plugin.d/<section>.toml`. Keys already set by the
    /// main configuration win.
    pub fn merge_plugin_section(&mut self, section: &str, values: &serde_json::Value) {
        let existing = self.plugin_settings();
        let mut incoming = BTreeMap::new();
        flatten_into(section, values, &mut incoming);
        for (key, value) in incoming {
            if !existing.contains_key(&key) {
                self.plugin.insert(key, serde_json::Value::String(value));
            }
        }
    }
}

fn flatten_into(prefix: &str, value: &serde_json::Value, out: &mut BTreeMap<String, String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(&format!("{}.{}", prefix, key), nested, out);
            }
        }
        serde_json::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        serde_json::Value::Array(items) => {
            let joined: Vec<String> = items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            out.insert(prefix.to_string(), joined.join(","));
        }
        serde_json::Value::Null => {
            out.insert(prefix.to_string(), String::new());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

/// Resolved configuration plus the files it was read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ClientConfig,
    /// Highest-precedence file that was actually read
    pub active_file: Option<PathBuf>,
    /// Per-user configuration file location, whether or not it exists
    pub user_file: Option<PathBuf>,
    /// Directory holding the active file and its `plugin.d`
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    pub fn plugin_dir(&self) -> PathBuf {
        self.config_dir.join("plugin.d")
    }
}
