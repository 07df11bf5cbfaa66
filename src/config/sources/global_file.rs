//! User config file source: $XDG_CONFIG_HOME/choria/client.toml or the platform equivalent.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path to the per-user config file.
pub fn user_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().join("choria").join("client.toml"))
}

/// Add the user config file source to builder if it exists.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if path.exists() {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        builder = builder.add_source(File::from(canonical).required(false));
    } else {
        debug!(
            config_path = %path.display(),
            "User configuration file not found, using system defaults"
        );
    }
    Ok(builder)
}
