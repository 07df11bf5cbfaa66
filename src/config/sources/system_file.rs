//! System config file source: /etc/choria/client.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;

pub const SYSTEM_CONFIG_PATH: &str = "/etc/choria/client.toml";

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if path.exists() {
        Ok(builder.add_source(File::from(path.to_path_buf()).required(false)))
    } else {
        Ok(builder)
    }
}
