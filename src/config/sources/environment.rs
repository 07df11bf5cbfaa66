//! Environment source: CHORIA__LIBDIR, CHORIA__DISPATCHER__COMMAND, ...

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add `CHORIA__`-prefixed variables. `libdir` is parsed as a `:` separated list.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix("CHORIA")
            .separator("__")
            .try_parsing(true)
            .list_separator(":")
            .with_list_parse_key("libdir"),
    ))
}
