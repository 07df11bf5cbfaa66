//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

pub const DEFAULT_LIBDIR: &str = "/opt/puppetlabs/mcollective/plugins";
pub const DEFAULT_DISPATCH_COMMAND: &str = "mco";
pub const DEFAULT_DISPATCH_SUBCOMMAND: &str = "rpc";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("libdir", vec![DEFAULT_LIBDIR])?
        .set_default("dispatcher.command", DEFAULT_DISPATCH_COMMAND)?
        .set_default("dispatcher.args", vec![DEFAULT_DISPATCH_SUBCOMMAND])
}
