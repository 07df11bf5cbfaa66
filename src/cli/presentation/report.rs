//! Configuration report for `choria --show-config`.

use crate::cli::output::{paint, Tone};
use crate::config::LoadedConfig;
use crate::error::ChoriaError;
use crate::resolver::ConfigResolver;
use std::path::{Path, PathBuf};

const LABEL_WIDTH: usize = 20;
const MIDDLEWARE_DEFAULT_HOST: &str = "puppet";
const MIDDLEWARE_DEFAULT_PORT: u16 = 42222;

/// Version and file locations shown in the report header.
#[derive(Debug, Clone)]
pub struct ConfigFiles {
    pub version: String,
    pub client_config_file: Option<PathBuf>,
    pub active_config_file: Option<PathBuf>,
    pub plugin_config_dir: PathBuf,
}

impl ConfigFiles {
    pub fn from_loaded(loaded: &LoadedConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            client_config_file: loaded.user_file.clone(),
            active_config_file: loaded.active_file.clone(),
            plugin_config_dir: loaded.plugin_dir(),
        }
    }
}

fn line(label: &str, value: impl std::fmt::Display) -> String {
    format!("{:>width$}: {}", label, value, width = LABEL_WIDTH)
}

fn optional_path(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "none".to_string())
}

fn presence(path: &Path, found: bool, color: bool) -> String {
    let state = if found {
        paint("found", Tone::Green, color)
    } else {
        paint("absent", Tone::Red, color)
    };
    format!("{} ({})", path.display(), state)
}

/// Render the fully resolved configuration. Queries `resolver` in report order;
/// callers disconnect it first.
pub fn format_config_report(
    files: &ConfigFiles,
    resolver: &dyn ConfigResolver,
    color: bool,
) -> Result<String, ChoriaError> {
    let mut out = vec![
        "Active Choria configuration:".to_string(),
        String::new(),
        "The active configuration used in Choria comes from using Puppet AIO defaults, querying SRV".to_string(),
        "records and reading configuration files.  The below information shows the completely resolved".to_string(),
        "configuration that will be used when running Choria commands".to_string(),
        String::new(),
        "MCollective related:".to_string(),
        String::new(),
    ];

    out.push(line("Choria Version", &files.version));
    out.push(line(
        "Client Config File",
        optional_path(files.client_config_file.as_deref()),
    ));
    out.push(line(
        "Active Config File",
        optional_path(files.active_config_file.as_deref()),
    ));
    out.push(line("Plugin Config Dir", files.plugin_config_dir.display()));
    out.push(line("Using SRV Records", resolver.should_use_srv()));
    out.push(line("SRV Domain", resolver.srv_domain()));

    let middleware: Vec<String> = resolver
        .middleware_servers(MIDDLEWARE_DEFAULT_HOST, MIDDLEWARE_DEFAULT_PORT)?
        .iter()
        .map(ToString::to_string)
        .collect();
    out.push(line("Middleware Servers", middleware.join(", ")));
    out.push(String::new());

    out.push("Puppet related:".to_string());
    out.push(String::new());
    out.push(line("Puppet Server", resolver.puppet_server()));
    out.push(line("PuppetCA Server", resolver.puppetca_server()));
    out.push(line("PuppetDB Server", resolver.puppetdb_server()));
    out.push(line("Puppet Environment", resolver.environment()));
    out.push(line("Facter Command", resolver.facter_cmd()));
    out.push(line("Facter Domain", resolver.facter_domain()));
    out.push(String::new());

    out.push("SSL setup:".to_string());
    out.push(String::new());

    let valid_ssl = resolver.check_ssl_setup(false).unwrap_or(false);
    if valid_ssl {
        out.push(line("Valid SSL Setup", paint("yes", Tone::Green, color)));
    } else {
        out.push(line(
            "Valid SSL Setup",
            format!(
                "{} run 'choria request_cert'",
                paint("no", Tone::Red, color)
            ),
        ));
    }

    out.push(line("Certname", resolver.certname()));
    out.push(line(
        "SSL Directory",
        presence(&resolver.ssl_dir(), resolver.has_ssl_dir(), color),
    ));
    out.push(line(
        "Client Public Cert",
        presence(
            &resolver.client_public_cert(),
            resolver.has_client_public_cert(),
            color,
        ),
    ));
    out.push(line(
        "Client Private Key",
        presence(
            &resolver.client_private_key(),
            resolver.has_client_private_key(),
            color,
        ),
    ));
    out.push(line(
        "CA Path",
        presence(&resolver.ca_path(), resolver.has_ca(), color),
    ));
    out.push(line(
        "CSR Path",
        presence(&resolver.csr_path(), resolver.has_csr(), color),
    ));
    out.push(String::new());

    out.push("Active Choria configuration settings as found in configuration files:".to_string());
    out.push(String::new());

    let settings: Vec<(String, String)> = resolver
        .plugin_config()
        .into_iter()
        .filter(|(key, _)| key.starts_with("choria"))
        .collect();

    if settings.is_empty() {
        out.push("  No custom Choria settings found in your configuration files".to_string());
    } else {
        out.extend(align_settings(&settings));
    }

    Ok(out.join("\n"))
}

/// Right-align keys two columns past the longest one.
fn align_settings(settings: &[(String, String)]) -> Vec<String> {
    let padding = settings
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0)
        + 2;
    settings
        .iter()
        .map(|(key, value)| format!("{:>width$}: {}", key, value, width = padding))
        .collect()
}
