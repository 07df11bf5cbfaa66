use super::{ConfigResolver, Endpoint};
use crate::config::ClientConfig;
use crate::error::ChoriaError;
use std::cell::{Cell, OnceCell};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

const AIO_FACTER: &str = "/opt/puppetlabs/bin/facter";
const ROOT_SSL_DIR: &str = "/etc/puppetlabs/puppet/ssl";

/// Who the client runs as; drives certname and SSL directory defaults.
#[derive(Debug, Clone, Default)]
pub struct ResolverIdentity {
    pub user: Option<String>,
    pub home: Option<PathBuf>,
    pub hostname: Option<String>,
}

impl ResolverIdentity {
    /// Identity of the current process, from the environment.
    pub fn current() -> Self {
        let hostname = std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());

        Self {
            user: std::env::var("USER").ok().filter(|u| !u.is_empty()),
            home: directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()),
            hostname,
        }
    }

    fn is_root(&self) -> bool {
        self.user.as_deref() == Some("root")
    }
}

/// Resolves settings from `choria.*` plugin config with Puppet AIO defaults.
/// Does not perform DNS SRV lookups.
pub struct PuppetResolver {
    settings: BTreeMap<String, String>,
    identity: ResolverIdentity,
    environment: String,
    facter_domain: OnceCell<String>,
    connected: Cell<bool>,
}

impl PuppetResolver {
    pub fn new(config: &ClientConfig, environment: &str) -> Self {
        Self::with_identity(config, environment, ResolverIdentity::current())
    }

    pub fn with_identity(
        config: &ClientConfig,
        environment: &str,
        identity: ResolverIdentity,
    ) -> Self {
        Self {
            settings: config.plugin_settings(),
            identity,
            environment: environment.to_string(),
            facter_domain: OnceCell::new(),
            connected: Cell::new(true),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn setting(&self, key: &str) -> Option<&str> {
        self.settings
            .get(&format!("choria.{}", key))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn port_setting(&self, key: &str, default: u16) -> u16 {
        match self.setting(key).map(str::parse::<u16>) {
            Some(Ok(port)) => port,
            Some(Err(e)) => {
                tracing::warn!("Ignoring invalid choria.{}: {}", key, e);
                default
            }
            None => default,
        }
    }

    fn file_present(path: &Path) -> bool {
        path.is_file()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

/// First executable `facter` on `paths`.
fn find_facter(paths: Option<OsString>) -> Option<PathBuf> {
    which::which_in("facter", paths, "/").ok()
}

/// Parse `host:port, host2` into endpoints; entries without a port use `default_port`.
fn parse_hosts(hosts: &str, default_port: u16) -> Result<Vec<Endpoint>, ChoriaError> {
    hosts
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.rsplit_once(':') {
            Some((host, port)) => port
                .parse::<u16>()
                .map(|port| Endpoint::new(host, port))
                .map_err(|_| {
                    ChoriaError::User(format!(
                        "Invalid middleware host `{}` in choria.middleware_hosts",
                        entry
                    ))
                }),
            None => Ok(Endpoint::new(entry, default_port)),
        })
        .collect()
}

impl ConfigResolver for PuppetResolver {
    fn certname(&self) -> String {
        if let Some(name) = self.setting("certname") {
            return name.to_string();
        }
        if let Ok(name) = std::env::var("MCOLLECTIVE_CERTNAME") {
            if !name.is_empty() {
                return name;
            }
        }
        match (&self.identity.user, self.identity.is_root()) {
            (Some(user), false) => format!("{}.mcollective", user),
            _ => self
                .identity
                .hostname
                .clone()
                .unwrap_or_else(|| "localhost".to_string()),
        }
    }

    fn ssl_dir(&self) -> PathBuf {
        if let Some(dir) = self.setting("ssl_dir") {
            return PathBuf::from(dir);
        }
        match (&self.identity.home, self.identity.is_root()) {
            (Some(home), false) => home.join(".puppetlabs").join("etc").join("puppet").join("ssl"),
            _ => PathBuf::from(ROOT_SSL_DIR),
        }
    }

    fn has_ssl_dir(&self) -> bool {
        self.ssl_dir().is_dir()
    }

    fn client_public_cert(&self) -> PathBuf {
        self.ssl_dir()
            .join("certs")
            .join(format!("{}.pem", self.certname()))
    }

    fn has_client_public_cert(&self) -> bool {
        Self::file_present(&self.client_public_cert())
    }

    fn client_private_key(&self) -> PathBuf {
        self.ssl_dir()
            .join("private_keys")
            .join(format!("{}.pem", self.certname()))
    }

    fn has_client_private_key(&self) -> bool {
        Self::file_present(&self.client_private_key())
    }

    fn ca_path(&self) -> PathBuf {
        self.ssl_dir().join("certs").join("ca.pem")
    }

    fn has_ca(&self) -> bool {
        Self::file_present(&self.ca_path())
    }

    fn csr_path(&self) -> PathBuf {
        self.ssl_dir()
            .join("certificate_requests")
            .join(format!("{}.pem", self.certname()))
    }

    fn has_csr(&self) -> bool {
        Self::file_present(&self.csr_path())
    }

    fn check_ssl_setup(&self, log: bool) -> Result<bool, ChoriaError> {
        let required = [
            ("client public certificate", self.client_public_cert()),
            ("client private key", self.client_private_key()),
            ("CA certificate", self.ca_path()),
        ];

        for (label, path) in &required {
            let problem = match std::fs::metadata(path) {
                Ok(meta) if meta.len() > 0 => continue,
                Ok(_) => format!("The {} at {} is empty", label, path.display()),
                Err(_) => format!("Cannot find the {} at {}", label, path.display()),
            };
            if log {
                tracing::warn!("{}", problem);
            }
            return Err(ChoriaError::User(problem));
        }

        Ok(true)
    }

    fn should_use_srv(&self) -> bool {
        self.setting("use_srv_records")
            .and_then(parse_bool)
            .unwrap_or(true)
    }

    fn srv_domain(&self) -> String {
        match self.setting("srv_domain") {
            Some(domain) => domain.to_string(),
            None => self.facter_domain(),
        }
    }

    fn middleware_servers(
        &self,
        default_host: &str,
        default_port: u16,
    ) -> Result<Vec<Endpoint>, ChoriaError> {
        if let Some(hosts) = self.setting("middleware_hosts") {
            let parsed = parse_hosts(hosts, default_port)?;
            if !parsed.is_empty() {
                return Ok(parsed);
            }
        }
        Ok(vec![Endpoint::new(default_host, default_port)])
    }

    fn puppet_server(&self) -> Endpoint {
        Endpoint::new(
            self.setting("puppetserver_host").unwrap_or("puppet"),
            self.port_setting("puppetserver_port", 8140),
        )
    }

    fn puppetca_server(&self) -> Endpoint {
        let puppet = self.puppet_server();
        Endpoint::new(
            self.setting("puppetca_host").unwrap_or(puppet.target.as_str()),
            self.port_setting("puppetca_port", puppet.port),
        )
    }

    fn puppetdb_server(&self) -> Endpoint {
        Endpoint::new(
            self.setting("puppetdb_host").unwrap_or("puppet"),
            self.port_setting("puppetdb_port", 8081),
        )
    }

    fn environment(&self) -> String {
        self.environment.clone()
    }

    fn facter_cmd(&self) -> String {
        if let Some(cmd) = self.setting("facter_cmd") {
            return cmd.to_string();
        }
        if Path::new(AIO_FACTER).is_file() {
            return AIO_FACTER.to_string();
        }
        find_facter(std::env::var_os("PATH"))
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }

    fn facter_domain(&self) -> String {
        self.facter_domain
            .get_or_init(|| {
                let cmd = self.facter_cmd();
                if cmd.is_empty() {
                    return String::new();
                }
                match Command::new(&cmd).arg("networking.domain").output() {
                    Ok(output) if output.status.success() => {
                        String::from_utf8_lossy(&output.stdout).trim().to_string()
                    }
                    Ok(output) => {
                        tracing::debug!(status = ?output.status, "facter did not report a domain");
                        String::new()
                    }
                    Err(e) => {
                        tracing::debug!("Could not run {}: {}", cmd, e);
                        String::new()
                    }
                }
            })
            .clone()
    }

    fn plugin_config(&self) -> BTreeMap<String, String> {
        self.settings.clone()
    }

    fn disconnect(&self) {
        if self.connected.replace(false) {
            tracing::debug!("Disconnected from middleware");
        }
    }
}
