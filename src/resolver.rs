//! Configuration resolver: certificate identity, SSL paths, middleware and Puppet endpoints.
//!
//! The CLI only consumes [`ConfigResolver`]; [`PuppetResolver`] is the default
//! implementation built from the client configuration and Puppet AIO conventions.

use crate::error::ChoriaError;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

mod puppet;

pub use puppet::{PuppetResolver, ResolverIdentity};

/// A host and port pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub target: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(target: impl Into<String>, port: u16) -> Self {
        Self {
            target: target.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.target, self.port)
    }
}

/// Resolved client configuration and SSL state.
pub trait ConfigResolver {
    /// Identity bound to the client certificate.
    fn certname(&self) -> String;

    fn ssl_dir(&self) -> PathBuf;
    fn has_ssl_dir(&self) -> bool;

    fn client_public_cert(&self) -> PathBuf;
    fn has_client_public_cert(&self) -> bool;

    fn client_private_key(&self) -> PathBuf;
    fn has_client_private_key(&self) -> bool;

    fn ca_path(&self) -> PathBuf;
    fn has_ca(&self) -> bool;

    fn csr_path(&self) -> PathBuf;
    fn has_csr(&self) -> bool;

    /// Whether the certificate, key and CA form a usable setup.
    fn check_ssl_setup(&self, log: bool) -> Result<bool, ChoriaError>;

    fn should_use_srv(&self) -> bool;
    fn srv_domain(&self) -> String;

    /// Middleware brokers, falling back to `default_host:default_port`.
    fn middleware_servers(
        &self,
        default_host: &str,
        default_port: u16,
    ) -> Result<Vec<Endpoint>, ChoriaError>;

    fn puppet_server(&self) -> Endpoint;
    fn puppetca_server(&self) -> Endpoint;
    fn puppetdb_server(&self) -> Endpoint;

    /// Puppet environment requests are scoped to.
    fn environment(&self) -> String;

    fn facter_cmd(&self) -> String;
    fn facter_domain(&self) -> String;

    /// Flattened plugin settings (`choria.srv_domain = ...`).
    fn plugin_config(&self) -> BTreeMap<String, String>;

    /// Release any held connection. Idempotent.
    fn disconnect(&self);
}
