//! Agent catalogue: enumerates installed agents from their DDL files.
//!
//! Enumeration is best-effort. An agent whose DDL fails to load is dropped rather than
//! failing the listing, and the result is computed once per process.

use crate::ddl::AgentDdl;
use crate::error::ChoriaError;
use std::cell::OnceCell;

mod fs_source;

pub use fs_source::FsDdlSource;

/// Where agent DDLs come from.
pub trait DdlSource {
    /// Names of every installed agent, in listing order.
    fn agent_names(&self) -> Result<Vec<String>, ChoriaError>;

    /// Load the DDL for one agent.
    fn load(&self, agent: &str) -> Result<AgentDdl, ChoriaError>;
}

/// Memoized view over a [`DdlSource`].
pub struct Catalogue {
    source: Box<dyn DdlSource>,
    ddls: OnceCell<Vec<AgentDdl>>,
}

impl Catalogue {
    pub fn new(source: Box<dyn DdlSource>) -> Self {
        Self {
            source,
            ddls: OnceCell::new(),
        }
    }

    /// Every agent whose DDL loaded, in source order.
    pub fn agent_ddls(&self) -> &[AgentDdl] {
        self.ddls.get_or_init(|| self.collect())
    }

    pub fn find(&self, name: &str) -> Option<&AgentDdl> {
        self.agent_ddls().iter().find(|ddl| ddl.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.agent_ddls().iter().map(AgentDdl::name).collect()
    }

    fn collect(&self) -> Vec<AgentDdl> {
        let names = match self.source.agent_names() {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("Could not enumerate agent plugins: {}", e);
                return Vec::new();
            }
        };

        let ddls: Vec<AgentDdl> = names
            .iter()
            .filter_map(|name| match self.source.load(name) {
                Ok(ddl) => Some(ddl),
                Err(e) => {
                    tracing::debug!(agent = %name, "Skipping agent: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!(count = ddls.len(), "Loaded agent DDLs");
        ddls
    }
}
