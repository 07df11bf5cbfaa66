use super::DdlSource;
use crate::ddl::AgentDdl;
use crate::error::ChoriaError;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::PathBuf;

/// Reads `<libdir>/mcollective/agent/<name>.json` across every libdir.
/// When several libdirs ship the same agent the first one wins.
pub struct FsDdlSource {
    libdirs: Vec<PathBuf>,
}

impl FsDdlSource {
    pub fn new(libdirs: Vec<PathBuf>) -> Self {
        Self { libdirs }
    }

    fn agent_dir(libdir: &std::path::Path) -> PathBuf {
        libdir.join("mcollective").join("agent")
    }

    /// A libdir whose agent directory cannot be read is skipped; the others still count.
    fn discover(&self) -> BTreeMap<String, PathBuf> {
        let mut found = BTreeMap::new();

        for libdir in &self.libdirs {
            let dir = Self::agent_dir(libdir);
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(dir = %dir.display(), "Agent directory not present");
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Failed to read agent directory {}: {}", dir.display(), e);
                    continue;
                }
            };

            for entry in entries {
                let path = match entry {
                    Ok(e) => e.path(),
                    Err(e) => {
                        tracing::warn!("Failed to read directory entry in {}: {}", dir.display(), e);
                        continue;
                    }
                };

                if path.extension() != Some(OsStr::new("json")) {
                    continue;
                }

                if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                    found.entry(name.to_string()).or_insert(path);
                }
            }
        }

        found
    }
}

impl DdlSource for FsDdlSource {
    fn agent_names(&self) -> Result<Vec<String>, ChoriaError> {
        Ok(self.discover().into_keys().collect())
    }

    fn load(&self, agent: &str) -> Result<AgentDdl, ChoriaError> {
        let path = self
            .libdirs
            .iter()
            .map(|libdir| Self::agent_dir(libdir).join(format!("{}.json", agent)))
            .find(|path| path.is_file())
            .ok_or_else(|| ChoriaError::Ddl {
                agent: agent.to_string(),
                reason: "no DDL file found in any libdir".to_string(),
            })?;

        AgentDdl::from_file(agent, &path)
    }
}
