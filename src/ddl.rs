//! Agent DDL: the JSON definition document describing an agent and its actions.

use crate::error::ChoriaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDdl {
    pub metadata: AgentMetadata,
    #[serde(default)]
    pub actions: Vec<ActionDdl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub url: String,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDdl {
    pub action: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub input: BTreeMap<String, serde_json::Value>,
}

impl AgentDdl {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn description(&self) -> &str {
        &self.metadata.description
    }

    pub fn action(&self, name: &str) -> Option<&ActionDdl> {
        self.actions.iter().find(|a| a.action == name)
    }

    /// Parse a DDL document; `agent` names the plugin for error reporting.
    pub fn from_json(agent: &str, content: &str) -> Result<Self, ChoriaError> {
        let ddl: AgentDdl = serde_json::from_str(content).map_err(|e| ChoriaError::Ddl {
            agent: agent.to_string(),
            reason: e.to_string(),
        })?;

        if ddl.metadata.name.trim().is_empty() {
            return Err(ChoriaError::Ddl {
                agent: agent.to_string(),
                reason: "metadata name is empty".to_string(),
            });
        }

        Ok(ddl)
    }

    pub fn from_file(agent: &str, path: &Path) -> Result<Self, ChoriaError> {
        let content = std::fs::read_to_string(path).map_err(|e| ChoriaError::Ddl {
            agent: agent.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })?;
        Self::from_json(agent, &content)
    }
}
