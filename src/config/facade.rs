//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::LoadedConfig;
use crate::error::ChoriaError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the system file, the user file and environment.
    pub fn load() -> Result<LoadedConfig, ChoriaError> {
        MergeService::load()
    }

    /// `--config` file when given, otherwise the standard files.
    pub fn load_for(config_file: Option<&Path>) -> Result<LoadedConfig, ChoriaError> {
        match config_file {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<LoadedConfig, ChoriaError> {
        MergeService::load_from_file(path)
    }

    /// Load from an explicit system/user pair. Either file may be missing.
    pub fn load_from_paths(
        system_file: &Path,
        user_file: Option<&Path>,
    ) -> Result<LoadedConfig, ChoriaError> {
        MergeService::load_from_paths(system_file, user_file)
    }
}
