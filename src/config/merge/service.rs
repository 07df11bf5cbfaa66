//! MergeService: orchestrates sources, applies merge policy, deserializes to ClientConfig.

use crate::config::sources::{environment, global_file, plugin_dir, system_file};
use crate::config::{ClientConfig, LoadedConfig};
use crate::error::ChoriaError;
use config::File;
use std::path::{Path, PathBuf};

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from the standard locations.
    /// Precedence: system file (lowest) -> user file -> environment (highest).
    pub fn load() -> Result<LoadedConfig, ChoriaError> {
        let user_file = global_file::user_config_path();
        Self::load_from_paths(Path::new(system_file::SYSTEM_CONFIG_PATH), user_file.as_deref())
    }

    pub fn load_from_paths(
        system_path: &Path,
        user_path: Option<&Path>,
    ) -> Result<LoadedConfig, ChoriaError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = system_file::add_to_builder(builder, system_path)?;
        let builder = match user_path {
            Some(path) => global_file::add_to_builder(builder, path)?,
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;

        let config: ClientConfig = builder.build()?.try_deserialize()?;

        let active_file = user_path
            .filter(|p| p.is_file())
            .or_else(|| Some(system_path).filter(|p| p.is_file()))
            .map(Path::to_path_buf);

        let config_dir = active_file
            .as_deref()
            .or(user_path)
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self::finish(config, active_file, user_path.map(Path::to_path_buf), config_dir))
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<LoadedConfig, ChoriaError> {
        if !path.is_file() {
            return Err(ChoriaError::Config(format!(
                "Configuration file {} does not exist",
                path.display()
            )));
        }

        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder)?;

        let config: ClientConfig = builder.build()?.try_deserialize()?;
        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self::finish(
            config,
            Some(path.to_path_buf()),
            global_file::user_config_path(),
            config_dir,
        ))
    }

    fn finish(
        mut config: ClientConfig,
        active_file: Option<PathBuf>,
        user_file: Option<PathBuf>,
        config_dir: PathBuf,
    ) -> LoadedConfig {
        plugin_dir::merge_into(&mut config, &config_dir.join("plugin.d"));
        LoadedConfig {
            config,
            active_file,
            user_file,
            config_dir,
        }
    }
}
