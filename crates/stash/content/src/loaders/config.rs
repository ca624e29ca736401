//! Container configuration loader.

use std::path::Path;

use stash_core::ContainerConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for container configurations from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a container configuration from a TOML file.
    pub fn load(path: &Path) -> LoadResult<ContainerConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ContainerConfig> {
        let config: ContainerConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse container TOML: {}", e))?;
        config.validate()?;

        Ok(config)
    }
}
