//! Content factory for resolving data files under one directory.

use std::path::{Path, PathBuf};

use stash_core::{ContainerConfig, MemoryCatalog};

use crate::loaders::{ConfigLoader, ItemLoader, LoadResult};

/// Content factory that loads catalogs and container layouts from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── items.ron
/// └── containers/
///     ├── backpack.toml
///     └── stash.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load and validate the item catalog from `items.ron`.
    pub fn load_catalog(&self) -> LoadResult<MemoryCatalog> {
        let path = self.data_dir.join("items.ron");
        ItemLoader::load_catalog(&path)
    }

    /// Load a container layout from `containers/{name}.toml`.
    pub fn load_container(&self, name: &str) -> LoadResult<ContainerConfig> {
        let path = self.container_path(name);
        ConfigLoader::load(&path)
    }

    pub fn container_path(&self, name: &str) -> PathBuf {
        self.data_dir.join("containers").join(format!("{}.toml", name))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
