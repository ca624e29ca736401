//! The container: a grid plus its weight budget, mode and collaborators.
//!
//! Every mutation of a [`GridStore`] goes through [`GridContainer`]. Public
//! operations run to completion before returning and raise at most one change
//! notification, and only when the grid actually changed.
mod ops;
mod persist;
mod weight;

pub use ops::{Dropped, Placement};
pub use persist::{ContainerSnapshot, ItemRecord, LoadFailure, LoadReport};

use crate::config::{
    ConfigError, ContainerAccess, ContainerCategory, ContainerConfig, ContainerMode,
    GridDimensions,
};
use crate::env::ContainerEnv;
use crate::grid::{Cell, GridStore};
use crate::item::{ItemHandle, ItemInstance};

#[derive(Debug)]
pub struct GridContainer {
    config: ContainerConfig,
    grid: GridStore,
    env: ContainerEnv,
}

impl GridContainer {
    /// Initializes an empty container. The configuration is validated first.
    pub fn new(config: ContainerConfig, env: ContainerEnv) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::debug!(
            id = %config.id,
            width = config.dimensions.width,
            height = config.dimensions.height,
            "container initialized"
        );
        Ok(Self {
            grid: GridStore::new(config.dimensions),
            config,
            env,
        })
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.config.dimensions
    }

    pub fn mode(&self) -> ContainerMode {
        self.config.mode
    }

    pub fn category(&self) -> ContainerCategory {
        self.config.category
    }

    pub fn env(&self) -> &ContainerEnv {
        &self.env
    }

    /// Read-only view of the cell table.
    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn get(&self, cell: Cell) -> Option<&ItemInstance> {
        self.grid.get(cell)
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Number of distinct stored instances.
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// Distinct stored instances in row-major order of their first cell.
    pub fn instances(&self) -> Vec<&ItemInstance> {
        self.grid.iter().map(|(_, instance)| instance).collect()
    }

    pub fn find_instance(&self, handle: ItemHandle) -> Option<&ItemInstance> {
        self.grid
            .first_of(handle)
            .and_then(|key| self.grid.instance(key))
    }

    /// Total amount of `handle` summed over distinct instances.
    pub fn amount_of(&self, handle: ItemHandle) -> u64 {
        self.grid
            .iter()
            .filter(|(_, instance)| instance.handle() == handle)
            .map(|(_, instance)| u64::from(instance.amount()))
            .sum()
    }

    pub fn access(&self) -> ContainerAccess {
        self.config.mode.access()
    }

    pub fn can_pick_up(&self) -> bool {
        self.config.mode.can_pick_up()
    }

    pub fn can_place(&self, from_same_container: bool) -> bool {
        self.config.mode.can_place(from_same_container)
    }

    pub fn can_use(&self) -> bool {
        self.config.mode.can_use()
    }

    fn notify(&self) {
        self.env.sink().changed();
    }
}
