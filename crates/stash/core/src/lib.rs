//! Grid-based container engine.
//!
//! `stash-core` places, merges, splits, removes and queries multi-cell item
//! instances inside a fixed-size grid, subject to stacking limits, weight
//! budgets and placement permissions. All mutation flows through
//! [`container::GridContainer`]; collaborators (item factory, permission
//! checkers, change sink) are injected through [`env::ContainerEnv`].
//!
//! The engine is synchronous and performs no I/O. Failures are returned as
//! [`OpError`] values and never leave the grid in a partially written state,
//! with the single documented exception of [`OpError::Incomplete`].
pub mod config;
pub mod container;
pub mod env;
pub mod error;
pub mod grid;
pub mod item;

pub use config::{
    ConfigError, ContainerAccess, ContainerCategory, ContainerConfig, ContainerMode,
    GridDimensions, WeightBudget,
};
pub use container::{
    ContainerSnapshot, Dropped, GridContainer, ItemRecord, LoadFailure, LoadReport, Placement,
};
pub use env::{
    CategoryPermission, ChangeCounter, ChangeSink, ContainerEnv, DefaultFactory, ItemCatalog,
    ItemFactory, MemoryCatalog, NoopSink, PermissionChecker, PermissionSet, RarityPermission,
};
pub use error::{ErrorSeverity, OpCode, OpError, OpResult, Rejected, StashError};
pub use grid::{Cell, GridStore, Overlap, SlotKey};
pub use item::{
    Collectible, ContainerHandle, Footprint, ItemCategory, ItemHandle, ItemInstance, ItemKind,
    ItemRarity, KindError, MergeOutcome, NestedContainerSpec, Orientation, merge_stack,
};
