//! Item definitions and placed item instances.
//!
//! - [`ItemKind`]: immutable definition owned by the catalog, shared via `Arc`
//! - [`ItemInstance`]: a quantity of one kind, stored in a grid or carried
mod instance;
mod kind;

pub use instance::{
    Collectible, ContainerHandle, ItemInstance, MergeOutcome, Orientation, merge_stack,
};
pub use kind::{
    Footprint, ItemCategory, ItemHandle, ItemKind, ItemRarity, KindError, NestedContainerSpec,
};
