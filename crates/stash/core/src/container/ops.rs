//! Mutating operations.
//!
//! Every operation validates before writing. Rejections leave the grid
//! untouched; only [`OpError::Incomplete`] reports a partially applied request.
use std::sync::Arc;

use super::GridContainer;
use crate::env::PermissionChecker;
use crate::error::{OpError, OpResult, Rejected};
use crate::grid::{Cell, SlotKey};
use crate::item::{
    Collectible, ContainerHandle, ItemHandle, ItemInstance, ItemKind, MergeOutcome, merge_stack,
};

/// Successful outcome of a checked placement.
#[derive(Debug, PartialEq)]
pub enum Placement {
    /// The instance now occupies the target rectangle. A different-kind
    /// occupant, if any, was released and is handed back as `displaced`.
    Placed { displaced: Option<ItemInstance> },
    /// The instance was fully absorbed by a same-kind stack.
    Merged,
    /// The same-kind stack is now full; the caller keeps the remainder.
    PartiallyMerged { remainder: ItemInstance },
}

impl Placement {
    /// Instance the caller is left holding after the placement.
    pub fn into_carried(self) -> Option<ItemInstance> {
        match self {
            Self::Placed { displaced } => displaced,
            Self::Merged => None,
            Self::PartiallyMerged { remainder } => Some(remainder),
        }
    }
}

/// Result of dropping an instance out of a container.
#[derive(Debug)]
pub struct Dropped {
    pub collectible: Collectible,
    /// The instance itself, unless it was destroyed.
    pub instance: Option<ItemInstance>,
    /// Sub-container of a destroyed instance. The factory has already been
    /// told about it through [`crate::env::ItemFactory::destroy`].
    pub nested: Option<ContainerHandle>,
}

impl Dropped {
    /// Drops a carried instance, optionally destroying it.
    pub fn new(instance: ItemInstance, destroy: bool) -> Self {
        let collectible = instance.collectible();
        if destroy {
            Self {
                collectible,
                nested: instance.nested(),
                instance: None,
            }
        } else {
            Self {
                collectible,
                instance: Some(instance),
                nested: None,
            }
        }
    }
}

impl GridContainer {
    /// Places a carried instance with full validation.
    ///
    /// Checks, in order: bounds, overlap, permission, weight. The weight check
    /// is [`GridContainer::can_afford`] for one unit of the kind. A same-kind
    /// occupant with free capacity absorbs the instance; any other single
    /// occupant is swapped out and returned in [`Placement::Placed`].
    pub fn place_checked(
        &mut self,
        instance: ItemInstance,
        anchor: Cell,
    ) -> Result<Placement, Rejected> {
        let placement = self.try_place(instance, anchor)?;
        self.notify();
        Ok(placement)
    }

    pub(crate) fn try_place(
        &mut self,
        mut instance: ItemInstance,
        anchor: Cell,
    ) -> Result<Placement, Rejected> {
        let footprint = instance.footprint();
        if !self.grid.in_bounds(anchor, footprint) {
            return Err(Rejected::new(OpError::ErrorInPosition, instance));
        }

        let overlap = self.grid.overlap(anchor, footprint);
        if !overlap.is_placeable() {
            return Err(Rejected::new(OpError::BlockedByItem, instance));
        }

        if !self.env.permissions().allows_instance(&instance) {
            return Err(Rejected::new(OpError::NoPermission, instance));
        }

        if !self.can_afford(instance.kind()) {
            return Err(Rejected::new(OpError::WeightExceeded, instance));
        }

        let Some(key) = overlap.occupant() else {
            self.grid.occupy(instance, anchor);
            tracing::debug!(id = %self.config.id, %anchor, "placed item");
            return Ok(Placement::Placed { displaced: None });
        };

        if let Some(stack) = self.grid.instance_mut(key)
            && stack.is_same_kind(&instance)
        {
            match merge_stack(stack, instance) {
                MergeOutcome::Merged => {
                    tracing::debug!(id = %self.config.id, %anchor, "merged stack");
                    return Ok(Placement::Merged);
                }
                MergeOutcome::Partial(remainder) => {
                    tracing::debug!(
                        id = %self.config.id,
                        %anchor,
                        remainder = remainder.amount(),
                        "partially merged stack"
                    );
                    return Ok(Placement::PartiallyMerged { remainder });
                }
                // Full destination: fall through and swap.
                MergeOutcome::Unchanged(source) => instance = source,
            }
        }

        let displaced = self.grid.release(key);
        self.grid.occupy(instance, anchor);
        tracing::debug!(id = %self.config.id, %anchor, "swapped item");
        Ok(Placement::Placed { displaced })
    }

    /// Trusted placement for callers that already validated the target.
    ///
    /// Skips permission, weight and merge policy. The rectangle must still be
    /// in bounds and empty; otherwise the instance is handed back.
    pub fn place_trusted(&mut self, instance: ItemInstance, anchor: Cell) -> Result<(), Rejected> {
        let footprint = instance.footprint();
        if !self.grid.in_bounds(anchor, footprint) {
            return Err(Rejected::new(OpError::ErrorInPosition, instance));
        }
        if !self.grid.is_area_free(anchor, footprint) {
            return Err(Rejected::new(OpError::BlockedByItem, instance));
        }
        self.grid.occupy(instance, anchor);
        self.notify();
        Ok(())
    }

    /// Adds `amount` units of `kind`, merging into existing stacks first-found
    /// and opening new instances through the factory.
    ///
    /// Returns [`OpError::Incomplete`] when some but not all units fit.
    pub fn add_item(&mut self, kind: &Arc<ItemKind>, amount: u32) -> OpResult {
        if amount == 0 {
            return Err(OpError::ErrorInAmount);
        }
        if kind.validate().is_err() {
            return Err(OpError::ErrorInItem);
        }
        if !self.env.permissions().allows_kind(kind) {
            return Err(OpError::NoPermission);
        }

        let mut remaining = amount;
        let stopped = loop {
            if remaining == 0 {
                break None;
            }

            let affordable = self.affordable_units(kind.weight, remaining);
            if affordable == 0 {
                break Some(OpError::WeightExceeded);
            }

            let Some(cell) = self.grid.find_space(kind, 1) else {
                break Some(OpError::ContainerFull);
            };

            let moved = match self.grid.key_at(cell) {
                Some(key) => match self.grid.instance_mut(key) {
                    Some(stack) if stack.handle() == kind.handle => {
                        let moved = affordable.min(stack.available_stack());
                        stack.set_amount(stack.amount() + moved);
                        moved
                    }
                    _ => break Some(OpError::ContainerFull),
                },
                None => {
                    let mut instance = self.env.factory().instantiate(kind);
                    let moved = affordable.min(kind.max_stack);
                    instance.set_amount(moved);
                    self.grid.occupy(instance, cell);
                    moved
                }
            };

            if moved == 0 {
                break Some(OpError::ContainerFull);
            }
            remaining -= moved;
        };

        let applied = amount - remaining;
        if applied > 0 {
            tracing::debug!(id = %self.config.id, handle = %kind.handle, applied, "added items");
            self.notify();
        }

        match stopped {
            None => Ok(()),
            Some(error) if applied == 0 => Err(error),
            Some(_) => Err(OpError::Incomplete {
                applied,
                requested: amount,
            }),
        }
    }

    /// Removes `amount` units of `handle`, draining instances in scan order.
    pub fn remove_item(&mut self, handle: ItemHandle, amount: u32) -> OpResult {
        if amount == 0 {
            return Err(OpError::ErrorInAmount);
        }

        let mut remaining = amount;
        while remaining > 0 {
            let Some(key) = self.grid.first_of(handle) else {
                break;
            };
            let removed = self.take_from(key, remaining);
            if removed == 0 {
                break;
            }
            remaining -= removed;
        }

        let applied = amount - remaining;
        if applied > 0 {
            tracing::debug!(id = %self.config.id, %handle, applied, "removed items");
            self.notify();
        }

        if remaining > 0 {
            return Err(OpError::Incomplete {
                applied,
                requested: amount,
            });
        }
        Ok(())
    }

    /// Removes up to `amount` units from the instance at `cell` and returns
    /// how many were actually removed. An emptied instance is destroyed.
    pub fn remove_from_slot(&mut self, cell: Cell, amount: u32) -> OpResult<u32> {
        let key = self.occupied(cell)?;
        if amount == 0 {
            return Err(OpError::ErrorInAmount);
        }
        let removed = self.take_from(key, amount);
        self.notify();
        Ok(removed)
    }

    /// Releases the instance at `cell` and hands it to the caller.
    pub fn pick_up(&mut self, cell: Cell) -> Option<ItemInstance> {
        let key = self.grid.key_at(cell)?;
        let instance = self.grid.release(key)?;
        tracing::debug!(id = %self.config.id, %cell, "picked up item");
        self.notify();
        Some(instance)
    }

    /// Takes half of the stack at `cell` as a new carried instance.
    pub fn split_at(&mut self, cell: Cell) -> OpResult<ItemInstance> {
        let key = self.occupied(cell)?;
        let half = self
            .grid
            .instance_mut(key)
            .and_then(ItemInstance::split_half)
            .ok_or(OpError::ErrorInAmount)?;
        tracing::debug!(id = %self.config.id, %cell, taken = half.amount(), "split stack");
        self.notify();
        Ok(half)
    }

    /// Releases the instance at `cell` and returns its collectible snapshot.
    pub fn drop_at(&mut self, cell: Cell, destroy: bool) -> OpResult<Dropped> {
        let key = self.occupied(cell)?;
        let instance = self.grid.release(key).ok_or(OpError::ErrorInItem)?;
        if destroy {
            self.env.factory().destroy(&instance);
        }
        self.notify();
        Ok(Dropped::new(instance, destroy))
    }

    /// Consumes one unit of the usable item at `cell`.
    pub fn use_at(&mut self, cell: Cell) -> OpResult<Collectible> {
        let key = self.occupied(cell)?;
        let kind = match self.grid.instance(key) {
            Some(instance) if instance.kind().usable => Arc::clone(instance.kind()),
            _ => return Err(OpError::ErrorInItem),
        };
        let amount = self.take_from(key, 1);
        tracing::debug!(id = %self.config.id, %cell, handle = %kind.handle, "used item");
        self.notify();
        Ok(Collectible { kind, amount })
    }

    /// Removes every stored instance. Clearing an empty container is a no-op.
    pub fn clear(&mut self) -> OpResult {
        if self.clear_silently() > 0 {
            self.notify();
        }
        Ok(())
    }

    pub(crate) fn clear_silently(&mut self) -> usize {
        let keys = self.grid.keys();
        for &key in &keys {
            let amount = self.grid.instance(key).map_or(0, ItemInstance::amount);
            self.take_from(key, amount);
        }
        if !keys.is_empty() {
            tracing::debug!(id = %self.config.id, cleared = keys.len(), "cleared container");
        }
        keys.len()
    }

    fn occupied(&self, cell: Cell) -> OpResult<SlotKey> {
        if !self.grid.dimensions().contains(cell) {
            return Err(OpError::ErrorInPosition);
        }
        self.grid.key_at(cell).ok_or(OpError::ErrorInItem)
    }

    /// Removes `min(amount, stack)` from `key`, destroying it when emptied.
    fn take_from(&mut self, key: SlotKey, amount: u32) -> u32 {
        let Some(instance) = self.grid.instance_mut(key) else {
            return 0;
        };
        let removed = amount.min(instance.amount());
        let left = instance.amount() - removed;
        if left > 0 {
            instance.set_amount(left);
        } else if let Some(emptied) = self.grid.release(key) {
            self.env.factory().destroy(&emptied);
        }
        removed
    }
}
