//! Bounds, overlap and find-space checks over a [`GridStore`].

use super::{Cell, GridStore, SlotKey};
use crate::item::{Footprint, ItemKind};

/// Occupancy of a candidate rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlap {
    /// Every cell is empty.
    Free,
    /// All occupied cells belong to one instance.
    Single(SlotKey),
    /// Two or more distinct instances were found.
    Blocked,
}

impl Overlap {
    pub fn is_placeable(&self) -> bool {
        !matches!(self, Self::Blocked)
    }

    pub fn occupant(&self) -> Option<SlotKey> {
        match self {
            Self::Single(key) => Some(*key),
            _ => None,
        }
    }
}

impl GridStore {
    /// True iff both corners of the footprint anchored at `anchor` are inside the grid.
    pub fn in_bounds(&self, anchor: Cell, footprint: Footprint) -> bool {
        if footprint.is_empty() {
            return false;
        }
        let far = i32::try_from(footprint.width)
            .ok()
            .zip(i32::try_from(footprint.height).ok())
            .and_then(|(w, h)| {
                Some(Cell::new(
                    anchor.x.checked_add(w - 1)?,
                    anchor.y.checked_add(h - 1)?,
                ))
            });

        match far {
            Some(far) => self.dimensions().contains(anchor) && self.dimensions().contains(far),
            None => false,
        }
    }

    /// Classifies the rectangle at `anchor`; the rectangle must be in bounds.
    pub fn overlap(&self, anchor: Cell, footprint: Footprint) -> Overlap {
        let mut occupant = None;
        for cell in Self::rect(anchor, footprint) {
            let Some(key) = self.key_at(cell) else {
                continue;
            };
            match occupant {
                None => occupant = Some(key),
                Some(seen) if seen != key => return Overlap::Blocked,
                Some(_) => {}
            }
        }
        occupant.map_or(Overlap::Free, Overlap::Single)
    }

    pub fn is_area_free(&self, anchor: Cell, footprint: Footprint) -> bool {
        Self::rect(anchor, footprint).all(|cell| self.key_at(cell).is_none())
    }

    /// First cell, in row-major order, where `amount` units of `kind` fit.
    ///
    /// A cell holding a same-kind stack with room for `amount` wins over an
    /// empty rectangle; whichever is met first in the scan is returned.
    pub fn find_space(&self, kind: &ItemKind, amount: u32) -> Option<Cell> {
        let dims = self.dimensions();
        let footprint = kind.footprint;
        if footprint.is_empty() || footprint.width > dims.width || footprint.height > dims.height {
            return None;
        }

        let last_x = (dims.width - footprint.width) as i32;
        let last_y = (dims.height - footprint.height) as i32;

        for y in 0..=last_y {
            for x in 0..=last_x {
                let cell = Cell::new(x, y);

                if let Some(stack) = self.get(cell)
                    && stack.handle() == kind.handle
                    && stack.available_stack() >= amount
                {
                    tracing::trace!(%cell, handle = %kind.handle, "find_space: stack");
                    return Some(cell);
                }

                if self.is_area_free(cell, footprint) {
                    tracing::trace!(%cell, handle = %kind.handle, "find_space: empty area");
                    return Some(cell);
                }
            }
        }

        tracing::trace!(handle = %kind.handle, "find_space: none");
        None
    }
}
