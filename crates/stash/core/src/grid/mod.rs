//! Cell table mapping grid cells to stored item instances.
//!
//! Instances live in a slot map keyed by [`SlotKey`]; every cell of an
//! instance's footprint holds that key. Cells are stored row-major, so
//! iterating them yields the scan order used by lookups and find-space.
mod placement;

pub use placement::Overlap;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::GridDimensions;
use crate::item::{Footprint, ItemHandle, ItemInstance};

/// Grid cell expressed in integer coordinates (`x` to the right, `y` down).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Identity of a stored instance inside one grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey(u64);

/// `width x height` table of optional instance references.
///
/// Only the placement paths of [`crate::container::GridContainer`] write
/// cells; callers validate bounds and overlap before [`GridStore::occupy`].
#[derive(Clone, Debug)]
pub struct GridStore {
    dimensions: GridDimensions,
    cells: Vec<Option<SlotKey>>,
    slots: BTreeMap<SlotKey, ItemInstance>,
    next_key: u64,
}

impl GridStore {
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![None; dimensions.area()],
            slots: BTreeMap::new(),
            next_key: 0,
        }
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if !self.dimensions.contains(cell) {
            return None;
        }
        Some(cell.y as usize * self.dimensions.width as usize + cell.x as usize)
    }

    fn cell_at(&self, index: usize) -> Cell {
        let width = self.dimensions.width as usize;
        Cell::new((index % width) as i32, (index / width) as i32)
    }

    /// Key of the instance occupying `cell`; `None` for empty or out-of-range cells.
    pub fn key_at(&self, cell: Cell) -> Option<SlotKey> {
        self.index(cell).and_then(|index| self.cells[index])
    }

    pub fn get(&self, cell: Cell) -> Option<&ItemInstance> {
        self.key_at(cell).and_then(|key| self.slots.get(&key))
    }

    pub fn instance(&self, key: SlotKey) -> Option<&ItemInstance> {
        self.slots.get(&key)
    }

    pub(crate) fn instance_mut(&mut self, key: SlotKey) -> Option<&mut ItemInstance> {
        self.slots.get_mut(&key)
    }

    /// Number of distinct stored instances.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Distinct keys in row-major order of the first cell each one covers.
    pub fn keys(&self) -> Vec<SlotKey> {
        let mut seen = BTreeSet::new();
        let mut keys = Vec::with_capacity(self.slots.len());
        for &key in self.cells.iter().flatten() {
            if seen.insert(key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Distinct stored instances in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, &ItemInstance)> + '_ {
        self.keys()
            .into_iter()
            .filter_map(move |key| self.slots.get(&key).map(|instance| (key, instance)))
    }

    /// First instance of `handle` in scan order.
    pub fn first_of(&self, handle: ItemHandle) -> Option<SlotKey> {
        self.cells
            .iter()
            .flatten()
            .find(|key| {
                self.slots
                    .get(key)
                    .is_some_and(|instance| instance.handle() == handle)
            })
            .copied()
    }

    /// Cells of the rectangle anchored at `anchor`; assumes it is in bounds.
    pub(crate) fn rect(anchor: Cell, footprint: Footprint) -> impl Iterator<Item = Cell> {
        let (w, h) = (footprint.width as i32, footprint.height as i32);
        (0..h).flat_map(move |dy| (0..w).map(move |dx| Cell::new(anchor.x + dx, anchor.y + dy)))
    }

    /// Writes `instance` into every cell of its footprint anchored at `anchor`.
    ///
    /// The rectangle must already be validated as in-bounds and empty.
    pub(crate) fn occupy(&mut self, mut instance: ItemInstance, anchor: Cell) -> SlotKey {
        let key = SlotKey(self.next_key);
        self.next_key += 1;

        for cell in Self::rect(anchor, instance.footprint()) {
            if let Some(index) = self.index(cell) {
                debug_assert!(self.cells[index].is_none(), "cell {cell} already owned");
                self.cells[index] = Some(key);
            }
        }

        instance.set_anchor(Some(anchor));
        self.slots.insert(key, instance);
        key
    }

    /// Removes the instance behind `key`, clearing only the footprint cells
    /// that still point to it.
    pub(crate) fn release(&mut self, key: SlotKey) -> Option<ItemInstance> {
        let mut instance = self.slots.remove(&key)?;

        match instance.anchor() {
            Some(anchor) => {
                for cell in Self::rect(anchor, instance.footprint()) {
                    if let Some(index) = self.index(cell)
                        && self.cells[index] == Some(key)
                    {
                        self.cells[index] = None;
                    }
                }
            }
            None => {
                for slot in self.cells.iter_mut().filter(|slot| **slot == Some(key)) {
                    *slot = None;
                }
            }
        }

        instance.set_anchor(None);
        Some(instance)
    }

    /// Cells owned by `key`, in row-major order.
    pub fn cells_of(&self, key: SlotKey) -> Vec<Cell> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, slot)| **slot == Some(key))
            .map(|(index, _)| self.cell_at(index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::item::ItemKind;

    fn instance(handle: u32, width: u32, height: u32) -> ItemInstance {
        ItemInstance::new(Arc::new(
            ItemKind::new(ItemHandle(handle), "test").with_footprint(width, height),
        ))
    }

    #[test]
    fn occupy_writes_whole_footprint() {
        let mut grid = GridStore::new(GridDimensions::new(4, 4));
        let key = grid.occupy(instance(1, 2, 3), Cell::new(1, 0));

        assert_eq!(grid.cells_of(key).len(), 6);
        assert_eq!(grid.key_at(Cell::new(2, 2)), Some(key));
        assert_eq!(grid.key_at(Cell::new(3, 0)), None);
        assert_eq!(grid.instance(key).unwrap().anchor(), Some(Cell::new(1, 0)));
    }

    #[test]
    fn release_clears_and_returns_carried_instance() {
        let mut grid = GridStore::new(GridDimensions::new(3, 3));
        let key = grid.occupy(instance(1, 2, 2), Cell::ORIGIN);

        let released = grid.release(key).unwrap();

        assert!(released.anchor().is_none());
        assert!(grid.is_empty());
        assert!(grid.cells_of(key).is_empty());
    }

    #[test]
    fn release_leaves_cells_owned_by_others() {
        let mut grid = GridStore::new(GridDimensions::new(3, 1));
        let first = grid.occupy(instance(1, 1, 1), Cell::new(0, 0));
        let second = grid.occupy(instance(2, 1, 1), Cell::new(1, 0));

        grid.release(first);

        assert_eq!(grid.key_at(Cell::new(1, 0)), Some(second));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn keys_follow_row_major_scan() {
        let mut grid = GridStore::new(GridDimensions::new(3, 2));
        let late = grid.occupy(instance(1, 1, 1), Cell::new(0, 1));
        let early = grid.occupy(instance(2, 1, 1), Cell::new(2, 0));

        assert_eq!(grid.keys(), vec![early, late]);
        assert_eq!(grid.first_of(ItemHandle(1)), Some(late));
    }

    #[test]
    fn multi_cell_instances_are_listed_once() {
        let mut grid = GridStore::new(GridDimensions::new(4, 3));
        let tall = grid.occupy(instance(1, 1, 3), Cell::new(0, 0));
        let wide = grid.occupy(instance(2, 3, 2), Cell::new(1, 1));
        let corner = grid.occupy(instance(3, 1, 1), Cell::new(3, 0));

        assert_eq!(grid.keys(), vec![tall, corner, wide]);
        assert_eq!(grid.iter().count(), 3);
    }

    #[test]
    fn out_of_range_lookups_are_empty() {
        let grid = GridStore::new(GridDimensions::new(2, 2));
        assert!(grid.get(Cell::new(-1, 0)).is_none());
        assert!(grid.get(Cell::new(0, 2)).is_none());
    }
}
