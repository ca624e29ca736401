use std::sync::Arc;

use crate::error::{OpError, OpResult};
use crate::grid::Cell;

use super::kind::{Footprint, ItemHandle, ItemKind};

/// Orientation of an instance; rotation swaps the effective footprint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Normal,
    Rotated,
}

impl Orientation {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Rotated,
            Self::Rotated => Self::Normal,
        }
    }
}

/// Reference to a sub-container embedded in an instance.
///
/// The container itself is owned by whoever opens it; the engine only carries
/// the handle and returns it when the instance is destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerHandle(pub u64);

/// Lightweight `(kind, amount)` snapshot of a dropped or used item.
#[derive(Clone, Debug, PartialEq)]
pub struct Collectible {
    pub kind: Arc<ItemKind>,
    pub amount: u32,
}

/// A quantity of one item kind, either stored in a grid or carried.
///
/// While stored, `0 < amount <= kind.max_stack` holds and `anchor` is the
/// top-left cell of its footprint. A carried instance has no anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemInstance {
    kind: Arc<ItemKind>,
    amount: u32,
    orientation: Orientation,
    anchor: Option<Cell>,
    nested: Option<ContainerHandle>,
}

impl ItemInstance {
    /// Creates a single unit of `kind`.
    pub fn new(kind: Arc<ItemKind>) -> Self {
        Self {
            kind,
            amount: 1,
            orientation: Orientation::Normal,
            anchor: None,
            nested: None,
        }
    }

    /// Creates an instance with an explicit amount in `1..=max_stack`.
    pub fn with_amount(kind: Arc<ItemKind>, amount: u32) -> OpResult<Self> {
        if amount == 0 || amount > kind.max_stack {
            return Err(OpError::ErrorInAmount);
        }
        let mut instance = Self::new(kind);
        instance.amount = amount;
        Ok(instance)
    }

    #[must_use]
    pub fn with_nested(mut self, handle: ContainerHandle) -> Self {
        self.nested = Some(handle);
        self
    }

    pub fn kind(&self) -> &Arc<ItemKind> {
        &self.kind
    }

    pub fn handle(&self) -> ItemHandle {
        self.kind.handle
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_rotated(&self) -> bool {
        self.orientation == Orientation::Rotated
    }

    pub fn anchor(&self) -> Option<Cell> {
        self.anchor
    }

    pub fn nested(&self) -> Option<ContainerHandle> {
        self.nested
    }

    pub fn is_same_kind(&self, other: &ItemInstance) -> bool {
        self.handle() == other.handle()
    }

    /// Effective footprint, accounting for orientation.
    pub fn footprint(&self) -> Footprint {
        match self.orientation {
            Orientation::Normal => self.kind.footprint,
            Orientation::Rotated => self.kind.footprint.rotated(),
        }
    }

    /// Units that can still be merged into this stack.
    pub fn available_stack(&self) -> u32 {
        self.kind.max_stack.saturating_sub(self.amount)
    }

    pub fn weight(&self) -> f32 {
        self.kind.weight * self.amount as f32
    }

    pub fn collectible(&self) -> Collectible {
        Collectible {
            kind: Arc::clone(&self.kind),
            amount: self.amount,
        }
    }

    pub fn rotate(&mut self) {
        self.orientation = self.orientation.toggled();
    }

    /// Takes `floor(amount / 2)` units into a new carried instance.
    ///
    /// Returns `None` when there is nothing to split (`amount <= 1`).
    pub fn split_half(&mut self) -> Option<ItemInstance> {
        if self.amount <= 1 {
            return None;
        }
        let taken = self.amount / 2;
        self.amount -= taken;
        Some(Self {
            kind: Arc::clone(&self.kind),
            amount: taken,
            orientation: Orientation::Normal,
            anchor: None,
            nested: None,
        })
    }

    pub(crate) fn set_amount(&mut self, amount: u32) {
        debug_assert!(amount <= self.kind.max_stack);
        self.amount = amount;
    }

    pub(crate) fn set_anchor(&mut self, anchor: Option<Cell>) {
        self.anchor = anchor;
    }
}

/// Result of merging a source stack into a destination of the same kind.
#[derive(Debug, PartialEq)]
pub enum MergeOutcome {
    /// Source was fully absorbed and consumed.
    Merged,
    /// Destination is now full; the source keeps the leftover units.
    Partial(ItemInstance),
    /// Nothing moved (destination full or empty source).
    Unchanged(ItemInstance),
}

/// Moves units from `source` into `destination`, bounded by max stack.
pub fn merge_stack(destination: &mut ItemInstance, mut source: ItemInstance) -> MergeOutcome {
    debug_assert!(destination.is_same_kind(&source));

    let available = destination.available_stack();
    if available == 0 || source.amount == 0 {
        return MergeOutcome::Unchanged(source);
    }

    if source.amount <= available {
        destination.amount += source.amount;
        return MergeOutcome::Merged;
    }

    destination.amount = destination.kind.max_stack;
    source.amount -= available;
    source.anchor = None;
    MergeOutcome::Partial(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrows(max_stack: u32) -> Arc<ItemKind> {
        Arc::new(ItemKind::new(ItemHandle(1), "arrow").with_max_stack(max_stack))
    }

    #[test]
    fn partial_merge_fills_destination_and_keeps_remainder() {
        let kind = arrows(10);
        let mut destination = ItemInstance::with_amount(Arc::clone(&kind), 7).unwrap();
        let source = ItemInstance::with_amount(kind, 5).unwrap();

        let outcome = merge_stack(&mut destination, source);

        assert_eq!(destination.amount(), 10);
        match outcome {
            MergeOutcome::Partial(remainder) => assert_eq!(remainder.amount(), 2),
            other => panic!("expected partial merge, got {other:?}"),
        }
    }

    #[test]
    fn full_merge_consumes_source() {
        let kind = arrows(10);
        let mut destination = ItemInstance::with_amount(Arc::clone(&kind), 4).unwrap();
        let source = ItemInstance::with_amount(kind, 6).unwrap();

        assert_eq!(merge_stack(&mut destination, source), MergeOutcome::Merged);
        assert_eq!(destination.amount(), 10);
    }

    #[test]
    fn merge_into_full_stack_is_a_no_op() {
        let kind = arrows(3);
        let mut destination = ItemInstance::with_amount(Arc::clone(&kind), 3).unwrap();
        let source = ItemInstance::with_amount(kind, 2).unwrap();

        match merge_stack(&mut destination, source) {
            MergeOutcome::Unchanged(source) => assert_eq!(source.amount(), 2),
            other => panic!("expected no-op, got {other:?}"),
        }
        assert_eq!(destination.amount(), 3);
    }

    #[test]
    fn split_takes_floor_half() {
        let mut stack = ItemInstance::with_amount(arrows(20), 7).unwrap();
        let half = stack.split_half().unwrap();
        assert_eq!(half.amount(), 3);
        assert_eq!(stack.amount(), 4);

        let mut single = ItemInstance::new(arrows(20));
        assert!(single.split_half().is_none());
        assert_eq!(single.amount(), 1);
    }

    #[test]
    fn rotation_swaps_footprint() {
        let kind = Arc::new(ItemKind::new(ItemHandle(2), "rifle").with_footprint(4, 1));
        let mut rifle = ItemInstance::new(kind);
        rifle.rotate();
        assert_eq!(rifle.footprint(), Footprint::new(1, 4));
        rifle.rotate();
        assert_eq!(rifle.footprint(), Footprint::new(4, 1));
    }

    #[test]
    fn amount_must_fit_stack() {
        assert_eq!(
            ItemInstance::with_amount(arrows(5), 6),
            Err(OpError::ErrorInAmount)
        );
        assert_eq!(
            ItemInstance::with_amount(arrows(5), 0),
            Err(OpError::ErrorInAmount)
        );
    }
}
