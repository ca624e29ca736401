//! Snapshot and restore of container contents.
//!
//! The engine only produces and consumes [`ContainerSnapshot`] values; how
//! they are stored is up to the caller.
use super::GridContainer;
use crate::env::ItemCatalog;
use crate::error::OpError;
use crate::grid::{Cell, Overlap};
use crate::item::{ContainerHandle, ItemHandle};

/// Saved state of one stored instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemRecord {
    pub handle: ItemHandle,
    pub amount: u32,
    pub x: i32,
    pub y: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotated: bool,
    /// Sub-container the instance embeds, kept across reloads.
    #[cfg_attr(feature = "serde", serde(default))]
    pub nested: Option<ContainerHandle>,
}

impl ItemRecord {
    pub fn anchor(&self) -> Cell {
        Cell::new(self.x, self.y)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerSnapshot {
    pub id: String,
    pub records: Vec<ItemRecord>,
}

/// A record that could not be restored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadFailure {
    pub record: ItemRecord,
    pub error: OpError,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl GridContainer {
    /// One record per distinct instance, in row-major order.
    pub fn snapshot(&self) -> ContainerSnapshot {
        let records = self
            .grid
            .iter()
            .filter_map(|(_, instance)| {
                let anchor = instance.anchor()?;
                Some(ItemRecord {
                    handle: instance.handle(),
                    amount: instance.amount(),
                    x: anchor.x,
                    y: anchor.y,
                    rotated: instance.is_rotated(),
                    nested: instance.nested(),
                })
            })
            .collect();

        ContainerSnapshot {
            id: self.config.id.clone(),
            records,
        }
    }

    /// Replaces the contents with `snapshot`, re-running checked placement
    /// for every record. Failed records are reported and skipped.
    ///
    /// Current contents are destroyed first. Restored instances are rebuilt
    /// through [`crate::env::ItemFactory::reinstate`] so saved sub-container
    /// handles survive the reload.
    pub fn restore(
        &mut self,
        snapshot: &ContainerSnapshot,
        catalog: &dyn ItemCatalog,
    ) -> LoadReport {
        let cleared = self.clear_silently();
        let mut report = LoadReport::default();

        for record in &snapshot.records {
            match self.restore_record(record, catalog) {
                Ok(()) => report.loaded += 1,
                Err(error) => {
                    tracing::warn!(
                        id = %self.config.id,
                        handle = %record.handle,
                        x = record.x,
                        y = record.y,
                        %error,
                        "failed to restore item"
                    );
                    report.failures.push(LoadFailure {
                        record: *record,
                        error,
                    });
                }
            }
        }

        tracing::debug!(
            id = %self.config.id,
            loaded = report.loaded,
            failed = report.failures.len(),
            "restored container"
        );
        if cleared > 0 || report.loaded > 0 {
            self.notify();
        }
        report
    }

    fn restore_record(
        &mut self,
        record: &ItemRecord,
        catalog: &dyn ItemCatalog,
    ) -> Result<(), OpError> {
        let kind = catalog.lookup(record.handle).ok_or(OpError::ErrorInItem)?;
        if record.amount == 0 || record.amount > kind.max_stack {
            return Err(OpError::ErrorInAmount);
        }

        let mut instance = self.env.factory().reinstate(&kind, record.nested);
        instance.set_amount(record.amount);
        if record.rotated && !instance.is_rotated() {
            instance.rotate();
        }

        let anchor = record.anchor();
        let footprint = instance.footprint();
        // Records never merge into or displace each other.
        if self.grid.in_bounds(anchor, footprint)
            && self.grid.overlap(anchor, footprint) != Overlap::Free
        {
            self.env.factory().destroy(&instance);
            return Err(OpError::BlockedByItem);
        }

        match self.try_place(instance, anchor) {
            Ok(_) => Ok(()),
            Err(rejected) => {
                self.env.factory().destroy(&rejected.instance);
                Err(rejected.error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{ContainerConfig, GridDimensions};
    use crate::env::{ChangeCounter, ContainerEnv, MemoryCatalog};
    use crate::item::{ItemInstance, ItemKind};

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::from_kinds([
            ItemKind::new(ItemHandle(1), "arrow").with_max_stack(20),
            ItemKind::new(ItemHandle(2), "bow").with_footprint(1, 3),
        ])
        .unwrap()
    }

    fn container(env: ContainerEnv) -> GridContainer {
        GridContainer::new(ContainerConfig::new("quiver", GridDimensions::new(4, 4)), env).unwrap()
    }

    #[test]
    fn snapshot_restores_into_fresh_container() {
        let catalog = catalog();
        let mut source = container(ContainerEnv::default());
        source
            .add_item(&catalog.lookup(ItemHandle(1)).unwrap(), 12)
            .unwrap();
        let mut bow = ItemInstance::new(catalog.lookup(ItemHandle(2)).unwrap());
        bow.rotate();
        source.place_checked(bow, Cell::new(1, 2)).unwrap();

        let snapshot = source.snapshot();
        assert_eq!(snapshot.records.len(), 2);
        assert!(snapshot.records[1].rotated);

        let mut target = container(ContainerEnv::default());
        let report = target.restore(&snapshot, &catalog);

        assert!(report.is_clean());
        assert_eq!(report.loaded, 2);
        assert_eq!(target.snapshot(), snapshot);
    }

    #[test]
    fn bad_records_are_reported_and_skipped() {
        let counter = Arc::new(ChangeCounter::new());
        let mut target = container(ContainerEnv::default().with_sink(counter.clone()));
        let record = |handle: u32, amount: u32, x: i32, y: i32| ItemRecord {
            handle: ItemHandle(handle),
            amount,
            x,
            y,
            rotated: false,
            nested: None,
        };
        let snapshot = ContainerSnapshot {
            id: "quiver".into(),
            records: vec![
                record(9, 1, 0, 0),
                record(1, 0, 0, 0),
                record(1, 5, 0, 0),
                record(2, 1, 0, 3),
                record(1, 5, 0, 0),
            ],
        };

        let report = target.restore(&snapshot, &catalog());

        let errors: Vec<_> = report.failures.iter().map(|f| f.error).collect();
        assert_eq!(
            errors,
            vec![
                OpError::ErrorInItem,
                OpError::ErrorInAmount,
                OpError::ErrorInPosition,
                OpError::BlockedByItem,
            ]
        );
        assert_eq!(report.loaded, 1);
        assert_eq!(target.amount_of(ItemHandle(1)), 5);
        assert_eq!(counter.count(), 1);
    }
}
