use std::sync::Arc;

use stash_core::{
    Cell, ContainerConfig, ContainerEnv, ContainerHandle, ContainerSnapshot, DefaultFactory,
    GridContainer, GridDimensions, ItemCatalog, ItemHandle, ItemKind, ItemRecord, MemoryCatalog,
    NestedContainerSpec, OpError,
};

fn catalog() -> MemoryCatalog {
    MemoryCatalog::from_kinds([
        ItemKind::new(ItemHandle(1), "satchel")
            .with_footprint(2, 1)
            .with_nested(NestedContainerSpec {
                dimensions: GridDimensions::new(3, 3),
                mode: Default::default(),
                category: Default::default(),
                weight: None,
            }),
        ItemKind::new(ItemHandle(2), "coin").with_max_stack(50),
    ])
    .expect("valid catalog")
}

fn chest(factory: &Arc<DefaultFactory>) -> GridContainer {
    GridContainer::new(
        ContainerConfig::new("chest", GridDimensions::new(4, 3)),
        ContainerEnv::new(factory.clone()),
    )
    .expect("valid config")
}

fn filled(catalog: &MemoryCatalog, factory: &Arc<DefaultFactory>) -> GridContainer {
    let mut chest = chest(factory);
    let satchel = catalog.lookup(ItemHandle(1)).expect("satchel");
    let coin = catalog.lookup(ItemHandle(2)).expect("coin");
    chest.add_item(&satchel, 2).expect("two satchels fit");
    chest.add_item(&coin, 30).expect("coins fit");
    chest
}

// ============================================================================
// Snapshot contents
// ============================================================================

#[test]
fn snapshot_records_sub_container_handles() {
    let catalog = catalog();
    let factory = Arc::new(DefaultFactory::new());
    let chest = filled(&catalog, &factory);

    let nested: Vec<_> = chest.snapshot().records.iter().map(|r| r.nested).collect();

    assert_eq!(
        nested,
        vec![Some(ContainerHandle(0)), Some(ContainerHandle(1)), None]
    );
    assert_eq!(
        factory.live_containers(),
        vec![ContainerHandle(0), ContainerHandle(1)]
    );
}

// ============================================================================
// Restore
// ============================================================================

#[test]
fn restore_into_fresh_container_keeps_saved_handles() {
    let catalog = catalog();
    let saved = filled(&catalog, &Arc::new(DefaultFactory::new())).snapshot();

    let factory = Arc::new(DefaultFactory::new());
    let mut restored = chest(&factory);
    let report = restored.restore(&saved, &catalog);

    assert!(report.is_clean());
    assert_eq!(restored.snapshot(), saved);
    assert_eq!(
        factory.live_containers(),
        vec![ContainerHandle(0), ContainerHandle(1)]
    );

    // New sub-containers never reuse a restored handle.
    let satchel = catalog.lookup(ItemHandle(1)).expect("satchel");
    restored.add_item(&satchel, 1).expect("room for a third satchel");
    assert!(factory.is_live(ContainerHandle(2)));
}

#[test]
fn restore_over_existing_contents_tears_old_tree_down() {
    let catalog = catalog();
    let factory = Arc::new(DefaultFactory::new());
    let mut chest = filled(&catalog, &factory);
    let saved = chest.snapshot();

    let satchel = catalog.lookup(ItemHandle(1)).expect("satchel");
    chest.add_item(&satchel, 1).expect("third satchel");
    assert_eq!(factory.live_containers().len(), 3);

    let report = chest.restore(&saved, &catalog);

    assert_eq!(report.loaded, 3);
    assert_eq!(chest.snapshot(), saved);
    assert_eq!(
        factory.live_containers(),
        vec![ContainerHandle(0), ContainerHandle(1)]
    );
}

#[test]
fn rejected_records_release_their_handles() {
    let catalog = catalog();
    let factory = Arc::new(DefaultFactory::new());
    let mut chest = chest(&factory);
    let record = |x: i32, nested: u64| ItemRecord {
        handle: ItemHandle(1),
        amount: 1,
        x,
        y: 0,
        rotated: false,
        nested: Some(ContainerHandle(nested)),
    };
    let snapshot = ContainerSnapshot {
        id: "chest".into(),
        records: vec![record(0, 5), record(1, 6), record(3, 7)],
    };

    let report = chest.restore(&snapshot, &catalog);

    let errors: Vec<_> = report.failures.iter().map(|f| f.error).collect();
    assert_eq!(errors, vec![OpError::BlockedByItem, OpError::ErrorInPosition]);
    assert_eq!(report.loaded, 1);
    assert_eq!(
        chest.get(Cell::ORIGIN).and_then(|satchel| satchel.nested()),
        Some(ContainerHandle(5))
    );
    assert_eq!(factory.live_containers(), vec![ContainerHandle(5)]);
}
