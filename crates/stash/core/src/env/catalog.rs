use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::item::{ContainerHandle, ItemHandle, ItemInstance, ItemKind, KindError};

/// Read-only source of item definitions.
pub trait ItemCatalog: Send + Sync {
    fn lookup(&self, handle: ItemHandle) -> Option<Arc<ItemKind>>;

    /// All kinds known to the catalog, ordered by handle.
    fn all_kinds(&self) -> Vec<Arc<ItemKind>>;
}

/// Builds and tears down instances on behalf of a container.
pub trait ItemFactory: Send + Sync {
    /// Returns a single-unit carried instance of `kind`.
    fn instantiate(&self, kind: &Arc<ItemKind>) -> ItemInstance;

    /// Rebuilds a saved instance. A saved sub-container handle is kept when
    /// the kind still embeds a container.
    fn reinstate(&self, kind: &Arc<ItemKind>, nested: Option<ContainerHandle>) -> ItemInstance {
        match nested {
            Some(handle) if kind.nested.is_some() => {
                ItemInstance::new(Arc::clone(kind)).with_nested(handle)
            }
            _ => self.instantiate(kind),
        }
    }

    /// Called once for every instance the container destroys: emptied
    /// stacks, cleared contents, records that failed to load and
    /// destroying drops. Owners of sub-containers tear them down here.
    fn destroy(&self, instance: &ItemInstance);
}

/// Factory that hands out sequential [`ContainerHandle`]s to kinds that embed
/// a sub-container and tracks which of them are still alive.
#[derive(Debug, Default)]
pub struct DefaultFactory {
    next_container: AtomicU64,
    live: Mutex<BTreeSet<ContainerHandle>>,
}

impl DefaultFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts handle allocation at `first`, e.g. after restoring saved containers.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next_container: AtomicU64::new(first),
            ..Self::default()
        }
    }

    /// Sub-container handles held by instances that have not been destroyed.
    pub fn live_containers(&self) -> Vec<ContainerHandle> {
        self.live().iter().copied().collect()
    }

    pub fn is_live(&self, handle: ContainerHandle) -> bool {
        self.live().contains(&handle)
    }

    fn live(&self) -> MutexGuard<'_, BTreeSet<ContainerHandle>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ItemFactory for DefaultFactory {
    fn instantiate(&self, kind: &Arc<ItemKind>) -> ItemInstance {
        let instance = ItemInstance::new(Arc::clone(kind));
        if kind.nested.is_some() {
            let handle = ContainerHandle(self.next_container.fetch_add(1, Ordering::Relaxed));
            self.live().insert(handle);
            return instance.with_nested(handle);
        }
        instance
    }

    fn reinstate(&self, kind: &Arc<ItemKind>, nested: Option<ContainerHandle>) -> ItemInstance {
        match nested {
            Some(handle) if kind.nested.is_some() => {
                // Fresh handles must never collide with reinstated ones.
                self.next_container
                    .fetch_max(handle.0.saturating_add(1), Ordering::Relaxed);
                self.live().insert(handle);
                ItemInstance::new(Arc::clone(kind)).with_nested(handle)
            }
            _ => self.instantiate(kind),
        }
    }

    fn destroy(&self, instance: &ItemInstance) {
        if let Some(handle) = instance.nested() {
            self.live().remove(&handle);
            tracing::debug!(container = handle.0, "released sub-container");
        }
    }
}

/// In-memory catalog keyed by handle.
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    kinds: BTreeMap<ItemHandle, Arc<ItemKind>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, validating each kind and rejecting duplicate handles.
    pub fn from_kinds(kinds: impl IntoIterator<Item = ItemKind>) -> Result<Self, KindError> {
        let mut catalog = Self::new();
        for kind in kinds {
            catalog.insert(kind)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, kind: ItemKind) -> Result<Arc<ItemKind>, KindError> {
        kind.validate()?;
        if self.kinds.contains_key(&kind.handle) {
            return Err(KindError::DuplicateHandle {
                handle: kind.handle,
            });
        }
        let kind = Arc::new(kind);
        self.kinds.insert(kind.handle, Arc::clone(&kind));
        Ok(kind)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Finds a kind by display name.
    pub fn by_name(&self, name: &str) -> Option<Arc<ItemKind>> {
        self.kinds.values().find(|kind| kind.name == name).cloned()
    }
}

impl ItemCatalog for MemoryCatalog {
    fn lookup(&self, handle: ItemHandle) -> Option<Arc<ItemKind>> {
        self.kinds.get(&handle).cloned()
    }

    fn all_kinds(&self) -> Vec<Arc<ItemKind>> {
        self.kinds.values().cloned().collect()
    }
}
