//! Collaborators a container depends on.
//!
//! The engine never looks its collaborators up implicitly; they are handed to
//! [`crate::container::GridContainer::new`] bundled in a [`ContainerEnv`]:
//!
//! - [`ItemFactory`]: builds instances for items entering the grid
//! - [`PermissionSet`]: AND of all [`PermissionChecker`]s
//! - [`ChangeSink`]: receives one signal per successful mutating call
mod catalog;
mod notify;
mod permission;

pub use catalog::{DefaultFactory, ItemCatalog, ItemFactory, MemoryCatalog};
pub use notify::{ChangeCounter, ChangeSink, NoopSink};
pub use permission::{CategoryPermission, PermissionChecker, PermissionSet, RarityPermission};

use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct ContainerEnv {
    factory: Arc<dyn ItemFactory>,
    permissions: PermissionSet,
    sink: Arc<dyn ChangeSink>,
}

impl ContainerEnv {
    pub fn new(factory: Arc<dyn ItemFactory>) -> Self {
        Self {
            factory,
            permissions: PermissionSet::new(),
            sink: Arc::new(NoopSink),
        }
    }

    #[must_use]
    pub fn with_permissions(mut self, permissions: PermissionSet) -> Self {
        self.permissions = permissions;
        self
    }

    #[must_use]
    pub fn with_checker(mut self, checker: impl PermissionChecker + 'static) -> Self {
        self.permissions.push(Arc::new(checker));
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ChangeSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn factory(&self) -> &dyn ItemFactory {
        self.factory.as_ref()
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn sink(&self) -> &dyn ChangeSink {
        self.sink.as_ref()
    }
}

impl Default for ContainerEnv {
    fn default() -> Self {
        Self::new(Arc::new(DefaultFactory::new()))
    }
}

impl fmt::Debug for ContainerEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerEnv")
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}
