use std::fmt;
use std::sync::Arc;

use crate::item::{ItemCategory, ItemInstance, ItemKind, ItemRarity};

/// Decides whether an item may enter a container.
pub trait PermissionChecker: Send + Sync {
    fn allows_kind(&self, kind: &ItemKind) -> bool;

    fn allows_instance(&self, instance: &ItemInstance) -> bool {
        self.allows_kind(instance.kind())
    }
}

/// Accepts only the listed categories.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryPermission {
    allowed: Vec<ItemCategory>,
}

impl CategoryPermission {
    pub fn new(allowed: impl IntoIterator<Item = ItemCategory>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }
}

impl PermissionChecker for CategoryPermission {
    fn allows_kind(&self, kind: &ItemKind) -> bool {
        self.allowed.contains(&kind.category)
    }
}

/// Accepts only the listed rarities.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RarityPermission {
    allowed: Vec<ItemRarity>,
}

impl RarityPermission {
    pub fn new(allowed: impl IntoIterator<Item = ItemRarity>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }
}

impl PermissionChecker for RarityPermission {
    fn allows_kind(&self, kind: &ItemKind) -> bool {
        self.allowed.contains(&kind.rarity)
    }
}

/// Conjunction of checkers. An empty set grants everything.
#[derive(Clone, Default)]
pub struct PermissionSet {
    checkers: Vec<Arc<dyn PermissionChecker>>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, checker: impl PermissionChecker + 'static) -> Self {
        self.push(Arc::new(checker));
        self
    }

    pub fn push(&mut self, checker: Arc<dyn PermissionChecker>) {
        self.checkers.push(checker);
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }
}

impl PermissionChecker for PermissionSet {
    fn allows_kind(&self, kind: &ItemKind) -> bool {
        self.checkers.iter().all(|checker| checker.allows_kind(kind))
    }

    fn allows_instance(&self, instance: &ItemInstance) -> bool {
        self.checkers
            .iter()
            .all(|checker| checker.allows_instance(instance))
    }
}

impl fmt::Debug for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionSet")
            .field("checkers", &self.checkers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemHandle;

    fn sword() -> ItemKind {
        ItemKind::new(ItemHandle(1), "sword")
            .with_category(ItemCategory::Weapon)
            .with_rarity(ItemRarity::Rare)
    }

    #[test]
    fn empty_set_allows_everything() {
        assert!(PermissionSet::new().allows_kind(&sword()));
    }

    #[test]
    fn all_checkers_must_agree() {
        let weapons = CategoryPermission::new([ItemCategory::Weapon]);
        let rare = RarityPermission::new([ItemRarity::Rare, ItemRarity::Epic]);
        let common = RarityPermission::new([ItemRarity::Common]);

        let set = PermissionSet::new().with(weapons.clone()).with(rare);
        assert!(set.allows_kind(&sword()));

        let set = set.with(common);
        assert!(!set.allows_kind(&sword()));
        assert!(!weapons.allows_kind(&ItemKind::new(ItemHandle(2), "apple")));
    }
}
