use core::fmt;

use crate::config::{ContainerCategory, ContainerMode, GridDimensions, WeightBudget};

/// Stable identifier of an item kind, unique across the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemHandle(pub u32);

impl fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Cell rectangle an item occupies in its normal orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Footprint {
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    pub const ONE: Self = Self::new(1, 1);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn rotated(self) -> Self {
        Self::new(self.height, self.width)
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn cells(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::ONE
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemCategory {
    Weapon,
    Armor,
    Consumable,
    Material,
    Quest,
    Key,
    #[default]
    Misc,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemRarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Container carried inside an item (bags, chests).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NestedContainerSpec {
    pub dimensions: GridDimensions,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: ContainerMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: ContainerCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight: Option<WeightBudget>,
}

/// Errors raised when an item definition is malformed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum KindError {
    #[error("{handle} has an empty footprint")]
    EmptyFootprint { handle: ItemHandle },

    #[error("{handle} has a max stack of zero")]
    ZeroMaxStack { handle: ItemHandle },

    #[error("{handle} has an invalid weight ({weight})")]
    InvalidWeight { handle: ItemHandle, weight: f32 },

    #[error("{handle} is defined more than once")]
    DuplicateHandle { handle: ItemHandle },
}

/// Immutable definition of an item type.
///
/// Kinds are owned by the catalog and shared by reference; the engine never
/// builds them itself.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemKind {
    pub handle: ItemHandle,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub footprint: Footprint,
    #[cfg_attr(feature = "serde", serde(default = "default_max_stack"))]
    pub max_stack: u32,
    /// Weight of a single unit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub usable: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: ItemCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rarity: ItemRarity,
    #[cfg_attr(feature = "serde", serde(default))]
    pub nested: Option<NestedContainerSpec>,
}

#[cfg(feature = "serde")]
fn default_max_stack() -> u32 {
    1
}

impl ItemKind {
    pub fn new(handle: ItemHandle, name: impl Into<String>) -> Self {
        Self {
            handle,
            name: name.into(),
            footprint: Footprint::ONE,
            max_stack: 1,
            weight: 0.0,
            usable: false,
            category: ItemCategory::default(),
            rarity: ItemRarity::default(),
            nested: None,
        }
    }

    #[must_use]
    pub fn with_footprint(mut self, width: u32, height: u32) -> Self {
        self.footprint = Footprint::new(width, height);
        self
    }

    #[must_use]
    pub fn with_max_stack(mut self, max_stack: u32) -> Self {
        self.max_stack = max_stack;
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn usable(mut self) -> Self {
        self.usable = true;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: ItemRarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_nested(mut self, spec: NestedContainerSpec) -> Self {
        self.nested = Some(spec);
        self
    }

    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }

    pub fn validate(&self) -> Result<(), KindError> {
        let handle = self.handle;
        if self.footprint.is_empty() {
            return Err(KindError::EmptyFootprint { handle });
        }
        if self.max_stack == 0 {
            return Err(KindError::ZeroMaxStack { handle });
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(KindError::InvalidWeight {
                handle,
                weight: self.weight,
            });
        }
        Ok(())
    }
}
