//! Container configuration and tunable defaults.

use bitflags::bitflags;

use crate::grid::Cell;
use crate::item::NestedContainerSpec;

/// Width and height of a container grid, in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDimensions {
    pub width: u32,
    pub height: u32,
}

impl GridDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as i64) < self.width as i64
            && (cell.y as i64) < self.height as i64
    }

    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::new(ContainerConfig::DEFAULT_WIDTH, ContainerConfig::DEFAULT_HEIGHT)
    }
}

/// Optional weight budget of a container.
///
/// `overage` is a soft buffer: placements are accepted while the resulting
/// weight stays at or below `max + overage`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightBudget {
    pub max: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub overage: f32,
}

impl WeightBudget {
    pub const fn new(max: f32, overage: f32) -> Self {
        Self { max, overage }
    }

    /// Hard ceiling used by the affordability check.
    pub fn limit(&self) -> f32 {
        self.max + self.overage
    }
}

bitflags! {
    /// Interactions a presentation layer may offer on a container.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ContainerAccess: u8 {
        /// Items may be picked up (dragged out).
        const PICK_UP = 1 << 0;
        /// Items coming from other containers may be placed in.
        const PLACE = 1 << 1;
        /// Usable items may be consumed in place.
        const USE = 1 << 2;
    }
}

/// Placement mode of a container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerMode {
    #[default]
    FullControl,
    DropOnly,
    DragOnly,
    ReadOnly,
}

impl ContainerMode {
    pub fn access(self) -> ContainerAccess {
        match self {
            Self::FullControl => ContainerAccess::all(),
            Self::DropOnly => ContainerAccess::PLACE,
            Self::DragOnly => ContainerAccess::PICK_UP,
            Self::ReadOnly => ContainerAccess::empty(),
        }
    }

    pub fn can_pick_up(self) -> bool {
        self.access().contains(ContainerAccess::PICK_UP)
    }

    /// Items may always return to the container they were picked from,
    /// unless it is read-only.
    pub fn can_place(self, from_same_container: bool) -> bool {
        if self == Self::ReadOnly {
            return false;
        }
        from_same_container || self.access().contains(ContainerAccess::PLACE)
    }

    pub fn can_use(self) -> bool {
        self.access().contains(ContainerAccess::USE)
    }
}

/// Category tag used by owners to look containers up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerCategory {
    #[default]
    Common,
    Equipment,
    Crafting,
    Keys,
}

/// Errors raised when a container configuration is rejected at init.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("container '{id}' has an empty grid ({width}x{height})")]
    EmptyGrid { id: String, width: u32, height: u32 },

    #[error("container '{id}' has an invalid weight budget (max: {max}, overage: {overage})")]
    InvalidWeight { id: String, max: f32, overage: f32 },
}

/// Static description of a container, fixed at initialization.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContainerConfig {
    pub id: String,
    pub title: String,
    pub dimensions: GridDimensions,
    pub mode: ContainerMode,
    pub category: ContainerCategory,
    pub weight: Option<WeightBudget>,
}

impl ContainerConfig {
    pub const DEFAULT_WIDTH: u32 = 10;
    pub const DEFAULT_HEIGHT: u32 = 10;
    pub const DEFAULT_TITLE: &'static str = "Container";

    pub fn new(id: impl Into<String>, dimensions: GridDimensions) -> Self {
        Self {
            id: id.into(),
            title: Self::DEFAULT_TITLE.to_owned(),
            dimensions,
            mode: ContainerMode::default(),
            category: ContainerCategory::default(),
            weight: None,
        }
    }

    /// Configuration for the container embedded in an item.
    pub fn from_nested(
        id: impl Into<String>,
        spec: &NestedContainerSpec,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            dimensions: spec.dimensions,
            mode: spec.mode,
            category: spec.category,
            weight: spec.weight,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ContainerMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: ContainerCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_weight(mut self, budget: WeightBudget) -> Self {
        self.weight = Some(budget);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let GridDimensions { width, height } = self.dimensions;
        if width == 0 || height == 0 || i32::try_from(width.max(height)).is_err() {
            return Err(ConfigError::EmptyGrid {
                id: self.id.clone(),
                width,
                height,
            });
        }

        if let Some(budget) = self.weight {
            let valid = budget.max.is_finite()
                && budget.overage.is_finite()
                && budget.max >= 0.0
                && budget.overage >= 0.0;
            if !valid {
                return Err(ConfigError::InvalidWeight {
                    id: self.id.clone(),
                    max: budget.max,
                    overage: budget.overage,
                });
            }
        }

        Ok(())
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self::new("container", GridDimensions::default())
    }
}
