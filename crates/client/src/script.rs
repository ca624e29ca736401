//! Replayable operation scripts.
//!
//! A script is a RON list of [`Step`]s applied to one container. The session
//! plays the role of the presentation layer: it holds the carried instance
//! between a pick-up and the next placement and applies the mode rules
//! before calling into the engine.
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use stash_core::{
    Cell, GridContainer, ItemCatalog, ItemHandle, ItemInstance, OpCode, OpError, OpResult,
    Placement,
};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub enum Step {
    Add { item: u32, amount: u32 },
    Remove { item: u32, amount: u32 },
    RemoveAt { x: i32, y: i32, amount: u32 },
    PickUp { x: i32, y: i32 },
    /// Places the carried instance.
    Place { x: i32, y: i32 },
    /// Rotates the carried instance.
    Rotate,
    Split { x: i32, y: i32 },
    Use { x: i32, y: i32 },
    Drop {
        x: i32,
        y: i32,
        #[serde(default)]
        destroy: bool,
    },
    Clear,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse script RON: {}", e))
    }
}

/// Outcome of one applied step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    pub code: OpCode,
    pub detail: String,
}

impl StepReport {
    fn ok(detail: impl Into<String>) -> Self {
        Self {
            code: OpCode::Success,
            detail: detail.into(),
        }
    }

    fn failed(error: OpError) -> Self {
        Self {
            code: error.code(),
            detail: error.to_string(),
        }
    }
}

impl From<OpResult> for StepReport {
    fn from(result: OpResult) -> Self {
        match result {
            Ok(()) => Self::ok("done"),
            Err(error) => Self::failed(error),
        }
    }
}

pub struct Session<'a> {
    container: GridContainer,
    catalog: &'a dyn ItemCatalog,
    carried: Option<ItemInstance>,
}

impl<'a> Session<'a> {
    pub fn new(container: GridContainer, catalog: &'a dyn ItemCatalog) -> Self {
        Self {
            container,
            catalog,
            carried: None,
        }
    }

    pub fn container(&self) -> &GridContainer {
        &self.container
    }

    pub fn carried(&self) -> Option<&ItemInstance> {
        self.carried.as_ref()
    }

    pub fn run(&mut self, script: &Script) -> Vec<StepReport> {
        script
            .steps
            .iter()
            .map(|step| {
                let report = self.apply(step);
                tracing::info!(?step, code = %report.code, detail = %report.detail, "step");
                report
            })
            .collect()
    }

    pub fn apply(&mut self, step: &Step) -> StepReport {
        match *step {
            Step::Add { item, amount } => match self.catalog.lookup(ItemHandle(item)) {
                Some(kind) => self.container.add_item(&kind, amount).into(),
                None => StepReport::failed(OpError::ErrorInItem),
            },
            Step::Remove { item, amount } => {
                self.container.remove_item(ItemHandle(item), amount).into()
            }
            Step::RemoveAt { x, y, amount } => {
                match self.container.remove_from_slot(Cell::new(x, y), amount) {
                    Ok(removed) => StepReport::ok(format!("removed {removed}")),
                    Err(error) => StepReport::failed(error),
                }
            }
            Step::PickUp { x, y } => self.pick_up(Cell::new(x, y)),
            Step::Place { x, y } => self.place(Cell::new(x, y)),
            Step::Rotate => match self.carried.as_mut() {
                Some(instance) => {
                    instance.rotate();
                    StepReport::ok(format!("{:?}", instance.orientation()))
                }
                None => StepReport::failed(OpError::ErrorInItem),
            },
            Step::Split { x, y } => self.split(Cell::new(x, y)),
            Step::Use { x, y } => {
                if !self.container.can_use() {
                    return StepReport::failed(OpError::NoPermission);
                }
                match self.container.use_at(Cell::new(x, y)) {
                    Ok(used) => {
                        StepReport::ok(format!("used {} x{}", used.kind.name, used.amount))
                    }
                    Err(error) => StepReport::failed(error),
                }
            }
            Step::Drop { x, y, destroy } => {
                match self.container.drop_at(Cell::new(x, y), destroy) {
                    Ok(dropped) => StepReport::ok(format!(
                        "dropped {} x{}",
                        dropped.collectible.kind.name, dropped.collectible.amount
                    )),
                    Err(error) => StepReport::failed(error),
                }
            }
            Step::Clear => self.container.clear().into(),
        }
    }

    fn pick_up(&mut self, cell: Cell) -> StepReport {
        if self.carried.is_some() {
            return StepReport::failed(OpError::ErrorInItem);
        }
        if !self.container.can_pick_up() {
            return StepReport::failed(OpError::NoPermission);
        }
        match self.container.pick_up(cell) {
            Some(instance) => {
                let report = StepReport::ok(format!(
                    "carrying {} x{}",
                    instance.kind().name,
                    instance.amount()
                ));
                self.carried = Some(instance);
                report
            }
            None => StepReport::failed(OpError::ErrorInItem),
        }
    }

    fn split(&mut self, cell: Cell) -> StepReport {
        if self.carried.is_some() {
            return StepReport::failed(OpError::ErrorInItem);
        }
        if !self.container.can_pick_up() {
            return StepReport::failed(OpError::NoPermission);
        }
        match self.container.split_at(cell) {
            Ok(half) => {
                let report =
                    StepReport::ok(format!("carrying {} x{}", half.kind().name, half.amount()));
                self.carried = Some(half);
                report
            }
            Err(error) => StepReport::failed(error),
        }
    }

    fn place(&mut self, cell: Cell) -> StepReport {
        let Some(instance) = self.carried.take() else {
            return StepReport::failed(OpError::ErrorInItem);
        };
        // Instances in a session always come from this container.
        if !self.container.can_place(true) {
            self.carried = Some(instance);
            return StepReport::failed(OpError::NoPermission);
        }

        match self.container.place_checked(instance, cell) {
            Ok(placement) => {
                let detail = match &placement {
                    Placement::Placed { displaced: None } => "placed".to_owned(),
                    Placement::Placed { displaced: Some(other) } => {
                        format!("swapped, carrying {}", other.kind().name)
                    }
                    Placement::Merged => "merged".to_owned(),
                    Placement::PartiallyMerged { remainder } => {
                        format!("merged, carrying x{}", remainder.amount())
                    }
                };
                self.carried = placement.into_carried();
                StepReport::ok(detail)
            }
            Err(rejected) => {
                let error = rejected.error;
                self.carried = Some(rejected.into_instance());
                StepReport::failed(error)
            }
        }
    }
}
