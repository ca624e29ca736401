//! Weight accounting, derived from live grid contents on every call.
use super::GridContainer;
use crate::item::ItemKind;

impl GridContainer {
    /// Sum of `unit weight * amount` over distinct stored instances.
    pub fn current_weight(&self) -> f32 {
        self.grid
            .iter()
            .map(|(_, instance)| instance.weight())
            .sum()
    }

    /// `max + overage`, or `None` when the container has no weight budget.
    pub fn weight_limit(&self) -> Option<f32> {
        self.config.weight.map(|budget| budget.limit())
    }

    /// True iff one more unit of `kind` stays within `max + overage` (inclusive).
    pub fn can_afford(&self, kind: &ItemKind) -> bool {
        match self.weight_limit() {
            Some(limit) => self.current_weight() + kind.weight <= limit,
            None => true,
        }
    }

    /// Largest `n <= wanted` such that `n` more units of weight `unit` still fit.
    pub(crate) fn affordable_units(&self, unit: f32, wanted: u32) -> u32 {
        let Some(limit) = self.weight_limit() else {
            return wanted;
        };
        if unit <= 0.0 {
            return if self.current_weight() <= limit { wanted } else { 0 };
        }

        let current = self.current_weight();
        let fits = |n: u32| current + unit * n as f32 <= limit;

        let room = ((limit - current) / unit).floor();
        let mut n = if room <= 0.0 { 0 } else { (room as u64).min(u64::from(wanted)) as u32 };
        while n > 0 && !fits(n) {
            n -= 1;
        }
        while n < wanted && fits(n + 1) {
            n += 1;
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::config::{ContainerConfig, GridDimensions, WeightBudget};
    use crate::container::GridContainer;
    use crate::env::ContainerEnv;
    use crate::item::{ItemHandle, ItemKind};

    fn container(budget: Option<WeightBudget>) -> GridContainer {
        let mut config = ContainerConfig::new("pack", GridDimensions::new(4, 4));
        config.weight = budget;
        GridContainer::new(config, ContainerEnv::default()).unwrap()
    }

    #[test]
    fn multi_cell_items_count_once() {
        let mut pack = container(None);
        let plank = Arc::new(
            ItemKind::new(ItemHandle(1), "plank")
                .with_footprint(3, 1)
                .with_weight(2.5),
        );
        pack.add_item(&plank, 1).unwrap();
        assert_eq!(pack.current_weight(), 2.5);
    }

    #[test]
    fn unlimited_container_affords_everything() {
        let pack = container(None);
        let anvil = ItemKind::new(ItemHandle(1), "anvil").with_weight(1000.0);
        assert!(pack.can_afford(&anvil));
        assert_eq!(pack.weight_limit(), None);
    }

    #[test]
    fn affordable_units_respects_overage() {
        let pack = container(Some(WeightBudget::new(10.0, 2.0)));
        assert_eq!(pack.weight_limit(), Some(12.0));
        assert_eq!(pack.affordable_units(3.0, 10), 4);
        assert_eq!(pack.affordable_units(3.0, 2), 2);
        assert_eq!(pack.affordable_units(5.0, 10), 2);
        assert_eq!(pack.affordable_units(13.0, 1), 0);
    }
}
