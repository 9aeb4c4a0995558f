//! Conjunctive quantity goals.
//!
//! ```
//! use craftplan::{Goal, Vocabulary};
//!
//! let vocabulary = Vocabulary::new(["wood", "plank"]).unwrap();
//! let plank = vocabulary.id("plank").unwrap();
//! let goal = Goal::new().require(plank, 4);
//!
//! let mut state = vocabulary.empty_state();
//! assert!(!goal.is_satisfied(&state));
//! state.set(plank, 5);
//! assert!(goal.is_satisfied(&state));
//! ```

use crate::{Catalog, ItemId, PlanError, Result, State};

/// Minimum quantities that must all hold at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Goal {
    requirements: Vec<(ItemId, u32)>,
}

impl Goal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires at least `quantity` of `item`. A repeated item keeps the last quantity.
    pub fn require(mut self, item: ItemId, quantity: u32) -> Self {
        match self.requirements.iter_mut().find(|(existing, _)| *existing == item) {
            Some((_, required)) => *required = quantity,
            None => self.requirements.push((item, quantity)),
        }
        self
    }

    /// Builds a goal from item names.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::UnknownGoalItem` for a name outside the catalog's vocabulary.
    pub fn from_names(catalog: &Catalog, requirements: &[(&str, u32)]) -> Result<Self> {
        requirements
            .iter()
            .try_fold(Self::new(), |goal, &(name, quantity)| {
                let item = catalog
                    .item(name)
                    .ok_or_else(|| PlanError::UnknownGoalItem(name.to_string()))?;
                Ok(goal.require(item, quantity))
            })
    }

    /// The goal predicate: every required quantity is held.
    pub fn is_satisfied(&self, state: &State) -> bool {
        self.requirements
            .iter()
            .all(|&(item, quantity)| state.get(item) >= quantity)
    }

    /// The required quantity of `item`, if it is a goal item.
    pub fn required(&self, item: ItemId) -> Option<u32> {
        self.requirements
            .iter()
            .find(|(existing, _)| *existing == item)
            .map(|&(_, quantity)| quantity)
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.required(item).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.requirements.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}
