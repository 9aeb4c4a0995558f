//! # Action Module
//!
//! An [`Action`] is one crafting recipe resolved against a domain's
//! [`Vocabulary`](crate::Vocabulary). It has:
//!
//! * `requires`: items that must be held (at least one unit) but are not used up,
//!   such as a workbench or a tool
//! * `consumes`: items and quantities removed from the inventory
//! * `produces`: items and quantities added to the inventory
//! * `cost`: a fixed positive cost, independent of the state
//!
//! ## Basic Usage
//!
//! ```
//! use craftplan::{Action, Vocabulary};
//!
//! let vocabulary = Vocabulary::new(["wood", "plank"]).unwrap();
//! let wood = vocabulary.id("wood").unwrap();
//! let plank = vocabulary.id("plank").unwrap();
//!
//! let make_plank = Action::new("make plank", 1)
//!     .unwrap()
//!     .consumes(wood, 1)
//!     .produces(plank, 4);
//!
//! let mut state = vocabulary.empty_state();
//! assert!(!make_plank.can_perform(&state));
//!
//! state.set(wood, 1);
//! assert!(make_plank.can_perform(&state));
//!
//! // Applying an action copies the state; the input is left untouched
//! let next = make_plank.apply(&state).unwrap();
//! assert_eq!(next.get(wood), 0);
//! assert_eq!(next.get(plank), 4);
//! assert_eq!(state.get(wood), 1);
//! ```

use crate::{ItemId, PlanError, Result, State};

/// Position of an action in its [`Catalog`](crate::Catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub(crate) usize);

impl ActionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named recipe with preconditions, additive effects and a cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action, unique within a catalog
    pub name: String,
    /// The cost of performing this action
    pub cost: u32,
    requires: Vec<ItemId>,
    consumes: Vec<(ItemId, u32)>,
    produces: Vec<(ItemId, u32)>,
}

impl Action {
    /// Creates an action with no requirements and no effects.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidActionCost` if the cost is zero.
    pub fn new(name: impl Into<String>, cost: u32) -> Result<Self> {
        let name = name.into();
        if cost == 0 {
            return Err(PlanError::InvalidActionCost(name));
        }

        Ok(Self {
            name,
            cost,
            requires: Vec::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
        })
    }

    /// Adds an item that must be held, without being consumed.
    pub fn requires(mut self, item: ItemId) -> Self {
        if !self.requires.contains(&item) {
            self.requires.push(item);
        }
        self
    }

    /// Adds an item consumed by this action. Repeated items accumulate.
    pub fn consumes(mut self, item: ItemId, quantity: u32) -> Self {
        merge(&mut self.consumes, item, quantity);
        self
    }

    /// Adds an item produced by this action. Repeated items accumulate.
    pub fn produces(mut self, item: ItemId, quantity: u32) -> Self {
        merge(&mut self.produces, item, quantity);
        self
    }

    pub fn required_items(&self) -> &[ItemId] {
        &self.requires
    }

    pub fn consumed_items(&self) -> &[(ItemId, u32)] {
        &self.consumes
    }

    pub fn produced_items(&self) -> &[(ItemId, u32)] {
        &self.produces
    }

    /// The canonical product: the first item this action declares it produces.
    pub fn product(&self) -> Option<ItemId> {
        self.produces.first().map(|&(item, _)| item)
    }

    /// Checks whether the action applies to `state`.
    ///
    /// Every consumed item must be held in at least the consumed quantity and
    /// every required item must be held at least once.
    pub fn can_perform(&self, state: &State) -> bool {
        self.consumes
            .iter()
            .all(|&(item, quantity)| state.get(item) >= quantity)
            && self.requires.iter().all(|&item| state.holds(item))
    }

    /// Returns a copy of `state` with this action's effect applied.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::PreconditionNotMet` if the action does not apply to
    /// `state`, and `PlanError::QuantityOverflow` if a produced quantity would
    /// not fit in a `u32`. Quantities are never clamped.
    pub fn apply(&self, state: &State) -> Result<State> {
        if !self.requires.iter().all(|&item| state.holds(item)) {
            return Err(PlanError::PreconditionNotMet(self.name.clone()));
        }

        let mut next = state.clone();
        for &(item, quantity) in &self.consumes {
            next.take(item, quantity)
                .ok_or_else(|| PlanError::PreconditionNotMet(self.name.clone()))?;
        }
        for &(item, quantity) in &self.produces {
            next.add(item, quantity)
                .ok_or_else(|| PlanError::QuantityOverflow(self.name.clone()))?;
        }
        Ok(next)
    }
}

fn merge(entries: &mut Vec<(ItemId, u32)>, item: ItemId, quantity: u32) {
    match entries.iter_mut().find(|(existing, _)| *existing == item) {
        Some((_, total)) => *total = total.saturating_add(quantity),
        None => entries.push((item, quantity)),
    }
}
