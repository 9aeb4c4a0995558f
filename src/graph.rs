//! Successor generation and duplicate suppression.
//!
//! [`successors`] walks the catalog in order and yields one [`Successor`] per
//! action whose precondition holds on the expanded state. A successor whose
//! resulting state is already recorded in the [`DominanceTable`] at an equal
//! or lower total cost is dropped here, before any heuristic runs.

use std::collections::HashMap;

use crate::{ActionId, Catalog, Result, State};

/// Best known total cost per state.
#[derive(Debug, Default)]
pub struct DominanceTable {
    best: HashMap<State, u64>,
}

impl DominanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best_cost(&self, state: &State) -> Option<u64> {
        self.best.get(state).copied()
    }

    /// Whether reaching `state` at `cost` would beat every recorded path to it.
    pub fn improves(&self, state: &State, cost: u64) -> bool {
        self.best_cost(state).map_or(true, |best| cost < best)
    }

    /// Records `cost` for `state` if it improves on the current record.
    ///
    /// Returns false, leaving the table untouched, when an equal or cheaper
    /// cost is already known.
    pub fn record(&mut self, state: &State, cost: u64) -> bool {
        match self.best.get_mut(state) {
            Some(best) if *best <= cost => false,
            Some(best) => {
                *best = cost;
                true
            }
            None => {
                self.best.insert(state.clone(), cost);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

/// A candidate produced by applying one action to an expanded state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Successor {
    pub action: ActionId,
    pub state: State,
    pub step_cost: u32,
    /// Expanded node's total cost plus `step_cost`.
    pub total_cost: u64,
}

/// Generates the successors of `state`, reached at `total_cost`, in catalog order.
///
/// # Errors
///
/// Only fails if an action's effect disagrees with its own precondition
/// check, which indicates a malformed action.
pub fn successors(
    catalog: &Catalog,
    state: &State,
    total_cost: u64,
    dominance: &DominanceTable,
) -> Result<Vec<Successor>> {
    let mut found = Vec::new();
    for (id, action) in catalog.iter() {
        if !action.can_perform(state) {
            continue;
        }
        let next = action.apply(state)?;
        let candidate_cost = total_cost + u64::from(action.cost);
        if !dominance.improves(&next, candidate_cost) {
            continue;
        }
        found.push(Successor {
            action: id,
            state: next,
            step_cost: action.cost,
            total_cost: candidate_cost,
        });
    }
    Ok(found)
}
