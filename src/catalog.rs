//! The immutable set of actions a search runs over.
//!
//! A [`Catalog`] is built once, before any search, from a [`Vocabulary`] and
//! the domain's actions. Construction validates the actions and derives two
//! indices used by the pruning rules: which items are catalysts (required by
//! some action without being consumed) and which action is the canonical
//! producer of each item.

use std::collections::HashMap;

use crate::{Action, ActionId, ItemId, PlanError, Result, State, Vocabulary};

#[derive(Debug, Clone)]
pub struct Catalog {
    vocabulary: Vocabulary,
    actions: Vec<Action>,
    by_name: HashMap<String, ActionId>,
    catalysts: Vec<bool>,
    /// Items at least one action produces, canonical product or not
    producible: Vec<bool>,
    products: HashMap<ItemId, ActionId>,
}

impl Catalog {
    /// Validates `actions` against `vocabulary` and builds the catalog.
    ///
    /// Catalog order is the order of `actions`; successors are generated in
    /// this order.
    ///
    /// # Errors
    ///
    /// * `PlanError::DuplicateAction` if two actions share a name
    /// * `PlanError::InvalidActionCost` if an action has a zero cost
    /// * `PlanError::NoProducts` if an action produces nothing
    /// * `PlanError::UnknownItem` if an action mentions an item outside `vocabulary`
    ///
    /// Item ids are only range-checked. An action built against another
    /// vocabulary whose ids happen to fall in range is accepted and will
    /// point at whatever items share those positions here; build actions
    /// from `vocabulary` itself, or load them by name through
    /// [`crate::Domain`].
    pub fn new(vocabulary: Vocabulary, actions: Vec<Action>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(actions.len());
        let mut catalysts = vec![false; vocabulary.len()];
        let mut producible = vec![false; vocabulary.len()];
        let mut products = HashMap::new();

        for (index, action) in actions.iter().enumerate() {
            let id = ActionId(index);
            if by_name.insert(action.name.clone(), id).is_some() {
                return Err(PlanError::DuplicateAction(action.name.clone()));
            }
            if action.cost == 0 {
                return Err(PlanError::InvalidActionCost(action.name.clone()));
            }
            if action.produced_items().is_empty() {
                return Err(PlanError::NoProducts(action.name.clone()));
            }

            let mentioned = action
                .required_items()
                .iter()
                .copied()
                .chain(action.consumed_items().iter().map(|&(item, _)| item))
                .chain(action.produced_items().iter().map(|&(item, _)| item));
            for item in mentioned {
                if item.index() >= vocabulary.len() {
                    return Err(PlanError::UnknownItem {
                        action: action.name.clone(),
                        item: format!("#{}", item.index()),
                    });
                }
            }

            for &item in action.required_items() {
                catalysts[item.index()] = true;
            }
            for &(item, _) in action.produced_items() {
                producible[item.index()] = true;
            }
            if let Some(product) = action.product() {
                products.entry(product).or_insert(id);
            }
        }

        log::debug!(
            "Built catalog with {} actions over {} items ({} catalysts)",
            actions.len(),
            vocabulary.len(),
            catalysts.iter().filter(|&&c| c).count()
        );

        Ok(Self {
            vocabulary,
            actions,
            by_name,
            catalysts,
            producible,
            products,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Iterates over actions in catalog order, paired with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &Action)> + '_ {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, action)| (ActionId(i), action))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the action with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this catalog.
    pub fn action(&self, id: ActionId) -> &Action {
        &self.actions[id.0]
    }

    pub fn action_id(&self, name: &str) -> Option<ActionId> {
        self.by_name.get(name).copied()
    }

    pub fn item(&self, name: &str) -> Option<ItemId> {
        self.vocabulary.id(name)
    }

    pub fn item_name(&self, item: ItemId) -> &str {
        self.vocabulary.name(item)
    }

    /// Whether some action requires `item` to be present without consuming it.
    pub fn is_catalyst(&self, item: ItemId) -> bool {
        self.catalysts.get(item.index()).copied().unwrap_or(false)
    }

    /// Whether any action lists `item` among its products.
    pub fn is_producible(&self, item: ItemId) -> bool {
        self.producible.get(item.index()).copied().unwrap_or(false)
    }

    /// The first action in catalog order whose canonical product is `item`.
    pub fn product_action(&self, item: ItemId) -> Option<ActionId> {
        self.products.get(&item).copied()
    }

    /// Builds a state from item names; unlisted items are zero.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::UnknownInitialItem` for a name outside the vocabulary.
    pub fn state_from(&self, quantities: &[(&str, u32)]) -> Result<State> {
        let mut state = self.vocabulary.empty_state();
        for &(name, quantity) in quantities {
            let item = self
                .item(name)
                .ok_or_else(|| PlanError::UnknownInitialItem(name.to_string()))?;
            state.set(item, quantity);
        }
        Ok(state)
    }
}
