//! # State Module
//!
//! This module provides the inventory representation the planner searches over.
//!
//! ## Items and the vocabulary
//!
//! Every domain declares a fixed, ordered list of item names. The
//! [`Vocabulary`] assigns each name a dense [`ItemId`] in declaration order, and
//! every [`State`] stores one quantity per declared item in that same order.
//! Two states are equal, and hash equally, exactly when every item quantity
//! matches.
//!
//! ## Copy-then-mutate
//!
//! Only one state is ever built from scratch: the initial inventory. Every
//! other state is a copy of its parent with one action's effect applied (see
//! [`crate::Action::apply`]). States placed in the planner's closed set or
//! dominance table are never mutated afterwards.
//!
//! ## Basic Usage
//!
//! ```
//! use craftplan::{State, Vocabulary};
//!
//! let vocabulary = Vocabulary::new(["wood", "plank"]).unwrap();
//! let wood = vocabulary.id("wood").unwrap();
//! let plank = vocabulary.id("plank").unwrap();
//!
//! let mut state = vocabulary.empty_state();
//! state.set(wood, 1);
//! assert_eq!(state.get(wood), 1);
//! assert_eq!(state.get(plank), 0);
//!
//! // Zero quantities are left out of the rendered inventory
//! assert_eq!(state.display(&vocabulary).to_string(), "{wood: 1}");
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::{PlanError, Result};

/// Dense index of an item within its domain's [`Vocabulary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) usize);

impl ItemId {
    /// Position of the item in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// The ordered set of item names a domain declares.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    names: Vec<String>,
    index: HashMap<String, ItemId>,
}

impl Vocabulary {
    /// Creates a vocabulary from item names in declaration order.
    ///
    /// Duplicate names are collapsed onto their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidItemName` when a name is empty.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = Self::default();
        for name in names {
            let name = name.into();
            if name.is_empty() {
                return Err(PlanError::InvalidItemName(name));
            }
            if vocabulary.index.contains_key(&name) {
                continue;
            }
            let id = ItemId(vocabulary.names.len());
            vocabulary.index.insert(name.clone(), id);
            vocabulary.names.push(name);
        }
        Ok(vocabulary)
    }

    /// Looks up the id of an item name.
    pub fn id(&self, name: &str) -> Option<ItemId> {
        self.index.get(name).copied()
    }

    /// Returns the name of an item.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this vocabulary.
    pub fn name(&self, id: ItemId) -> &str {
        &self.names[id.0]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over `(id, name)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (ItemId(i), name.as_str()))
    }

    /// The canonical all-zero state for this vocabulary.
    pub fn empty_state(&self) -> State {
        State {
            quantities: vec![0; self.names.len()],
        }
    }
}

/// An inventory snapshot: one non-negative quantity per declared item.
///
/// # Examples
///
/// ```
/// use craftplan::Vocabulary;
///
/// let vocabulary = Vocabulary::new(["wood", "plank"]).unwrap();
/// let plank = vocabulary.id("plank").unwrap();
///
/// let mut a = vocabulary.empty_state();
/// let b = a.clone();
/// a.set(plank, 4);
///
/// assert_ne!(a, b);
/// assert_eq!(a.get(plank), 4);
/// assert_eq!(b.get(plank), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    quantities: Vec<u32>,
}

impl State {
    /// Quantity held of `item`. Items outside the state read as zero.
    pub fn get(&self, item: ItemId) -> u32 {
        self.quantities.get(item.0).copied().unwrap_or(0)
    }

    /// Returns true when at least one unit of `item` is held.
    pub fn holds(&self, item: ItemId) -> bool {
        self.get(item) > 0
    }

    /// Sets the quantity of `item`.
    ///
    /// # Panics
    ///
    /// Panics if `item` does not belong to the vocabulary this state was built from.
    pub fn set(&mut self, item: ItemId, quantity: u32) {
        self.quantities[item.0] = quantity;
    }

    /// Removes `quantity` units of `item`, or returns `None` if fewer are held.
    pub(crate) fn take(&mut self, item: ItemId, quantity: u32) -> Option<()> {
        let slot = self.quantities.get_mut(item.0)?;
        *slot = slot.checked_sub(quantity)?;
        Some(())
    }

    /// Adds `quantity` units of `item`, or returns `None` on overflow or an
    /// item outside the state.
    pub(crate) fn add(&mut self, item: ItemId, quantity: u32) -> Option<()> {
        let slot = self.quantities.get_mut(item.0)?;
        *slot = slot.checked_add(quantity)?;
        Some(())
    }

    /// Iterates over `(item, quantity)` pairs in declaration order, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.quantities
            .iter()
            .enumerate()
            .map(|(i, &quantity)| (ItemId(i), quantity))
    }

    /// Renders the non-zero part of the inventory with item names.
    pub fn display<'a>(&'a self, vocabulary: &'a Vocabulary) -> StateDisplay<'a> {
        StateDisplay {
            state: self,
            vocabulary,
        }
    }
}

/// Helper returned by [`State::display`].
pub struct StateDisplay<'a> {
    state: &'a State,
    vocabulary: &'a Vocabulary,
}

impl fmt::Display for StateDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (item, quantity) in self.state.iter().filter(|(_, q)| *q > 0) {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}: {}", self.vocabulary.name(item), quantity)?;
        }
        write!(f, "}}")
    }
}
