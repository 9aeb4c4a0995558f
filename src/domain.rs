//! # Domain descriptions
//!
//! A domain is read from a JSON document with four sections:
//!
//! ```json
//! {
//!   "Items": ["wood", "plank"],
//!   "Initial": {"wood": 1},
//!   "Goal": {"plank": 4},
//!   "Recipes": {
//!     "make plank": {"Produces": {"plank": 4}, "Consumes": {"wood": 1}, "Time": 1}
//!   }
//! }
//! ```
//!
//! Recipes may also carry a `Requires` map (`{"bench": true}`) naming items
//! that must be held but are not consumed. Map order in the document is kept:
//! recipes enter the catalog in the order they are written, and the first
//! `Produces` entry is the recipe's canonical product.
//!
//! ```
//! use craftplan::Domain;
//!
//! let domain = Domain::from_json(r#"{
//!     "Items": ["wood", "plank"],
//!     "Initial": {"wood": 1},
//!     "Goal": {"plank": 4},
//!     "Recipes": {
//!         "make plank": {"Produces": {"plank": 4}, "Consumes": {"wood": 1}, "Time": 1}
//!     }
//! }"#).unwrap();
//!
//! let problem = domain.problem().unwrap();
//! assert_eq!(problem.catalog.len(), 1);
//! assert!(!problem.goal.is_satisfied(&problem.initial));
//! ```

use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::{Action, Catalog, Goal, PlanError, Result, State, Vocabulary};

/// A declarative planning domain.
#[derive(Debug, Clone, Deserialize)]
pub struct Domain {
    #[serde(rename = "Items")]
    pub items: Vec<String>,
    #[serde(rename = "Initial", default, deserialize_with = "ordered_map")]
    pub initial: Vec<(String, u32)>,
    #[serde(rename = "Goal", default, deserialize_with = "ordered_map")]
    pub goal: Vec<(String, u32)>,
    #[serde(rename = "Recipes", deserialize_with = "ordered_map")]
    pub recipes: Vec<(String, Recipe)>,
}

/// One recipe as written in the domain description.
#[derive(Debug, Clone, Deserialize)]
pub struct Recipe {
    #[serde(rename = "Produces", deserialize_with = "ordered_map")]
    pub produces: Vec<(String, u32)>,
    #[serde(rename = "Requires", default, deserialize_with = "ordered_map")]
    pub requires: Vec<(String, bool)>,
    #[serde(rename = "Consumes", default, deserialize_with = "ordered_map")]
    pub consumes: Vec<(String, u32)>,
    #[serde(rename = "Time")]
    pub time: u32,
}

/// Everything a search needs, resolved from a [`Domain`].
#[derive(Debug, Clone)]
pub struct Problem {
    pub catalog: Catalog,
    pub initial: State,
    pub goal: Goal,
}

impl Domain {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn vocabulary(&self) -> Result<Vocabulary> {
        Vocabulary::new(self.items.iter().cloned())
    }

    /// Resolves every recipe against the declared items and builds the catalog.
    pub fn catalog(&self) -> Result<Catalog> {
        let vocabulary = self.vocabulary()?;
        let actions = self
            .recipes
            .iter()
            .map(|(name, recipe)| recipe.resolve(name, &vocabulary))
            .collect::<Result<Vec<_>>>()?;
        Catalog::new(vocabulary, actions)
    }

    /// The declared items at zero, overridden by the `Initial` section.
    pub fn initial_state(&self, catalog: &Catalog) -> Result<State> {
        let quantities: Vec<(&str, u32)> = self
            .initial
            .iter()
            .map(|(name, quantity)| (name.as_str(), *quantity))
            .collect();
        catalog.state_from(&quantities)
    }

    pub fn goal(&self, catalog: &Catalog) -> Result<Goal> {
        let requirements: Vec<(&str, u32)> = self
            .goal
            .iter()
            .map(|(name, quantity)| (name.as_str(), *quantity))
            .collect();
        Goal::from_names(catalog, &requirements)
    }

    pub fn problem(&self) -> Result<Problem> {
        let catalog = self.catalog()?;
        let initial = self.initial_state(&catalog)?;
        let goal = self.goal(&catalog)?;
        Ok(Problem {
            catalog,
            initial,
            goal,
        })
    }
}

impl Recipe {
    /// Resolves item names against `vocabulary`.
    ///
    /// `Requires` entries set to `false` are ignored.
    pub fn resolve(&self, name: &str, vocabulary: &Vocabulary) -> Result<Action> {
        let lookup = |item: &str| {
            vocabulary.id(item).ok_or_else(|| PlanError::UnknownItem {
                action: name.to_string(),
                item: item.to_string(),
            })
        };

        let mut action = Action::new(name, self.time)?;
        for (item, present) in &self.requires {
            if *present {
                action = action.requires(lookup(item)?);
            }
        }
        for (item, quantity) in &self.consumes {
            action = action.consumes(lookup(item)?, *quantity);
        }
        for (item, quantity) in &self.produces {
            action = action.produces(lookup(item)?, *quantity);
        }
        Ok(action)
    }
}

/// Reads a JSON object into `(key, value)` pairs in document order.
fn ordered_map<'de, D, V>(deserializer: D) -> std::result::Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct OrderedMap<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMap<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, V>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedMap(PhantomData))
}
