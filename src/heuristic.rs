//! # Pruning heuristics
//!
//! The search orders its frontier by path cost alone. A
//! [`PruningHeuristic`] sits on top of that ordering and decides, for each
//! generated successor, whether it may enter the frontier at all. It is a
//! dominance filter, not a distance estimate: its only answers are "keep"
//! (score 0) and "prune" (score +infinity), so the usual A* optimality
//! argument does not apply to searches that use it.
//!
//! [`CraftingRules`] is the rule-based pruner for crafting domains. For each
//! candidate it checks, in order:
//!
//! 1. tool-tier redundancy: the action is a lower-tier way to gather a
//!    resource while the parent already owns a higher-tier tool for it
//!
//! and then, for each item the action produces:
//!
//! 2. goal overshoot: a goal item would exceed its required quantity
//! 3. goal reached: a goal item reaches exactly its required quantity; the
//!    candidate is kept and the search purges queued nodes holding none of it
//! 4. catalyst saturation: a non-goal catalyst is already held
//! 5. usage cap: a non-goal item is already held at or above its cap
//! 6. leaf rejection: a non-goal item is a terminal product
//! 7. material cap: a raw material is no longer needed
//!
//! The first rule that matches decides. Rules 1 and 5 to 7 come from a
//! [`PruningConfig`]; rules 2 to 4 need only the catalog and the goal.
//!
//! ```
//! use craftplan::{Domain, PruningConfig, PruningHeuristic, Candidate, Verdict};
//!
//! let problem = Domain::from_json(r#"{
//!     "Items": ["wood", "plank"],
//!     "Initial": {"wood": 2},
//!     "Goal": {"plank": 4},
//!     "Recipes": {
//!         "make plank": {"Produces": {"plank": 4}, "Consumes": {"wood": 1}, "Time": 1}
//!     }
//! }"#).unwrap().problem().unwrap();
//!
//! let rules = PruningConfig::default().resolve(&problem.catalog).unwrap();
//! let make_plank = problem.catalog.action_id("make plank").unwrap();
//! let action = problem.catalog.action(make_plank);
//!
//! let once = action.apply(&problem.initial).unwrap();
//! let candidate = Candidate::new(make_plank, action, &problem.initial, &once);
//! assert!(matches!(rules.evaluate(&candidate, &problem.goal), Verdict::GoalItemReached(_)));
//!
//! // A second batch of planks would overshoot the goal
//! let twice = action.apply(&once).unwrap();
//! let candidate = Candidate::new(make_plank, action, &once, &twice);
//! assert_eq!(rules.evaluate(&candidate, &problem.goal), Verdict::Prune);
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::{Action, ActionId, Catalog, Goal, ItemId, PlanError, Result, State};

/// A successor awaiting a pruning decision.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub action_id: ActionId,
    pub action: &'a Action,
    /// State of the node being expanded
    pub parent: &'a State,
    /// State after applying `action` to `parent`
    pub state: &'a State,
}

impl<'a> Candidate<'a> {
    pub fn new(action_id: ActionId, action: &'a Action, parent: &'a State, state: &'a State) -> Self {
        Self {
            action_id,
            action,
            parent,
            state,
        }
    }
}

/// Outcome of evaluating a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Keep the candidate.
    Admit,
    /// Drop the candidate and evict any queued copy of its state.
    Prune,
    /// Keep the candidate; a goal item just reached its required quantity.
    /// Queued nodes holding none of that item are purged.
    GoalItemReached(ItemId),
}

impl Verdict {
    /// The heuristic score: 0 for kept candidates, +infinity for pruned ones.
    pub fn score(self) -> f64 {
        match self {
            Verdict::Prune => f64::INFINITY,
            Verdict::Admit | Verdict::GoalItemReached(_) => 0.0,
        }
    }

    pub fn is_pruned(self) -> bool {
        self == Verdict::Prune
    }
}

/// A filter deciding which successors may enter the frontier.
pub trait PruningHeuristic: Send + Sync {
    fn evaluate(&self, candidate: &Candidate<'_>, goal: &Goal) -> Verdict;
}

/// Keeps every candidate; the search degenerates to uniform-cost search.
pub struct NoPruning;

impl PruningHeuristic for NoPruning {
    fn evaluate(&self, _candidate: &Candidate<'_>, _goal: &Goal) -> Verdict {
        Verdict::Admit
    }
}

/// Domain-specific pruning tables, written with item and action names.
///
/// # Examples
///
/// ```
/// use craftplan::PruningConfig;
///
/// let config = PruningConfig::from_json(r#"{
///     "tool_tiers": [{
///         "resource": "wood",
///         "rungs": [
///             {"action": "punch for wood"},
///             {"action": "wooden_axe for wood", "tool": "wooden_axe"}
///         ]
///     }],
///     "usage_caps": {"plank": 4},
///     "leaf_items": ["rail"],
///     "material_caps": [{
///         "item": "cobble",
///         "retire_once_owned": ["furnace", "stone_pickaxe"],
///         "equipment_limit": {"equipment": "furnace", "max": 3}
///     }]
/// }"#).unwrap();
///
/// assert_eq!(config.tool_tiers[0].rungs.len(), 2);
/// assert_eq!(config.usage_caps["plank"], 4);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PruningConfig {
    pub tool_tiers: Vec<ToolTier>,
    pub usage_caps: BTreeMap<String, u32>,
    pub leaf_items: Vec<String>,
    pub material_caps: Vec<MaterialCap>,
}

/// Ways of gathering one resource, from lowest to highest tier.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolTier {
    pub resource: String,
    pub rungs: Vec<TierRung>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TierRung {
    pub action: String,
    /// Equipment whose ownership puts this rung within reach
    #[serde(default)]
    pub tool: Option<String>,
}

/// Stops gathering a raw material once it is no longer useful.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialCap {
    pub item: String,
    /// Once every one of these is held, the material is never gathered again
    #[serde(default)]
    pub retire_once_owned: Vec<String>,
    #[serde(default)]
    pub equipment_limit: Option<EquipmentLimit>,
}

/// While `equipment` is held, keep at most `max` of the capped material.
#[derive(Debug, Clone, Deserialize)]
pub struct EquipmentLimit {
    pub equipment: String,
    pub max: u32,
}

impl PruningConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Resolves every name against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::UnknownPruningItem` or
    /// `PlanError::UnknownPruningAction` for names the catalog does not know.
    pub fn resolve(&self, catalog: &Catalog) -> Result<CraftingRules> {
        let item = |name: &str| {
            catalog
                .item(name)
                .ok_or_else(|| PlanError::UnknownPruningItem(name.to_string()))
        };
        let items = catalog.vocabulary().len();

        let mut ladders = Vec::with_capacity(self.tool_tiers.len());
        let mut tiers = vec![None; catalog.len()];
        for tier in &self.tool_tiers {
            item(&tier.resource)?;
            let ladder = ladders.len();
            let mut tools = Vec::with_capacity(tier.rungs.len());
            for (rung, step) in tier.rungs.iter().enumerate() {
                let action = catalog
                    .action_id(&step.action)
                    .ok_or_else(|| PlanError::UnknownPruningAction(step.action.clone()))?;
                let slot = &mut tiers[action.index()];
                if slot.is_none() {
                    *slot = Some(TierPosition { ladder, rung });
                }
                tools.push(step.tool.as_deref().map(item).transpose()?);
            }
            ladders.push(tools);
        }

        let mut usage_caps = vec![None; items];
        for (name, &cap) in &self.usage_caps {
            usage_caps[item(name)?.index()] = Some(cap);
        }

        let mut leaves = vec![false; items];
        for name in &self.leaf_items {
            leaves[item(name)?.index()] = true;
        }

        let material_caps = self
            .material_caps
            .iter()
            .map(|cap| -> Result<ResolvedMaterialCap> {
                Ok(ResolvedMaterialCap {
                    item: item(&cap.item)?,
                    retire_once_owned: cap
                        .retire_once_owned
                        .iter()
                        .map(|name| item(name))
                        .collect::<Result<_>>()?,
                    equipment_limit: cap
                        .equipment_limit
                        .as_ref()
                        .map(|limit| Ok::<_, PlanError>((item(&limit.equipment)?, limit.max)))
                        .transpose()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let catalysts = (0..items)
            .map(|index| catalog.is_catalyst(ItemId(index)))
            .collect();

        Ok(CraftingRules {
            tiers,
            ladders,
            catalysts,
            usage_caps,
            leaves,
            material_caps,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct TierPosition {
    ladder: usize,
    rung: usize,
}

#[derive(Debug, Clone)]
struct ResolvedMaterialCap {
    item: ItemId,
    retire_once_owned: Vec<ItemId>,
    equipment_limit: Option<(ItemId, u32)>,
}

/// The rule-based pruner, resolved against one catalog.
#[derive(Debug, Clone)]
pub struct CraftingRules {
    /// Ladder position per action
    tiers: Vec<Option<TierPosition>>,
    /// Tool per rung, per ladder
    ladders: Vec<Vec<Option<ItemId>>>,
    catalysts: Vec<bool>,
    usage_caps: Vec<Option<u32>>,
    leaves: Vec<bool>,
    material_caps: Vec<ResolvedMaterialCap>,
}

impl CraftingRules {
    /// Rules that need no configuration: goal overshoot, goal reached and
    /// catalyst saturation.
    pub fn generic(catalog: &Catalog) -> Self {
        let items = catalog.vocabulary().len();
        Self {
            tiers: vec![None; catalog.len()],
            ladders: Vec::new(),
            catalysts: (0..items)
                .map(|index| catalog.is_catalyst(ItemId(index)))
                .collect(),
            usage_caps: vec![None; items],
            leaves: vec![false; items],
            material_caps: Vec::new(),
        }
    }

    fn outranked(&self, action: ActionId, parent: &State) -> bool {
        let Some(position) = self.tiers.get(action.index()).copied().flatten() else {
            return false;
        };
        self.ladders[position.ladder][position.rung + 1..]
            .iter()
            .flatten()
            .any(|&tool| parent.holds(tool))
    }

    fn saturated(&self, item: ItemId, parent: &State) -> bool {
        let index = item.index();
        if self.catalysts.get(index).copied().unwrap_or(false) && parent.holds(item) {
            return true;
        }
        if let Some(Some(cap)) = self.usage_caps.get(index) {
            if parent.get(item) >= *cap {
                return true;
            }
        }
        if self.leaves.get(index).copied().unwrap_or(false) {
            return true;
        }
        self.material_caps
            .iter()
            .filter(|cap| cap.item == item)
            .any(|cap| {
                let retired = !cap.retire_once_owned.is_empty()
                    && cap.retire_once_owned.iter().all(|&owned| parent.holds(owned));
                let limited = cap
                    .equipment_limit
                    .map_or(false, |(equipment, max)| {
                        parent.holds(equipment) && parent.get(item) >= max
                    });
                retired || limited
            })
    }
}

impl PruningHeuristic for CraftingRules {
    fn evaluate(&self, candidate: &Candidate<'_>, goal: &Goal) -> Verdict {
        if self.outranked(candidate.action_id, candidate.parent) {
            return Verdict::Prune;
        }

        for &(item, _) in candidate.action.produced_items() {
            match goal.required(item) {
                Some(required) => {
                    let quantity = candidate.state.get(item);
                    if quantity > required {
                        return Verdict::Prune;
                    }
                    if quantity == required && candidate.parent.get(item) < required {
                        return Verdict::GoalItemReached(item);
                    }
                }
                None => {
                    if self.saturated(item, candidate.parent) {
                        return Verdict::Prune;
                    }
                }
            }
        }

        Verdict::Admit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Domain;

    const DOMAIN: &str = r#"{
        "Items": ["bench", "cart", "cobble", "furnace", "plank", "stone_pickaxe",
                  "wood", "wooden_axe", "wooden_pickaxe"],
        "Initial": {},
        "Goal": {"cart": 1},
        "Recipes": {
            "punch for wood": {"Produces": {"wood": 1}, "Time": 4},
            "wooden_axe for wood": {"Produces": {"wood": 1}, "Requires": {"wooden_axe": true}, "Time": 2},
            "craft plank": {"Produces": {"plank": 4}, "Consumes": {"wood": 1}, "Time": 1},
            "craft bench": {"Produces": {"bench": 1}, "Consumes": {"plank": 4}, "Time": 1},
            "wooden_pickaxe for cobble": {"Produces": {"cobble": 1}, "Requires": {"wooden_pickaxe": true}, "Time": 4},
            "craft furnace at bench": {"Produces": {"furnace": 1}, "Requires": {"bench": true}, "Consumes": {"cobble": 8}, "Time": 1},
            "craft cart at bench": {"Produces": {"cart": 1}, "Requires": {"bench": true}, "Consumes": {"plank": 5}, "Time": 1}
        }
    }"#;

    const RULES: &str = r#"{
        "tool_tiers": [{
            "resource": "wood",
            "rungs": [
                {"action": "punch for wood"},
                {"action": "wooden_axe for wood", "tool": "wooden_axe"}
            ]
        }],
        "usage_caps": {"plank": 8},
        "leaf_items": ["cart"],
        "material_caps": [{
            "item": "cobble",
            "retire_once_owned": ["furnace", "stone_pickaxe"],
            "equipment_limit": {"equipment": "furnace", "max": 3}
        }]
    }"#;

    fn setup() -> (Catalog, CraftingRules) {
        let catalog = Domain::from_json(DOMAIN).unwrap().catalog().unwrap();
        let rules = PruningConfig::from_json(RULES)
            .unwrap()
            .resolve(&catalog)
            .unwrap();
        (catalog, rules)
    }

    fn verdict(
        catalog: &Catalog,
        rules: &dyn PruningHeuristic,
        action: &str,
        parent: &[(&str, u32)],
        goal: &[(&str, u32)],
    ) -> Verdict {
        let id = catalog.action_id(action).unwrap();
        let action = catalog.action(id);
        let parent = catalog.state_from(parent).unwrap();
        let state = action.apply(&parent).unwrap();
        let goal = Goal::from_names(catalog, goal).unwrap();
        rules.evaluate(&Candidate::new(id, action, &parent, &state), &goal)
    }

    #[test]
    fn test_lower_tier_gathering_is_pruned_once_a_better_tool_is_owned() {
        let (catalog, rules) = setup();
        let goal = [("cart", 1)];
        assert_eq!(
            verdict(&catalog, &rules, "punch for wood", &[], &goal),
            Verdict::Admit
        );
        assert_eq!(
            verdict(&catalog, &rules, "punch for wood", &[("wooden_axe", 1)], &goal),
            Verdict::Prune
        );
        assert_eq!(
            verdict(&catalog, &rules, "wooden_axe for wood", &[("wooden_axe", 1)], &goal),
            Verdict::Admit
        );
    }

    #[test]
    fn test_goal_overshoot_is_pruned() {
        let (catalog, rules) = setup();
        let verdict = verdict(&catalog, &rules, "craft plank", &[("wood", 1)], &[("plank", 2)]);
        assert_eq!(verdict, Verdict::Prune);
    }

    #[test]
    fn test_goal_reached_is_reported() {
        let (catalog, rules) = setup();
        let plank = catalog.item("plank").unwrap();
        let verdict = verdict(
            &catalog,
            &rules,
            "craft plank",
            &[("wood", 1), ("plank", 4)],
            &[("plank", 8)],
        );
        assert_eq!(verdict, Verdict::GoalItemReached(plank));
        assert!(!verdict.is_pruned());
        assert_eq!(verdict.score(), 0.0);
    }

    #[test]
    fn test_goal_items_bypass_saturation_rules() {
        let (catalog, rules) = setup();
        // plank is capped at 8, but as a goal item only the goal rules apply
        let verdict = verdict(
            &catalog,
            &rules,
            "craft plank",
            &[("wood", 1), ("plank", 8)],
            &[("plank", 16)],
        );
        assert_eq!(verdict, Verdict::Admit);
    }

    #[test]
    fn test_second_catalyst_is_pruned() {
        let (catalog, rules) = setup();
        let goal = [("cart", 1)];
        assert_eq!(
            verdict(&catalog, &rules, "craft bench", &[("plank", 4)], &goal),
            Verdict::Admit
        );
        let pruned = verdict(&catalog, &rules, "craft bench", &[("plank", 4), ("bench", 1)], &goal);
        assert_eq!(pruned, Verdict::Prune);
        assert!(pruned.is_pruned());
        assert_eq!(pruned.score(), f64::INFINITY);
    }

    #[test]
    fn test_usage_cap() {
        let (catalog, rules) = setup();
        let goal = [("cart", 1)];
        assert_eq!(
            verdict(&catalog, &rules, "craft plank", &[("wood", 1), ("plank", 7)], &goal),
            Verdict::Admit
        );
        assert_eq!(
            verdict(&catalog, &rules, "craft plank", &[("wood", 1), ("plank", 8)], &goal),
            Verdict::Prune
        );
    }

    #[test]
    fn test_leaf_item_only_as_goal() {
        let (catalog, rules) = setup();
        let parent = [("bench", 1), ("plank", 5)];
        assert!(matches!(
            verdict(&catalog, &rules, "craft cart at bench", &parent, &[("cart", 1)]),
            Verdict::GoalItemReached(_)
        ));
        assert_eq!(
            verdict(&catalog, &rules, "craft cart at bench", &parent, &[("furnace", 1)]),
            Verdict::Prune
        );
    }

    #[test]
    fn test_material_cap() {
        let (catalog, rules) = setup();
        let goal = [("cart", 1)];
        let mine = "wooden_pickaxe for cobble";

        let with_furnace = [("wooden_pickaxe", 1), ("furnace", 1), ("cobble", 2)];
        assert_eq!(verdict(&catalog, &rules, mine, &with_furnace, &goal), Verdict::Admit);

        let limited = [("wooden_pickaxe", 1), ("furnace", 1), ("cobble", 3)];
        assert_eq!(verdict(&catalog, &rules, mine, &limited, &goal), Verdict::Prune);

        let retired = [("wooden_pickaxe", 1), ("furnace", 1), ("stone_pickaxe", 1)];
        assert_eq!(verdict(&catalog, &rules, mine, &retired, &goal), Verdict::Prune);

        let no_furnace = [("wooden_pickaxe", 1), ("cobble", 7)];
        assert_eq!(verdict(&catalog, &rules, mine, &no_furnace, &goal), Verdict::Admit);
    }

    #[test]
    fn test_generic_rules_ignore_configured_tables() {
        let catalog = Domain::from_json(DOMAIN).unwrap().catalog().unwrap();
        let rules = CraftingRules::generic(&catalog);
        let goal = [("cart", 1)];
        assert_eq!(
            verdict(&catalog, &rules, "punch for wood", &[("wooden_axe", 1)], &goal),
            Verdict::Admit
        );
        assert_eq!(
            verdict(&catalog, &rules, "craft bench", &[("plank", 4), ("bench", 1)], &goal),
            Verdict::Prune
        );
    }

    #[test]
    fn test_no_pruning_admits_everything() {
        let catalog = Domain::from_json(DOMAIN).unwrap().catalog().unwrap();
        let verdict = verdict(
            &catalog,
            &NoPruning,
            "craft bench",
            &[("plank", 4), ("bench", 1)],
            &[("cart", 1)],
        );
        assert_eq!(verdict, Verdict::Admit);
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        let catalog = Domain::from_json(DOMAIN).unwrap().catalog().unwrap();

        let config = PruningConfig::from_json(r#"{"leaf_items": ["diamond"]}"#).unwrap();
        assert!(matches!(
            config.resolve(&catalog),
            Err(PlanError::UnknownPruningItem(name)) if name == "diamond"
        ));

        let config = PruningConfig::from_json(
            r#"{"tool_tiers": [{"resource": "wood", "rungs": [{"action": "chop"}]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            config.resolve(&catalog),
            Err(PlanError::UnknownPruningAction(name)) if name == "chop"
        ));
    }
}
