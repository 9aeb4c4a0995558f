//! # Planner Module
//!
//! The [`Planner`] ties a [`Catalog`] to a search strategy and a
//! [`SearchConfig`]. It is the entry point for callers that just want a plan:
//!
//! 1. Load or build a catalog of actions
//! 2. Pick the pruning rules (none, the generic rules, or a [`PruningConfig`])
//! 3. Ask for a plan from an initial state to a goal
//!
//! ## Basic Usage
//!
//! ```
//! use craftplan::{Domain, Planner, SearchOutcome};
//!
//! let problem = Domain::from_json(r#"{
//!     "Items": ["wood", "plank"],
//!     "Initial": {"wood": 1},
//!     "Goal": {"plank": 8},
//!     "Recipes": {
//!         "make plank": {"Produces": {"plank": 4}, "Consumes": {"wood": 1}, "Time": 1},
//!         "punch for wood": {"Produces": {"wood": 1}, "Time": 4}
//!     }
//! }"#).unwrap().problem().unwrap();
//!
//! let planner = Planner::new(problem.catalog);
//! match planner.plan(&problem.initial, &problem.goal).unwrap() {
//!     SearchOutcome::Found(plan) => {
//!         assert_eq!(plan.len(), 3);
//!         assert_eq!(plan.total_cost(), 6);
//!         for name in plan.action_names(planner.catalog()) {
//!             println!("{}", name);
//!         }
//!     }
//!     SearchOutcome::NotFound(reason) => panic!("no plan: {:?}", reason),
//! }
//! ```

use std::time::Duration;

use crate::search::{BestFirstSearch, SearchAlgorithm};
use crate::{Catalog, Goal, PruningConfig, Result, SearchConfig, SearchOutcome, SearchReport, State};

/// A planner over one catalog of actions.
pub struct Planner {
    catalog: Catalog,
    search_algorithm: Box<dyn SearchAlgorithm>,
    config: SearchConfig,
}

impl Planner {
    /// Creates a planner using best-first search with the generic pruning rules.
    ///
    /// Those rules prune any step that pushes a goal item past its required
    /// quantity. A goal that can only be met by overshooting one item, such
    /// as `{plank: 4, stick: 4}` when sticks are crafted from planks that
    /// come in batches of four, is then never found. Use
    /// [`Planner::with_search_algorithm`] with [`BestFirstSearch::unpruned`]
    /// for such domains.
    pub fn new(catalog: Catalog) -> Self {
        let search_algorithm = Box::new(BestFirstSearch::with_generic_rules(&catalog));
        Self {
            catalog,
            search_algorithm,
            config: SearchConfig::default(),
        }
    }

    /// Creates a planner with the pruning tables in `pruning`.
    ///
    /// # Errors
    ///
    /// Fails if `pruning` names items or actions the catalog does not know.
    pub fn with_pruning(catalog: Catalog, pruning: &PruningConfig) -> Result<Self> {
        let rules = pruning.resolve(&catalog)?;
        Ok(Self::with_search_algorithm(
            catalog,
            Box::new(BestFirstSearch::new(Box::new(rules))),
        ))
    }

    pub fn with_search_algorithm(
        catalog: Catalog,
        search_algorithm: Box<dyn SearchAlgorithm>,
    ) -> Self {
        Self {
            catalog,
            search_algorithm,
            config: SearchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Finds a plan from `initial` to a state satisfying `goal`.
    pub fn plan(&self, initial: &State, goal: &Goal) -> Result<SearchOutcome> {
        Ok(self.plan_with_stats(initial, goal)?.outcome)
    }

    /// Like [`Planner::plan`], also returning the search counters.
    pub fn plan_with_stats(&self, initial: &State, goal: &Goal) -> Result<SearchReport> {
        self.search_algorithm
            .search(&self.catalog, initial, goal, &self.config)
    }
}

/// One-shot planning with the generic pruning rules.
///
/// `time_budget` of `None` searches until the frontier is exhausted. Goals
/// that can only be met by overshooting a goal item are not found under these
/// rules; see [`Planner::new`].
pub fn plan(
    catalog: &Catalog,
    initial: &State,
    goal: &Goal,
    time_budget: Option<Duration>,
) -> Result<SearchOutcome> {
    let config = SearchConfig { time_budget };
    let report = BestFirstSearch::with_generic_rules(catalog).search(catalog, initial, goal, &config)?;
    Ok(report.outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, FailureReason, Vocabulary};

    fn catalog() -> Catalog {
        let vocabulary = Vocabulary::new(["wood", "plank", "bench", "stick"]).unwrap();
        let wood = vocabulary.id("wood").unwrap();
        let plank = vocabulary.id("plank").unwrap();
        let bench = vocabulary.id("bench").unwrap();
        let stick = vocabulary.id("stick").unwrap();
        let actions = vec![
            Action::new("punch for wood", 4).unwrap().produces(wood, 1),
            Action::new("craft plank", 1)
                .unwrap()
                .consumes(wood, 1)
                .produces(plank, 4),
            Action::new("craft bench", 1)
                .unwrap()
                .consumes(plank, 4)
                .produces(bench, 1),
            Action::new("craft stick at bench", 1)
                .unwrap()
                .requires(bench)
                .consumes(plank, 2)
                .produces(stick, 4),
        ];
        Catalog::new(vocabulary, actions).unwrap()
    }

    #[test]
    fn test_simple_plan() {
        let planner = Planner::new(catalog());
        let initial = planner.catalog().state_from(&[]).unwrap();
        let goal = Goal::from_names(planner.catalog(), &[("bench", 1)]).unwrap();

        let plan = planner.plan(&initial, &goal).unwrap().into_plan().unwrap();
        assert_eq!(
            plan.action_names(planner.catalog()),
            ["punch for wood", "craft plank", "craft bench"]
        );
        assert_eq!(plan.total_cost(), 6);
    }

    #[test]
    fn test_catalyst_gates_later_recipe() {
        let planner = Planner::new(catalog());
        let initial = planner.catalog().state_from(&[]).unwrap();
        let goal = Goal::from_names(planner.catalog(), &[("stick", 4)]).unwrap();

        let plan = planner.plan(&initial, &goal).unwrap().into_plan().unwrap();
        let names = plan.action_names(planner.catalog());
        assert_eq!(names.last(), Some(&"craft stick at bench"));
        assert_eq!(names.iter().filter(|&&n| n == "craft bench").count(), 1);
        assert_eq!(plan.total_cost(), 12);
    }

    #[test]
    fn test_no_plan_found() {
        // Without a wood source the bench eats the only planks
        let full = catalog();
        let actions = full
            .actions()
            .iter()
            .filter(|action| action.name != "punch for wood")
            .cloned()
            .collect();
        let catalog = Catalog::new(full.vocabulary().clone(), actions).unwrap();
        let planner = Planner::new(catalog);
        let initial = planner.catalog().state_from(&[("plank", 4)]).unwrap();
        let goal = Goal::from_names(planner.catalog(), &[("stick", 4)]).unwrap();

        let outcome = planner.plan(&initial, &goal).unwrap();
        assert_eq!(outcome, SearchOutcome::NotFound(FailureReason::Exhausted));
    }

    #[test]
    fn test_with_config_applies_budget() {
        let planner = Planner::new(catalog())
            .with_config(SearchConfig::with_time_budget(Duration::ZERO));
        let initial = planner.catalog().state_from(&[]).unwrap();
        let goal = Goal::from_names(planner.catalog(), &[("bench", 1)]).unwrap();

        let outcome = planner.plan(&initial, &goal).unwrap();
        assert_eq!(outcome, SearchOutcome::NotFound(FailureReason::TimedOut));
    }

    #[test]
    fn test_unpruned_search_algorithm() {
        let planner =
            Planner::with_search_algorithm(catalog(), Box::new(BestFirstSearch::unpruned()))
                .with_config(SearchConfig::unbounded());
        let initial = planner.catalog().state_from(&[("wood", 1)]).unwrap();
        let goal = Goal::from_names(planner.catalog(), &[("plank", 2)]).unwrap();

        // The generic rules would reject the 4-plank overshoot; without pruning it is fine
        let plan = planner.plan(&initial, &goal).unwrap().into_plan().unwrap();
        assert_eq!(plan.action_names(planner.catalog()), ["craft plank"]);
    }

    #[test]
    fn test_overshooting_goal_needs_unpruned_search() {
        let vocabulary = Vocabulary::new(["wood", "plank", "stick"]).unwrap();
        let wood = vocabulary.id("wood").unwrap();
        let plank = vocabulary.id("plank").unwrap();
        let stick = vocabulary.id("stick").unwrap();
        let actions = vec![
            Action::new("punch for wood", 4).unwrap().produces(wood, 1),
            Action::new("craft plank", 1)
                .unwrap()
                .consumes(wood, 1)
                .produces(plank, 4),
            Action::new("craft stick", 1)
                .unwrap()
                .consumes(plank, 2)
                .produces(stick, 4),
        ];
        let catalog = Catalog::new(vocabulary, actions).unwrap();
        let planner =
            Planner::with_search_algorithm(catalog, Box::new(BestFirstSearch::unpruned()))
                .with_config(SearchConfig::unbounded());

        let initial = planner.catalog().state_from(&[]).unwrap();
        let goal = Goal::from_names(planner.catalog(), &[("plank", 4), ("stick", 4)]).unwrap();
        let plan = planner.plan(&initial, &goal).unwrap().into_plan().unwrap();

        // Two wood, two plank batches and one stick batch leave 6 planks
        assert_eq!(plan.total_cost(), 11);
        let last = plan.final_state().unwrap();
        assert!(goal.is_satisfied(last));
        assert_eq!(last.get(plank), 6);
    }

    #[test]
    fn test_plan_function() {
        let catalog = catalog();
        let initial = catalog.state_from(&[("wood", 1)]).unwrap();
        let goal = Goal::from_names(&catalog, &[("plank", 4)]).unwrap();

        let outcome = plan(&catalog, &initial, &goal, None).unwrap();
        let plan = outcome.into_plan().unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.total_cost(), 1);
    }
}
