//! Best-first search over inventory states.
//!
//! The search expands the cheapest queued node, generates its successors
//! (see [`crate::graph`]), filters them through a [`PruningHeuristic`] and
//! queues the survivors that improve on the best known cost of their state.
//! It stops when a goal state is popped, when the frontier runs dry, or when
//! the time budget has elapsed. A goal item that the initial state lacks and
//! no action produces ends the search before anything is expanded.
//!
//! The deadline is soft: it is checked once per expansion, so a single
//! expensive expansion can run past it.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::frontier::Frontier;
use crate::graph::{self, DominanceTable};
use crate::heuristic::{Candidate, CraftingRules, NoPruning, PruningHeuristic, Verdict};
use crate::{ActionId, Catalog, Goal, Result, State};

/// Trait for search strategies a [`crate::Planner`] can drive.
pub trait SearchAlgorithm {
    /// Searches for a plan from `initial` to a state satisfying `goal`.
    ///
    /// # Errors
    ///
    /// Only fails on a malformed catalog. Failing to find a plan is reported
    /// through [`SearchOutcome::NotFound`].
    fn search(
        &self,
        catalog: &Catalog,
        initial: &State,
        goal: &Goal,
        config: &SearchConfig,
    ) -> Result<SearchReport>;
}

/// Search limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Wall-clock budget; `None` searches until the frontier is exhausted
    pub time_budget: Option<Duration>,
}

impl SearchConfig {
    pub fn with_time_budget(time_budget: Duration) -> Self {
        Self {
            time_budget: Some(time_budget),
        }
    }

    pub fn unbounded() -> Self {
        Self { time_budget: None }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::with_time_budget(Duration::from_secs(30))
    }
}

/// Why a search ended without a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Every reachable, unpruned state was expanded
    Exhausted,
    /// The time budget elapsed first
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Plan),
    NotFound(FailureReason),
}

impl SearchOutcome {
    pub fn plan(&self) -> Option<&Plan> {
        match self {
            SearchOutcome::Found(plan) => Some(plan),
            SearchOutcome::NotFound(_) => None,
        }
    }

    pub fn into_plan(self) -> Option<Plan> {
        match self {
            SearchOutcome::Found(plan) => Some(plan),
            SearchOutcome::NotFound(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

/// Counters describing one search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped and expanded
    pub expanded: usize,
    /// Successors that survived the dominance check
    pub generated: usize,
    /// Successors rejected by the pruning heuristic
    pub pruned: usize,
    /// Queued nodes dropped after a goal item was reached
    pub purged: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

/// One entry of a plan: the action taken and the state it led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    /// `None` for the initial state
    pub action: Option<ActionId>,
    pub state: State,
    pub step_cost: u32,
}

/// An ordered sequence of steps from the initial state to a goal state.
///
/// The first step is always the initial state, with no action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    steps: Vec<PlanStep>,
}

impl Plan {
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Number of actions in the plan.
    pub fn len(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of the step costs.
    pub fn total_cost(&self) -> u64 {
        self.steps.iter().map(|step| u64::from(step.step_cost)).sum()
    }

    pub fn actions(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.steps.iter().filter_map(|step| step.action)
    }

    pub fn action_names<'a>(&'a self, catalog: &'a Catalog) -> Vec<&'a str> {
        self.actions()
            .map(|id| catalog.action(id).name.as_str())
            .collect()
    }

    pub fn final_state(&self) -> Option<&State> {
        self.steps.last().map(|step| &step.state)
    }

    /// Re-applies every action to `initial`, checking each precondition, and
    /// returns the resulting state.
    pub fn replay(&self, catalog: &Catalog, initial: &State) -> Result<State> {
        self.actions()
            .try_fold(initial.clone(), |state, id| catalog.action(id).apply(&state))
    }
}

#[derive(Debug, Clone)]
struct SearchNode {
    action: Option<ActionId>,
    state: State,
    step_cost: u32,
    parent: Option<usize>,
    total_cost: u64,
}

/// Owns the node arena and the bookkeeping of a single search run.
struct SearchContext {
    nodes: Vec<SearchNode>,
    frontier: Frontier,
    closed: HashSet<State>,
    dominance: DominanceTable,
    stats: SearchStats,
}

impl SearchContext {
    fn new(initial: &State) -> Self {
        let mut context = Self {
            nodes: Vec::new(),
            frontier: Frontier::new(),
            closed: HashSet::new(),
            dominance: DominanceTable::new(),
            stats: SearchStats::default(),
        };
        context.nodes.push(SearchNode {
            action: None,
            state: initial.clone(),
            step_cost: 0,
            parent: None,
            total_cost: 0,
        });
        context
    }

    fn enqueue(&mut self, node: SearchNode) {
        let idx = self.nodes.len();
        self.frontier.push(idx, &node.state, node.total_cost);
        self.nodes.push(node);
    }

    /// Walks back-pointers from `node_idx` to the root.
    fn reconstruct_path(&self, node_idx: usize) -> Plan {
        let mut steps = Vec::new();
        let mut current = Some(node_idx);

        while let Some(idx) = current {
            let node = &self.nodes[idx];
            steps.push(PlanStep {
                action: node.action,
                state: node.state.clone(),
                step_cost: node.step_cost,
            });
            current = node.parent;
        }

        steps.reverse();
        Plan { steps }
    }

    fn expand(
        &mut self,
        node_idx: usize,
        catalog: &Catalog,
        goal: &Goal,
        heuristic: &dyn PruningHeuristic,
    ) -> Result<()> {
        let parent_state = self.nodes[node_idx].state.clone();
        let parent_cost = self.nodes[node_idx].total_cost;
        let successors = graph::successors(catalog, &parent_state, parent_cost, &self.dominance)?;

        for successor in successors {
            self.stats.generated += 1;
            let action = catalog.action(successor.action);
            let candidate = Candidate::new(successor.action, action, &parent_state, &successor.state);

            let verdict = heuristic.evaluate(&candidate, goal);
            if verdict.is_pruned() {
                self.stats.pruned += 1;
                self.frontier.evict(&successor.state);
                continue;
            }
            if let Verdict::GoalItemReached(item) = verdict {
                let purged = self.frontier.retain(|state| state.holds(item));
                self.stats.purged += purged;
                log::debug!(
                    "{} reached {} of {}; purged {} queued nodes",
                    action.name,
                    successor.state.get(item),
                    catalog.item_name(item),
                    purged
                );
            }

            if self.closed.contains(&successor.state)
                || !self.dominance.record(&successor.state, successor.total_cost)
            {
                continue;
            }

            self.enqueue(SearchNode {
                action: Some(successor.action),
                state: successor.state,
                step_cost: successor.step_cost,
                parent: Some(node_idx),
                total_cost: successor.total_cost,
            });
        }

        Ok(())
    }
}

/// Cost-ordered best-first search filtered by a pruning heuristic.
pub struct BestFirstSearch {
    heuristic: Box<dyn PruningHeuristic>,
}

impl BestFirstSearch {
    pub fn new(heuristic: Box<dyn PruningHeuristic>) -> Self {
        Self { heuristic }
    }

    /// Plain uniform-cost search: nothing is pruned.
    pub fn unpruned() -> Self {
        Self::new(Box::new(NoPruning))
    }

    /// Best-first search with the configuration-free crafting rules.
    pub fn with_generic_rules(catalog: &Catalog) -> Self {
        Self::new(Box::new(CraftingRules::generic(catalog)))
    }
}

impl SearchAlgorithm for BestFirstSearch {
    fn search(
        &self,
        catalog: &Catalog,
        initial: &State,
        goal: &Goal,
        config: &SearchConfig,
    ) -> Result<SearchReport> {
        let started = Instant::now();
        let mut context = SearchContext::new(initial);

        let finish = |outcome: SearchOutcome, mut stats: SearchStats| {
            stats.elapsed = started.elapsed();
            match &outcome {
                SearchOutcome::Found(plan) => log::info!(
                    "Found plan with {} actions at cost {} ({} nodes expanded in {:?})",
                    plan.len(),
                    plan.total_cost(),
                    stats.expanded,
                    stats.elapsed
                ),
                SearchOutcome::NotFound(reason) => log::info!(
                    "No plan found: {:?} ({} nodes expanded in {:?})",
                    reason,
                    stats.expanded,
                    stats.elapsed
                ),
            }
            SearchReport { outcome, stats }
        };

        if goal.is_satisfied(initial) {
            return Ok(finish(
                SearchOutcome::Found(context.reconstruct_path(0)),
                context.stats,
            ));
        }

        let missing = goal.iter().find(|&(item, quantity)| {
            initial.get(item) < quantity && !catalog.is_producible(item)
        });
        if let Some((item, _)) = missing {
            log::debug!("No action produces goal item #{}", item.index());
            return Ok(finish(
                SearchOutcome::NotFound(FailureReason::Exhausted),
                context.stats,
            ));
        }

        log::info!(
            "Searching over {} actions with budget {:?}",
            catalog.len(),
            config.time_budget
        );
        context.frontier.push(0, initial, 0);
        context.dominance.record(initial, 0);

        loop {
            if config
                .time_budget
                .map_or(false, |budget| started.elapsed() >= budget)
            {
                return Ok(finish(
                    SearchOutcome::NotFound(FailureReason::TimedOut),
                    context.stats,
                ));
            }

            let Some(node_idx) = context.frontier.pop() else {
                return Ok(finish(
                    SearchOutcome::NotFound(FailureReason::Exhausted),
                    context.stats,
                ));
            };

            if goal.is_satisfied(&context.nodes[node_idx].state) {
                let plan = context.reconstruct_path(node_idx);
                return Ok(finish(SearchOutcome::Found(plan), context.stats));
            }

            if !context.closed.insert(context.nodes[node_idx].state.clone()) {
                continue;
            }
            context.stats.expanded += 1;
            log::trace!(
                "Expanding {} at cost {} ({} queued)",
                context.nodes[node_idx].state.display(catalog.vocabulary()),
                context.nodes[node_idx].total_cost,
                context.frontier.len()
            );

            context.expand(node_idx, catalog, goal, self.heuristic.as_ref())?;
        }
    }
}
