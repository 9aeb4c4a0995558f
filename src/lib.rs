mod action;
mod catalog;
mod domain;
mod error;
mod frontier;
mod goal;
mod graph;
mod heuristic;
mod planner;
mod search;
mod state;

pub use action::{Action, ActionId};
pub use catalog::Catalog;
pub use domain::{Domain, Problem, Recipe};
pub use error::{PlanError, Result};
pub use goal::Goal;
pub use graph::{successors, DominanceTable, Successor};
pub use heuristic::{
    Candidate, CraftingRules, EquipmentLimit, MaterialCap, NoPruning, PruningConfig,
    PruningHeuristic, TierRung, ToolTier, Verdict,
};
pub use planner::{plan, Planner};
pub use search::{
    BestFirstSearch, FailureReason, Plan, PlanStep, SearchAlgorithm, SearchConfig, SearchOutcome,
    SearchReport, SearchStats,
};
pub use state::{ItemId, State, StateDisplay, Vocabulary};
