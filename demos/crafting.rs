//! Crafting Example
//!
//! Plans a route from an empty inventory to the goal in `crafting.json`,
//! using the pruning tables in `crafting_pruning.json`.
//!
//! ```text
//! RUST_LOG=info cargo run --example crafting
//! RUST_LOG=info cargo run --example crafting -- path/to/domain.json path/to/pruning.json
//! ```

use std::env;
use std::error::Error;
use std::path::PathBuf;

use craftplan::{Domain, Planner, PruningConfig, SearchOutcome};

fn demo_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let domain_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| demo_file("crafting.json"));
    let pruning_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| demo_file("crafting_pruning.json"));

    let problem = Domain::from_path(&domain_path)?.problem()?;
    let pruning = PruningConfig::from_path(&pruning_path)?;
    let planner = Planner::with_pruning(problem.catalog, &pruning)?;
    let vocabulary = planner.catalog().vocabulary();

    println!("Initial inventory: {}", problem.initial.display(vocabulary));
    let report = planner.plan_with_stats(&problem.initial, &problem.goal)?;

    match report.outcome {
        SearchOutcome::Found(plan) => {
            println!("\nPlan found with {} actions:", plan.len());
            for step in plan.steps().iter().skip(1) {
                if let Some(action) = step.action {
                    let name = &planner.catalog().action(action).name;
                    println!("  {:<32} +{:<2} {}", name, step.step_cost, step.state.display(vocabulary));
                }
            }
            println!("\nTotal cost: {}", plan.total_cost());
        }
        SearchOutcome::NotFound(reason) => {
            println!("\nNo plan found: {:?}", reason);
        }
    }

    let stats = report.stats;
    println!(
        "Expanded {} nodes, generated {}, pruned {}, purged {} in {:?}",
        stats.expanded, stats.generated, stats.pruned, stats.purged, stats.elapsed
    );

    Ok(())
}
