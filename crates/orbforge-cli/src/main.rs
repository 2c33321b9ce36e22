//! Orbforge command-line calculator.
//!
//! Works out how to craft a target orb from what the player already holds,
//! optionally opening golden eggs first.
//!
//! # Startup Sequence
//!
//! 1. Parse the command line
//! 2. Load configuration from `orbforge-config.yaml` (or `--config`)
//! 3. Initialize structured logging (tracing) on stderr
//! 4. Build the recipe graph and drop table
//! 5. Open golden eggs and merge the drops into the inventory
//! 6. Resolve the plan and print the report

mod args;
mod error;
mod render;

use std::path::Path;

use orbforge_core::{CalculatorConfig, DropSimulator, inventory_from_signed, resolve};
use orbforge_types::Tier;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::{Command, PlanArgs};
use crate::error::CliError;
use crate::render::{EggEstimate, Report};

const DEFAULT_CONFIG_PATH: &str = "orbforge-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the arguments, configuration, or inputs are invalid.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    match args::parse(std::env::args().skip(1))? {
        Command::Help => {
            println!("{}", args::USAGE);
            Ok(())
        }
        Command::Describe { config, tier } => {
            let config = load_config(config.as_deref())?;
            init_logging(&config);
            let graph = config.recipe_graph()?;
            println!("{}", graph.describe(tier));
            Ok(())
        }
        Command::Plan(plan) => {
            let config = load_config(plan.config.as_deref())?;
            init_logging(&config);
            let output = run_plan(&config, &plan)?;
            print!("{output}");
            Ok(())
        }
    }
}

fn init_logging(config: &CalculatorConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the calculator configuration.
///
/// An explicit path must exist. Without one, `orbforge-config.yaml` in the
/// working directory is used when present, and the built-in tables otherwise.
fn load_config(path: Option<&Path>) -> Result<CalculatorConfig, CliError> {
    if let Some(path) = path {
        return Ok(CalculatorConfig::from_file(path)?);
    }
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        Ok(CalculatorConfig::from_file(default_path)?)
    } else {
        Ok(CalculatorConfig::default())
    }
}

/// Run one calculation and return the rendered output.
fn run_plan(config: &CalculatorConfig, plan: &PlanArgs) -> Result<String, CliError> {
    let graph = config.recipe_graph()?;
    let table = config.drop_table(&graph)?;
    info!(
        max_tier = %graph.max_tier(),
        recipes = graph.recipes().count(),
        drop_outcomes = table.entries().len(),
        "Configuration loaded"
    );

    if plan.target < Tier::BASE || plan.target > graph.max_tier() {
        return Err(CliError::usage(format!(
            "target tier must be between {} and {}",
            Tier::BASE,
            graph.max_tier()
        )));
    }
    if plan.quantity == 0 {
        return Err(CliError::usage("target count must be positive"));
    }

    let mut inventory = inventory_from_signed(plan.inventory.iter().copied())?;
    if let Some((tier, _)) = inventory.iter().find(|(tier, _)| !graph.contains(*tier)) {
        return Err(CliError::usage(format!("inventory tier {tier} is not a known tier")));
    }

    let drops = if plan.eggs > 0 {
        let simulator = DropSimulator::new(table.clone())?;
        let mut rng = match plan.seed.or(config.simulation.seed) {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let tally = simulator.simulate(plan.eggs, &mut rng)?;
        inventory
            .merge(&tally.items)
            .ok_or_else(|| CliError::usage("inventory count overflow after opening eggs"))?;
        Some(tally)
    } else {
        None
    };

    let resolution = resolve(&inventory, &graph, plan.target, plan.quantity)?;
    let steps = resolution.steps(&graph)?;
    let egg_estimate = if resolution.is_complete() {
        None
    } else {
        Some(EggEstimate {
            eggs: table.estimate_openings(resolution.shortage, &graph)?,
            orbs_per_egg: table.expected_value_per_opening(&graph)?.normalize(),
        })
    };

    let report = Report {
        target: plan.target,
        quantity: plan.quantity,
        drops,
        resolution,
        steps,
        egg_estimate,
    };

    if plan.json {
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        Ok(json)
    } else {
        Ok(render::render(&report))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn plan(target: u32, quantity: u64, inventory: Vec<(Tier, i64)>) -> PlanArgs {
        PlanArgs {
            target: Tier::new(target),
            quantity,
            inventory,
            ..PlanArgs::default()
        }
    }

    #[test]
    fn plan_with_enough_stock_renders_steps() {
        let config = CalculatorConfig::default();
        let output = run_plan(&config, &plan(2, 1, vec![(Tier::new(1), 4)])).unwrap();
        assert_eq!(
            output,
            "1. Craft 1 x 2* from: 4 x 1*\n\nDone: 1 x 2*\n\nLeft over: nothing\n"
        );
    }

    #[test]
    fn shortage_includes_egg_estimate() {
        let config = CalculatorConfig::default();
        let output = run_plan(&config, &plan(3, 1, Vec::new())).unwrap();
        assert!(output.contains("Buy 10 more 1*"), "{output}");
        assert!(output.contains("approximately 5 golden eggs"), "{output}");
        assert!(output.contains("1.95"), "{output}");
    }

    #[test]
    fn seeded_eggs_are_reproducible() {
        let config = CalculatorConfig::default();
        let mut args = plan(5, 1, Vec::new());
        args.eggs = 50;
        args.seed = Some(11);
        let first = run_plan(&config, &args).unwrap();
        let second = run_plan(&config, &args).unwrap();
        assert!(first.starts_with("Opened 50 golden eggs"));
        assert_eq!(first, second);
    }

    #[test]
    fn out_of_range_target_is_rejected() {
        let config = CalculatorConfig::default();
        assert!(matches!(
            run_plan(&config, &plan(13, 1, Vec::new())),
            Err(CliError::Usage { .. })
        ));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let config = CalculatorConfig::default();
        assert!(matches!(
            run_plan(&config, &plan(4, 0, Vec::new())),
            Err(CliError::Usage { .. })
        ));
    }

    #[test]
    fn negative_inventory_is_malformed() {
        let config = CalculatorConfig::default();
        assert!(matches!(
            run_plan(&config, &plan(4, 1, vec![(Tier::new(2), -1)])),
            Err(CliError::Plan {
                source: orbforge_core::PlanError::MalformedInventory { .. }
            })
        ));
    }

    #[test]
    fn json_report_carries_plan() {
        let config = CalculatorConfig::default();
        let mut args = plan(3, 1, vec![(Tier::new(1), 10)]);
        args.json = true;
        let output = run_plan(&config, &args).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["resolution"]["shortage"], 0);
        assert_eq!(value["resolution"]["plan"]["2"], 2);
        assert_eq!(value["resolution"]["plan"]["3"], 1);
    }
}
