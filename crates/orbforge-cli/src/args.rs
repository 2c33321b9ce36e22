//! Command-line parsing.
//!
//! Hand-rolled over `std::env::args`: a handful of flags and up to two
//! positionals. Counts are checked here (non-negative integers); checks that
//! need the recipe graph, such as the tier range, happen in `main`.

use std::path::PathBuf;

use orbforge_core::{PlanError, parse_count};
use orbforge_types::Tier;

use crate::error::CliError;

/// Usage text printed with `--help` and after usage errors.
pub const USAGE: &str = "\
Usage: orbforge [OPTIONS] TARGET [QTY]
       orbforge --describe TIER

Works out how to craft QTY orbs of tier TARGET (default QTY: 1).

Options:
  --inv TIER=COUNT[,TIER=COUNT...]  Orbs already held (repeatable)
  --eggs N                          Golden eggs to open before crafting
  --seed N                          Fixed seed for egg openings
  --config PATH                     Config file (default: orbforge-config.yaml)
  --json                            Print the report as JSON
  --describe TIER                   Show how a tier is obtained
  -h, --help                        Show this help";

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the usage text.
    Help,
    /// Print the recipe description of a tier.
    Describe {
        /// Config file override.
        config: Option<PathBuf>,
        /// The tier to describe.
        tier: Tier,
    },
    /// Resolve a crafting plan.
    Plan(PlanArgs),
}

/// Arguments for a plan request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanArgs {
    /// Config file override.
    pub config: Option<PathBuf>,
    /// Seed override for egg openings.
    pub seed: Option<u64>,
    /// Golden eggs to open.
    pub eggs: u64,
    /// Held orbs as entered, in order.
    pub inventory: Vec<(Tier, i64)>,
    /// Emit JSON instead of text.
    pub json: bool,
    /// Tier to craft.
    pub target: Tier,
    /// How many to craft.
    pub quantity: u64,
}

/// Parse arguments (without the program name).
pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Command, CliError> {
    let mut plan = PlanArgs::default();
    let mut describe: Option<Tier> = None;
    let mut positionals: Vec<String> = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--json" => plan.json = true,
            "--config" => plan.config = Some(PathBuf::from(value_for(&arg, args.next())?)),
            "--seed" => plan.seed = Some(parse_count("seed", &value_for(&arg, args.next())?)?),
            "--eggs" => plan.eggs = parse_count("egg count", &value_for(&arg, args.next())?)?,
            "--inv" => {
                let entries = value_for(&arg, args.next())?;
                plan.inventory.extend(parse_inventory(&entries)?);
            }
            "--describe" => describe = Some(parse_tier(&value_for(&arg, args.next())?)?),
            flag if flag.starts_with("--") => {
                return Err(CliError::usage(format!("unknown option: {flag}")));
            }
            _ => positionals.push(arg),
        }
    }

    if let Some(tier) = describe {
        return Ok(Command::Describe {
            config: plan.config,
            tier,
        });
    }

    let mut positionals = positionals.into_iter();
    let Some(target) = positionals.next() else {
        return Err(CliError::usage("missing TARGET tier"));
    };
    plan.target = parse_tier(&target)?;
    plan.quantity = match positionals.next() {
        Some(qty) => parse_count("target count", &qty)?,
        None => 1,
    };
    if let Some(extra) = positionals.next() {
        return Err(CliError::usage(format!("unexpected argument: {extra}")));
    }
    Ok(Command::Plan(plan))
}

fn value_for(flag: &str, value: Option<String>) -> Result<String, CliError> {
    value.ok_or_else(|| CliError::usage(format!("{flag} needs a value")))
}

fn parse_tier(text: &str) -> Result<Tier, CliError> {
    text.parse()
        .map_err(|e| CliError::usage(format!("invalid tier {text:?}: {e}")))
}

/// Parse `1=10,2=3` into signed `(tier, count)` pairs.
///
/// Signs are kept so that negative counts reach the inventory check and are
/// reported as a malformed inventory rather than a parse failure.
fn parse_inventory(entries: &str) -> Result<Vec<(Tier, i64)>, CliError> {
    entries.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            let Some((tier, count)) = part.split_once('=') else {
                return Err(CliError::usage(format!(
                    "inventory entry {part:?} should look like TIER=COUNT"
                )));
            };
            let tier = parse_tier(tier)?;
            let count = count.trim();
            let count = if count.is_empty() {
                0
            } else {
                count.parse::<i64>().ok().ok_or_else(|| PlanError::InvalidQuantity {
                    field: "inventory count",
                    value: String::from(count),
                    reason: "not an integer",
                })?
            };
            Ok((tier, count))
        })
        .collect()
}
