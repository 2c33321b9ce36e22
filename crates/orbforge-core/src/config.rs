//! Configuration loading and typed config structures for Orbforge.
//!
//! The canonical configuration lives in `orbforge-config.yaml` at the project
//! root. It carries the recipe table and the golden egg drop weights, both
//! read once at startup. Every section is optional; missing sections fall
//! back to the reference tables.

use std::collections::BTreeMap;
use std::path::Path;

use orbforge_types::{DropOutcome, Tier};
use serde::Deserialize;

use crate::drops::DropTable;
use crate::error::{DropError, RecipeError};
use crate::recipe::RecipeGraph;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The recipe table is malformed.
    #[error("invalid recipe table: {source}")]
    Recipes {
        /// The underlying recipe error.
        #[from]
        source: RecipeError,
    },

    /// The drop table is malformed.
    #[error("invalid drop table: {source}")]
    Drops {
        /// The underlying drop error.
        #[from]
        source: DropError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level calculator configuration.
///
/// Mirrors the structure of `orbforge-config.yaml`. All fields default to
/// the reference recipe table and the golden egg weights.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CalculatorConfig {
    /// Recipe table: output tier to `{component tier: quantity}`.
    #[serde(default = "default_recipes")]
    pub recipes: BTreeMap<u32, BTreeMap<u32, u64>>,

    /// Golden egg drop weights.
    #[serde(default)]
    pub drops: DropsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Simulation settings.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl CalculatorConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Build the recipe graph, requiring the tiered ordering.
    pub fn recipe_graph(&self) -> Result<RecipeGraph, ConfigError> {
        let graph = RecipeGraph::new(self.recipes.iter().map(|(output, components)| {
            (
                Tier::new(*output),
                components
                    .iter()
                    .map(|(component, qty)| (Tier::new(*component), *qty))
                    .collect(),
            )
        }))?;
        graph.check_tiered()?;
        Ok(graph)
    }

    /// Build the drop table and check its tiers against `graph`.
    pub fn drop_table(&self, graph: &RecipeGraph) -> Result<DropTable, ConfigError> {
        let table = DropTable::new(
            self.drops
                .items
                .iter()
                .map(|(tier, weight)| (DropOutcome::Item(Tier::new(*tier)), *weight))
                .chain(core::iter::once((DropOutcome::Waste, self.drops.waste))),
        )?;
        table.check_against(graph)?;
        Ok(table)
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            recipes: default_recipes(),
            drops: DropsConfig::default(),
            logging: LoggingConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

/// Golden egg drop weights.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DropsConfig {
    /// Relative weight per orb tier.
    #[serde(default = "default_drop_items")]
    pub items: BTreeMap<u32, u32>,

    /// Relative weight of the waste outcome (immortal stone).
    #[serde(default = "default_drop_waste")]
    pub waste: u32,
}

impl Default for DropsConfig {
    fn default() -> Self {
        Self {
            items: default_drop_items(),
            waste: default_drop_waste(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Simulation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Fixed seed for egg openings. Unset means a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_recipes() -> BTreeMap<u32, BTreeMap<u32, u64>> {
    RecipeGraph::reference()
        .recipes()
        .map(|recipe| {
            (
                recipe.output().get(),
                recipe.components().map(|(c, qty)| (c.get(), qty)).collect(),
            )
        })
        .collect()
}

fn default_drop_items() -> BTreeMap<u32, u32> {
    DropTable::golden_egg()
        .entries()
        .iter()
        .filter_map(|e| e.outcome.tier().map(|tier| (tier.get(), e.weight)))
        .collect()
}

fn default_drop_waste() -> u32 {
    DropTable::golden_egg()
        .entries()
        .iter()
        .find(|e| e.outcome == DropOutcome::Waste)
        .map_or(0, |e| e.weight)
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_reference_tables() {
        let config = CalculatorConfig::default();
        let graph = config.recipe_graph();
        assert_eq!(graph.as_ref().ok(), Some(&RecipeGraph::reference()));
        let table = graph.and_then(|g| config.drop_table(&g));
        assert_eq!(table.ok(), Some(DropTable::golden_egg()));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.simulation.seed, None);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
recipes:
  2: {1: 3}
  3: {1: 1, 2: 2}

drops:
  items:
    1: 80
    2: 20
  waste: 0

logging:
  level: debug

simulation:
  seed: 123
";
        let config = CalculatorConfig::parse(yaml).unwrap();

        assert_eq!(config.recipes.len(), 2);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.simulation.seed, Some(123));

        let graph = config.recipe_graph().unwrap();
        assert_eq!(graph.base_equivalent(Tier::new(3)), Ok(7));
        let table = config.drop_table(&graph).unwrap();
        assert_eq!(table.total_weight(), 100);
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "simulation:\n  seed: 7\n";
        let config = CalculatorConfig::parse(yaml).unwrap();

        // Seed is overridden
        assert_eq!(config.simulation.seed, Some(7));
        // Everything else uses defaults
        assert_eq!(config.recipes.len(), 11);
        assert_eq!(config.drops.waste, 1000);
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(CalculatorConfig::parse("").ok(), Some(CalculatorConfig::default()));
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let result = CalculatorConfig::parse("recipes: [1, 2");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn non_tiered_recipes_are_rejected() {
        let yaml = "recipes:\n  2: {3: 1}\n  3: {1: 2}\n";
        let config = CalculatorConfig::parse(yaml).unwrap();
        assert!(matches!(
            config.recipe_graph(),
            Err(ConfigError::Recipes {
                source: RecipeError::NotTiered { .. }
            })
        ));
    }

    #[test]
    fn drop_tier_outside_graph_is_rejected() {
        let yaml = "drops:\n  items:\n    13: 5\n";
        let config = CalculatorConfig::parse(yaml).unwrap();
        let graph = RecipeGraph::reference();
        assert!(matches!(
            config.drop_table(&graph),
            Err(ConfigError::Drops { .. })
        ));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("orbforge-config.yaml");
        let config = CalculatorConfig::from_file(&path).unwrap();
        let graph = config.recipe_graph().unwrap();
        assert_eq!(graph, RecipeGraph::reference());
        assert_eq!(config.drop_table(&graph).unwrap(), DropTable::golden_egg());
    }
}
