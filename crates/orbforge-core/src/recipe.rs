//! Recipe graph for orb crafting.
//!
//! Maps each craftable tier to the component tiers (and quantities) needed
//! to craft one unit of it. The graph is built once at startup and only read
//! afterwards. The base tier never has a recipe.
//!
//! The resolver works on any acyclic graph; the tiered ordering (every
//! component strictly below its output) is checked separately by
//! [`RecipeGraph::check_tiered`], which the config loader applies.

use std::collections::BTreeMap;

use orbforge_types::Tier;

use crate::error::RecipeError;

// ---------------------------------------------------------------------------
// Recipe
// ---------------------------------------------------------------------------

/// The components needed to craft one unit of a tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    output: Tier,
    components: BTreeMap<Tier, u64>,
}

impl Recipe {
    /// The tier this recipe produces.
    pub const fn output(&self) -> Tier {
        self.output
    }

    /// Iterate over `(component, quantity per unit)` in ascending tier order.
    pub fn components(&self) -> impl Iterator<Item = (Tier, u64)> + '_ {
        self.components.iter().map(|(tier, qty)| (*tier, *qty))
    }

    /// Quantity of `component` needed per unit (zero if not used).
    pub fn quantity(&self, component: Tier) -> u64 {
        self.components.get(&component).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Reference table
// ---------------------------------------------------------------------------

/// The twelve-tier orb table: `(output, [(component, quantity)])`.
const REFERENCE_TABLE: &[(u32, &[(u32, u64)])] = &[
    (2, &[(1, 4)]),
    (3, &[(1, 2), (2, 2)]),
    (4, &[(1, 1), (2, 1), (3, 2)]),
    (5, &[(3, 1), (4, 2)]),
    (6, &[(3, 1), (5, 2)]),
    (7, &[(4, 1), (5, 1), (6, 1)]),
    (8, &[(5, 1), (6, 1), (7, 1)]),
    (9, &[(6, 1), (7, 1), (8, 1)]),
    (10, &[(7, 1), (8, 1), (9, 1)]),
    (11, &[(8, 1), (9, 1), (10, 1)]),
    (12, &[(9, 1), (10, 1), (11, 1)]),
];

// ---------------------------------------------------------------------------
// RecipeGraph
// ---------------------------------------------------------------------------

/// Immutable lookup from tier to recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeGraph {
    recipes: BTreeMap<Tier, Recipe>,
}

impl RecipeGraph {
    /// Build a graph from `(output, components)` pairs.
    ///
    /// Rejects recipes for the base tier, recipes with no components, zero
    /// quantities, and components that are neither the base tier nor
    /// craftable. Cycles are not detected.
    pub fn new(
        recipes: impl IntoIterator<Item = (Tier, BTreeMap<Tier, u64>)>,
    ) -> Result<Self, RecipeError> {
        let mut table = BTreeMap::new();
        for (output, components) in recipes {
            if output.is_base() {
                return Err(RecipeError::BaseTierHasRecipe(output));
            }
            if components.is_empty() {
                return Err(RecipeError::EmptyRecipe(output));
            }
            if let Some((component, _)) = components.iter().find(|(_, qty)| **qty == 0) {
                return Err(RecipeError::ZeroQuantity {
                    tier: output,
                    component: *component,
                });
            }
            table.insert(output, Recipe { output, components });
        }

        let graph = Self { recipes: table };
        for recipe in graph.recipes.values() {
            if let Some(component) = recipe.components.keys().find(|c| !graph.contains(**c)) {
                return Err(RecipeError::DanglingComponent {
                    tier: recipe.output,
                    component: *component,
                });
            }
        }
        Ok(graph)
    }

    /// Build a graph from a literal `(output, [(component, quantity)])` table.
    pub fn from_table(table: &[(u32, &[(u32, u64)])]) -> Result<Self, RecipeError> {
        Self::new(table.iter().map(|(output, components)| {
            (
                Tier::new(*output),
                components
                    .iter()
                    .map(|(component, qty)| (Tier::new(*component), *qty))
                    .collect(),
            )
        }))
    }

    /// The twelve-tier orb recipe table.
    pub fn reference() -> Self {
        let recipes = REFERENCE_TABLE
            .iter()
            .map(|(output, components)| {
                let output = Tier::new(*output);
                let components = components
                    .iter()
                    .map(|(component, qty)| (Tier::new(*component), *qty))
                    .collect();
                (output, Recipe { output, components })
            })
            .collect();
        Self { recipes }
    }

    /// Look up the recipe for `tier`.
    ///
    /// Returns `None` for the base tier and for any tier without a recipe:
    /// such tiers can only be acquired, never crafted.
    pub fn recipe_for(&self, tier: Tier) -> Option<&Recipe> {
        self.recipes.get(&tier)
    }

    /// Whether `tier` is the base tier or has a recipe.
    pub fn contains(&self, tier: Tier) -> bool {
        tier.is_base() || self.recipes.contains_key(&tier)
    }

    /// The highest known tier (the base tier for an empty graph).
    pub fn max_tier(&self) -> Tier {
        self.recipes.keys().next_back().copied().unwrap_or(Tier::BASE)
    }

    /// Iterate over all craftable recipes in ascending tier order.
    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> + '_ {
        self.recipes.values()
    }

    /// Check that every component is strictly below the tier it crafts.
    ///
    /// A graph that passes is acyclic by construction.
    pub fn check_tiered(&self) -> Result<(), RecipeError> {
        for recipe in self.recipes.values() {
            if let Some(component) = recipe.components.keys().find(|c| **c >= recipe.output) {
                return Err(RecipeError::NotTiered {
                    tier: recipe.output,
                    component: *component,
                });
            }
        }
        Ok(())
    }

    /// Base-tier units implied by fully expanding one unit of `tier`.
    ///
    /// The base tier is worth 1. In the reference table a 2* is worth 4 and
    /// a 3* is worth 10.
    pub fn base_equivalent(&self, tier: Tier) -> Result<u64, RecipeError> {
        if tier.is_base() {
            return Ok(1);
        }
        let recipe = self.recipe_for(tier).ok_or(RecipeError::UnknownTier(tier))?;

        let mut total: u64 = 0;
        for (component, qty) in recipe.components() {
            let per_component = self
                .base_equivalent(component)?
                .checked_mul(qty)
                .ok_or_else(|| overflow(tier))?;
            total = total.checked_add(per_component).ok_or_else(|| overflow(tier))?;
        }
        Ok(total)
    }

    /// Human-readable description of how `tier` is obtained.
    pub fn describe(&self, tier: Tier) -> String {
        if tier.is_base() {
            return format!("Orb {tier} is a base item\nDrops from golden eggs");
        }
        let Some(recipe) = self.recipe_for(tier) else {
            return format!("No recipe found for orb {tier}");
        };
        let lines: Vec<String> = recipe
            .components()
            .map(|(component, qty)| format!("{qty} x {component}"))
            .collect();
        format!("Orb {tier} is crafted from:\n{}", lines.join("\n"))
    }
}

impl Default for RecipeGraph {
    fn default() -> Self {
        Self::reference()
    }
}

fn overflow(tier: Tier) -> RecipeError {
    RecipeError::ArithmeticOverflow {
        context: format!("base equivalent of {tier}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn t(rank: u32) -> Tier {
        Tier::new(rank)
    }

    #[test]
    fn reference_table_passes_validation() {
        let rebuilt = RecipeGraph::from_table(REFERENCE_TABLE);
        assert_eq!(rebuilt, Ok(RecipeGraph::reference()));
        assert!(RecipeGraph::reference().check_tiered().is_ok());
    }

    #[test]
    fn reference_table_covers_tiers_two_to_twelve() {
        let graph = RecipeGraph::reference();
        assert_eq!(graph.recipes().count(), 11);
        assert_eq!(graph.max_tier(), t(12));
        for rank in 2..=12 {
            assert!(graph.recipe_for(t(rank)).is_some(), "missing recipe for {rank}");
        }
    }

    #[test]
    fn tier_three_recipe_correct() {
        let graph = RecipeGraph::reference();
        let recipe = graph.recipe_for(t(3));
        assert_eq!(recipe.map(Recipe::output), Some(t(3)));
        assert_eq!(recipe.map(|r| r.quantity(t(1))), Some(2));
        assert_eq!(recipe.map(|r| r.quantity(t(2))), Some(2));
        assert_eq!(recipe.map(|r| r.quantity(t(4))), Some(0));
    }

    #[test]
    fn base_and_unknown_tiers_have_no_recipe() {
        let graph = RecipeGraph::reference();
        assert!(graph.recipe_for(Tier::BASE).is_none());
        assert!(graph.recipe_for(t(13)).is_none());
        assert!(graph.recipe_for(t(0)).is_none());
        assert!(graph.contains(Tier::BASE));
        assert!(!graph.contains(t(13)));
    }

    #[test]
    fn components_iterate_in_ascending_order() {
        let graph = RecipeGraph::reference();
        let order: Vec<u32> = graph
            .recipe_for(t(4))
            .map(|r| r.components().map(|(c, _)| c.get()).collect())
            .unwrap();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn base_equivalents_of_low_tiers() {
        let graph = RecipeGraph::reference();
        assert_eq!(graph.base_equivalent(t(1)), Ok(1));
        assert_eq!(graph.base_equivalent(t(2)), Ok(4));
        assert_eq!(graph.base_equivalent(t(3)), Ok(10));
        // 1 + 4 + 2 * 10
        assert_eq!(graph.base_equivalent(t(4)), Ok(25));
        assert_eq!(graph.base_equivalent(t(13)), Err(RecipeError::UnknownTier(t(13))));
    }

    #[test]
    fn rejects_recipe_for_base_tier() {
        let result = RecipeGraph::from_table(&[(1, &[(2, 1)])]);
        assert_eq!(result, Err(RecipeError::BaseTierHasRecipe(t(1))));
    }

    #[test]
    fn rejects_empty_recipe() {
        let result = RecipeGraph::from_table(&[(2, &[])]);
        assert_eq!(result, Err(RecipeError::EmptyRecipe(t(2))));
    }

    #[test]
    fn rejects_zero_quantity() {
        let result = RecipeGraph::from_table(&[(2, &[(1, 0)])]);
        assert_eq!(
            result,
            Err(RecipeError::ZeroQuantity {
                tier: t(2),
                component: t(1),
            })
        );
    }

    #[test]
    fn rejects_dangling_component() {
        let result = RecipeGraph::from_table(&[(3, &[(1, 1), (2, 1)])]);
        assert_eq!(
            result,
            Err(RecipeError::DanglingComponent {
                tier: t(3),
                component: t(2),
            })
        );
    }

    #[test]
    fn non_tiered_graph_builds_but_fails_tier_check() {
        // 2 is made from 3, 3 is made from base: acyclic but upside down.
        let graph = RecipeGraph::from_table(&[(2, &[(3, 1)]), (3, &[(1, 5)])]).unwrap();
        assert_eq!(
            graph.check_tiered(),
            Err(RecipeError::NotTiered {
                tier: t(2),
                component: t(3),
            })
        );
        assert_eq!(graph.base_equivalent(t(2)), Ok(5));
    }

    #[test]
    fn base_equivalent_overflow_is_reported() {
        let graph = RecipeGraph::from_table(&[(2, &[(1, u64::MAX)]), (3, &[(2, 2)])]).unwrap();
        assert!(matches!(
            graph.base_equivalent(t(3)),
            Err(RecipeError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn describe_base_craftable_and_unknown() {
        let graph = RecipeGraph::reference();
        assert!(graph.describe(Tier::BASE).contains("base item"));
        assert_eq!(
            graph.describe(t(5)),
            "Orb 5* is crafted from:\n1 x 3*\n2 x 4*"
        );
        assert_eq!(graph.describe(t(40)), "No recipe found for orb 40*");
    }
}
