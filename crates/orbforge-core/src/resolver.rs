//! Production plan resolution.
//!
//! Given an inventory, a recipe graph, and a target `(tier, count)`, works
//! out how many base-tier orbs are missing, how many units of each tier must
//! be crafted, and what is left over afterwards.
//!
//! Demand is propagated depth-first with an inventory-first policy:
//!
//! 1. Zero demand is a no-op.
//! 2. Base-tier demand is taken from inventory; anything not covered adds to
//!    a single shortage total for the whole resolution.
//! 3. If enough of a craftable tier is already held, it is taken from
//!    inventory and nothing is crafted, even though a recipe exists.
//! 4. Otherwise the held units are used up, and the remainder (`need`) is
//!    crafted: each component receives `quantity * need` demand, one full
//!    subtree at a time, so stock consumed by an earlier sibling is gone for
//!    a later one. `need` is then added to the plan for that tier.
//!
//! The caller's inventory is never touched; resolution works on a copy.

use orbforge_types::{Inventory, ProductionPlan, Tier};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::PlanError;
use crate::recipe::RecipeGraph;

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// The outcome of resolving a target against an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Base-tier orbs that inventory could not cover.
    pub shortage: u64,
    /// Units of each tier that must be crafted.
    pub plan: ProductionPlan,
    /// Inventory left after every consumption. Never negative.
    pub remaining: Inventory,
}

/// One numbered crafting step, derived from a [`ProductionPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CraftStep {
    /// One-based position in the step list.
    pub number: usize,
    /// The tier being crafted.
    pub tier: Tier,
    /// How many units to craft.
    pub units: u64,
    /// Total quantity consumed per component (`quantity per unit * units`).
    pub components: Vec<(Tier, u64)>,
}

impl Resolution {
    /// Whether the plan can be carried out without acquiring more base orbs.
    ///
    /// The plan is always fully computed; an incomplete plan is returned as
    /// is, and it is up to the caller how to present it.
    pub const fn is_complete(&self) -> bool {
        self.shortage == 0
    }

    /// The plan as numbered crafting steps, lowest tier first.
    pub fn steps(&self, graph: &RecipeGraph) -> Result<Vec<CraftStep>, PlanError> {
        let mut steps = Vec::with_capacity(self.plan.len());
        for (tier, units) in self.plan.iter() {
            let recipe = graph
                .recipe_for(tier)
                .ok_or(PlanError::Uncraftable { tier, missing: units })?;
            let components = recipe
                .components()
                .map(|(component, qty)| {
                    qty.checked_mul(units)
                        .map(|used| (component, used))
                        .ok_or_else(|| overflow(format!("components consumed by {tier}")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let number = steps.len().saturating_add(1);
            steps.push(CraftStep {
                number,
                tier,
                units,
                components,
            });
        }
        Ok(steps)
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Working state threaded through the recursive expansion.
struct Resolver<'g> {
    graph: &'g RecipeGraph,
    inventory: Inventory,
    plan: ProductionPlan,
    shortage: u64,
}

impl Resolver<'_> {
    fn satisfy(&mut self, level: Tier, count: u64) -> Result<(), PlanError> {
        if count == 0 {
            return Ok(());
        }

        if self.inventory.remove(level, count).is_some() {
            return Ok(());
        }

        let held = self.inventory.get(level);
        let need = count.saturating_sub(held);

        if level.is_base() {
            self.shortage = self
                .shortage
                .checked_add(need)
                .ok_or_else(|| overflow(String::from("base-tier shortage")))?;
            self.inventory.set(level, 0);
            return Ok(());
        }

        let graph = self.graph;
        let recipe = graph
            .recipe_for(level)
            .ok_or(PlanError::Uncraftable { tier: level, missing: need })?;
        self.inventory.set(level, 0);

        for (component, qty_per_unit) in recipe.components() {
            let demand = qty_per_unit
                .checked_mul(need)
                .ok_or_else(|| overflow(format!("demand for {component} from {level}")))?;
            self.satisfy(component, demand)?;
        }

        self.plan
            .add(level, need)
            .ok_or_else(|| overflow(format!("plan entry for {level}")))?;
        debug!(tier = %level, need, held, "crafting");
        Ok(())
    }
}

/// Resolve `target_count` units of `target_tier` against `inventory`.
///
/// Returns the base-tier shortage, the accumulated production plan, and the
/// leftover inventory. Resolving zero units returns no shortage, an empty
/// plan, and the inventory unchanged.
///
/// `inventory` is only read. The recipe graph must be acyclic; a cyclic
/// graph recurses without bound.
///
/// # Errors
///
/// Returns [`PlanError::InvalidTarget`] if `target_tier` is neither the base
/// tier nor craftable in `graph`, and [`PlanError::ArithmeticOverflow`] if a
/// count overflows `u64` while demand is propagated.
pub fn resolve(
    inventory: &Inventory,
    graph: &RecipeGraph,
    target_tier: Tier,
    target_count: u64,
) -> Result<Resolution, PlanError> {
    if !graph.contains(target_tier) {
        return Err(PlanError::InvalidTarget(target_tier));
    }

    let mut resolver = Resolver {
        graph,
        inventory: inventory.clone(),
        plan: ProductionPlan::new(),
        shortage: 0,
    };
    resolver.satisfy(target_tier, target_count)?;

    let resolution = Resolution {
        shortage: resolver.shortage,
        plan: resolver.plan,
        remaining: resolver.inventory,
    };

    if resolution.is_complete() {
        info!(
            target = %target_tier,
            count = target_count,
            crafted_tiers = resolution.plan.len(),
            "Plan resolved"
        );
    } else {
        warn!(
            target = %target_tier,
            count = target_count,
            shortage = resolution.shortage,
            "Plan resolved with a base-tier shortage"
        );
    }
    Ok(resolution)
}

/// Base-tier units the plan demands directly from recipes.
///
/// For every crafted tier this sums `quantity of base per unit * units`.
/// After [`resolve`], this equals the shortage plus the base orbs taken from
/// inventory, plus the target count itself when the target is the base tier.
pub fn direct_base_demand(plan: &ProductionPlan, graph: &RecipeGraph) -> Result<u64, PlanError> {
    let mut total: u64 = 0;
    for (tier, units) in plan.iter() {
        let recipe = graph
            .recipe_for(tier)
            .ok_or(PlanError::Uncraftable { tier, missing: units })?;
        let demand = recipe
            .quantity(Tier::BASE)
            .checked_mul(units)
            .ok_or_else(|| overflow(format!("base demand of {tier}")))?;
        total = total
            .checked_add(demand)
            .ok_or_else(|| overflow(String::from("total base demand")))?;
    }
    Ok(total)
}

const fn overflow(context: String) -> PlanError {
    PlanError::ArithmeticOverflow { context }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn t(rank: u32) -> Tier {
        Tier::new(rank)
    }

    fn small_graph() -> RecipeGraph {
        RecipeGraph::from_table(&[(2, &[(1, 4)]), (3, &[(1, 2), (2, 2)])]).unwrap()
    }

    fn resolved(inv: &Inventory, graph: &RecipeGraph, tier: u32, count: u64) -> Resolution {
        resolve(inv, graph, t(tier), count).unwrap()
    }

    #[test]
    fn zero_demand_is_a_no_op() {
        let inv = Inventory::from([(1, 3), (2, 1)]);
        let res = resolved(&inv, &small_graph(), 3, 0);
        assert_eq!(res.shortage, 0);
        assert!(res.plan.is_empty());
        assert_eq!(res.remaining, inv);
    }

    #[test]
    fn empty_inventory_shortage_is_full_expansion() {
        let inv = Inventory::from([(1, 0), (2, 0), (3, 0)]);
        let res = resolved(&inv, &small_graph(), 3, 1);
        assert_eq!(res.shortage, 10);
        assert_eq!(res.plan, ProductionPlan::from([(2, 2), (3, 1)]));
        assert_eq!(res.remaining, Inventory::from([(1, 0), (2, 0), (3, 0)]));
        assert!(!res.is_complete());
    }

    #[test]
    fn base_stock_covers_full_expansion() {
        let inv = Inventory::from([(1, 10), (2, 0), (3, 0)]);
        let res = resolved(&inv, &small_graph(), 3, 1);
        assert_eq!(res.shortage, 0);
        assert_eq!(res.plan, ProductionPlan::from([(2, 2), (3, 1)]));
        assert!(res.remaining.is_empty());
        assert!(res.is_complete());
    }

    #[test]
    fn held_component_is_used_before_crafting() {
        let inv = Inventory::from([(1, 0), (2, 3), (3, 0)]);
        let res = resolved(&inv, &small_graph(), 3, 1);
        // Tier 3 still needs 2 base orbs, and none are held.
        assert_eq!(res.shortage, 2);
        assert_eq!(res.plan, ProductionPlan::from([(3, 1)]));
        assert_eq!(res.remaining, Inventory::from([(2, 1)]));
    }

    #[test]
    fn held_target_is_taken_without_crafting() {
        let inv = Inventory::from([(3, 4)]);
        let res = resolved(&inv, &small_graph(), 3, 3);
        assert_eq!(res.shortage, 0);
        assert!(res.plan.is_empty());
        assert_eq!(res.remaining.get(t(3)), 1);
    }

    #[test]
    fn partial_stock_of_target_is_used_up_first() {
        let inv = Inventory::from([(1, 100), (3, 1)]);
        let res = resolved(&inv, &small_graph(), 3, 3);
        assert_eq!(res.plan, ProductionPlan::from([(2, 4), (3, 2)]));
        // 2 crafts of 3* need 4 + 16 base orbs.
        assert_eq!(res.remaining, Inventory::from([(1, 80)]));
    }

    #[test]
    fn earlier_sibling_consumes_shared_stock() {
        // 4* needs 1x1*, 1x2*, 2x3*; each 3* needs 2x1* + 2x2*.
        let graph = RecipeGraph::reference();
        let inv = Inventory::from([(2, 3)]);
        let res = resolved(&inv, &graph, 4, 1);
        // The 2* sibling takes one held 2*; the 3* subtree finds only two
        // left for its four, so crafts two more.
        assert_eq!(res.plan, ProductionPlan::from([(2, 2), (3, 2), (4, 1)]));
        assert_eq!(res.shortage, 1 + 4 + 8);
        assert!(res.remaining.is_empty());
    }

    #[test]
    fn exact_stock_is_drained_and_partial_stock_recorded_as_shortage() {
        let inv = Inventory::from([(1, 6), (2, 1)]);
        let res = resolved(&inv, &small_graph(), 2, 3);
        // One held 2*, two crafted from 8 base orbs with 6 held.
        assert_eq!(res.plan, ProductionPlan::from([(2, 2)]));
        assert_eq!(res.shortage, 2);
        assert_eq!(res.remaining.get(t(1)), 0);
        assert_eq!(res.remaining.get(t(2)), 0);
        assert_eq!(res.remaining.iter().count(), 2);
    }

    #[test]
    fn base_target_only_consumes_inventory() {
        let inv = Inventory::from([(1, 3)]);
        let res = resolved(&inv, &small_graph(), 1, 5);
        assert_eq!(res.shortage, 2);
        assert!(res.plan.is_empty());
        assert_eq!(res.remaining.get(Tier::BASE), 0);
    }

    #[test]
    fn caller_inventory_is_untouched() {
        let inv = Inventory::from([(1, 7), (2, 1)]);
        let before = inv.clone();
        let res = resolved(&inv, &small_graph(), 3, 2);
        assert_eq!(inv, before);
        assert_ne!(res.remaining, before);
    }

    #[test]
    fn unknown_target_is_rejected() {
        let inv = Inventory::new();
        assert_eq!(
            resolve(&inv, &small_graph(), t(4), 1),
            Err(PlanError::InvalidTarget(t(4)))
        );
        assert_eq!(
            resolve(&inv, &small_graph(), t(0), 0),
            Err(PlanError::InvalidTarget(t(0)))
        );
    }

    #[test]
    fn overflowing_demand_is_reported() {
        let inv = Inventory::new();
        let res = resolve(&inv, &small_graph(), t(3), u64::MAX);
        assert!(matches!(res, Err(PlanError::ArithmeticOverflow { .. })));
    }

    #[test]
    fn steps_list_total_component_use() {
        let inv = Inventory::new();
        let graph = small_graph();
        let res = resolved(&inv, &graph, 3, 2);
        let steps = res.steps(&graph).unwrap();
        assert_eq!(
            steps,
            vec![
                CraftStep {
                    number: 1,
                    tier: t(2),
                    units: 4,
                    components: vec![(t(1), 16)],
                },
                CraftStep {
                    number: 2,
                    tier: t(3),
                    units: 2,
                    components: vec![(t(1), 4), (t(2), 4)],
                },
            ]
        );
    }

    #[test]
    fn direct_base_demand_matches_consumption() {
        let graph = RecipeGraph::reference();
        let inv = Inventory::from([(1, 30), (2, 2), (5, 1)]);
        let res = resolved(&inv, &graph, 7, 2);
        let consumed = 30 - res.remaining.get(Tier::BASE);
        assert_eq!(
            direct_base_demand(&res.plan, &graph),
            Ok(res.shortage + consumed)
        );
    }
}
