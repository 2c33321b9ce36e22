//! Per-tier craft counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tier::Tier;

/// How many units of each tier must be crafted.
///
/// Contributions for the same tier from different branches of a recipe
/// expansion accumulate. Only positive counts are stored, so an absent tier
/// means "craft none".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductionPlan(BTreeMap<Tier, u64>);

impl ProductionPlan {
    /// Create an empty plan.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record `units` more crafts of `tier`.
    ///
    /// Adding zero is a no-op. Returns `None` (leaving the plan untouched)
    /// on overflow.
    pub fn add(&mut self, tier: Tier, units: u64) -> Option<()> {
        if units == 0 {
            return Some(());
        }
        let entry = self.0.entry(tier).or_insert(0);
        *entry = entry.checked_add(units)?;
        Some(())
    }

    /// Units of `tier` to craft (zero when absent).
    pub fn get(&self, tier: Tier) -> u64 {
        self.0.get(&tier).copied().unwrap_or(0)
    }

    /// Iterate over `(tier, units)` in ascending tier order.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, u64)> + '_ {
        self.0.iter().map(|(tier, units)| (*tier, *units))
    }

    /// Whether nothing needs crafting.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct tiers that need crafting.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<const N: usize> From<[(u32, u64); N]> for ProductionPlan {
    fn from(entries: [(u32, u64); N]) -> Self {
        let mut plan = Self::new();
        for (rank, units) in entries {
            if units > 0 {
                plan.0.insert(Tier::new(rank), units);
            }
        }
        plan
    }
}
