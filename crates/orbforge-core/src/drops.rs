//! Golden egg drop simulation.
//!
//! A [`DropTable`] lists the possible outcomes of opening one egg with their
//! relative weights. A [`DropSimulator`] draws independent outcomes from that
//! table using a caller-supplied random source, so a seeded generator gives
//! a reproducible sequence.
//!
//! The table also provides a linear estimate of how many eggs cover a given
//! base-tier shortage. It is a point estimate from the expected value per
//! egg, not a guarantee.

use std::collections::BTreeSet;

use orbforge_types::{DropOutcome, Inventory, Tier};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use tracing::debug;

use crate::error::DropError;
use crate::recipe::RecipeGraph;

/// The golden egg table, weights per 10000 openings:
/// 71% 1*, 11% 2*, 8% 3*, 10% immortal stone.
const GOLDEN_EGG_WEIGHTS: &[(DropOutcome, u32)] = &[
    (DropOutcome::Item(Tier::new(1)), 7100),
    (DropOutcome::Item(Tier::new(2)), 1100),
    (DropOutcome::Item(Tier::new(3)), 800),
    (DropOutcome::Waste, 1000),
];

// ---------------------------------------------------------------------------
// DropTable
// ---------------------------------------------------------------------------

/// One outcome and its relative weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DropEntry {
    /// What the opening yields.
    pub outcome: DropOutcome,
    /// Relative weight; weights need not sum to any particular total.
    pub weight: u32,
}

/// Immutable weighted outcome table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTable {
    entries: Vec<DropEntry>,
    total_weight: u64,
}

impl DropTable {
    /// Build a table from `(outcome, weight)` pairs.
    ///
    /// Rejects empty tables, repeated outcomes, and tables in which no item
    /// outcome has a positive weight.
    pub fn new(entries: impl IntoIterator<Item = (DropOutcome, u32)>) -> Result<Self, DropError> {
        let mut seen = BTreeSet::new();
        let mut table = Vec::new();
        let mut total_weight: u64 = 0;
        let mut item_weight: u64 = 0;

        for (outcome, weight) in entries {
            if !seen.insert(outcome) {
                return Err(DropError::DuplicateOutcome(outcome));
            }
            total_weight = total_weight.saturating_add(u64::from(weight));
            if outcome.tier().is_some() {
                item_weight = item_weight.saturating_add(u64::from(weight));
            }
            table.push(DropEntry { outcome, weight });
        }

        if table.is_empty() {
            return Err(DropError::EmptyTable);
        }
        if item_weight == 0 {
            return Err(DropError::NoItemOutcomes);
        }
        Ok(Self {
            entries: table,
            total_weight,
        })
    }

    /// The golden egg table.
    pub fn golden_egg() -> Self {
        let entries: Vec<DropEntry> = GOLDEN_EGG_WEIGHTS
            .iter()
            .map(|(outcome, weight)| DropEntry {
                outcome: *outcome,
                weight: *weight,
            })
            .collect();
        let total_weight = entries.iter().map(|e| u64::from(e.weight)).sum();
        Self {
            entries,
            total_weight,
        }
    }

    /// All entries, in the order they were supplied.
    pub fn entries(&self) -> &[DropEntry] {
        &self.entries
    }

    /// Sum of all weights.
    pub const fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Probability of `outcome` on a single opening.
    pub fn probability(&self, outcome: DropOutcome) -> Decimal {
        let weight = self
            .entries
            .iter()
            .find(|e| e.outcome == outcome)
            .map_or(0, |e| e.weight);
        Decimal::from(weight)
            .checked_div(Decimal::from(self.total_weight))
            .unwrap_or(Decimal::ZERO)
    }

    /// Check that every item outcome is a tier the graph knows.
    pub fn check_against(&self, graph: &RecipeGraph) -> Result<(), DropError> {
        for entry in &self.entries {
            if let Some(tier) = entry.outcome.tier() {
                graph.base_equivalent(tier)?;
            }
        }
        Ok(())
    }

    /// Expected base-tier orbs per opening.
    ///
    /// Each item outcome counts as its full base-tier expansion, so for the
    /// golden egg table this is `0.71 * 1 + 0.11 * 4 + 0.08 * 10 = 1.95`.
    pub fn expected_value_per_opening(&self, graph: &RecipeGraph) -> Result<Decimal, DropError> {
        let mut weighted_sum = Decimal::ZERO;
        for entry in &self.entries {
            let Some(tier) = entry.outcome.tier() else {
                continue;
            };
            let value = Decimal::from(graph.base_equivalent(tier)?);
            weighted_sum = Decimal::from(entry.weight)
                .checked_mul(value)
                .and_then(|v| weighted_sum.checked_add(v))
                .ok_or_else(|| overflow("weighted drop value"))?;
        }
        weighted_sum
            .checked_div(Decimal::from(self.total_weight))
            .ok_or_else(|| overflow("expected value per opening"))
    }

    /// Approximate openings needed to cover `shortage` base-tier orbs.
    ///
    /// `shortage / expected value`, rounded half to even. A linear point
    /// estimate: actual drops vary, and higher-tier drops only help where the
    /// plan can use them.
    pub fn estimate_openings(&self, shortage: u64, graph: &RecipeGraph) -> Result<u64, DropError> {
        if shortage == 0 {
            return Ok(0);
        }
        let per_opening = self.expected_value_per_opening(graph)?;
        if per_opening.is_zero() {
            return Err(DropError::NoItemOutcomes);
        }
        Decimal::from(shortage)
            .checked_div(per_opening)
            .map(|ratio| ratio.round())
            .and_then(|rounded| rounded.to_u64())
            .ok_or_else(|| overflow("estimated openings"))
    }
}

impl Default for DropTable {
    fn default() -> Self {
        Self::golden_egg()
    }
}

fn overflow(context: &str) -> DropError {
    DropError::ArithmeticOverflow {
        context: String::from(context),
    }
}

// ---------------------------------------------------------------------------
// DropTally
// ---------------------------------------------------------------------------

/// Counts produced by a batch of openings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DropTally {
    /// Number of openings simulated.
    pub openings: u64,
    /// Orbs obtained, by tier.
    pub items: Inventory,
    /// Openings that yielded the waste outcome.
    pub waste: u64,
}

impl DropTally {
    /// How many times `outcome` came up.
    pub fn count(&self, outcome: DropOutcome) -> u64 {
        match outcome {
            DropOutcome::Item(tier) => self.items.get(tier),
            DropOutcome::Waste => self.waste,
        }
    }

    /// Whether nothing was simulated.
    pub const fn is_empty(&self) -> bool {
        self.openings == 0
    }
}

// ---------------------------------------------------------------------------
// DropSimulator
// ---------------------------------------------------------------------------

/// Weighted sampler over a [`DropTable`].
#[derive(Debug, Clone)]
pub struct DropSimulator {
    table: DropTable,
    index: WeightedIndex<u32>,
}

impl DropSimulator {
    /// Prepare a sampler for `table`.
    pub fn new(table: DropTable) -> Result<Self, DropError> {
        let index = WeightedIndex::new(table.entries.iter().map(|e| e.weight)).map_err(|e| {
            DropError::InvalidWeights {
                reason: e.to_string(),
            }
        })?;
        Ok(Self { table, index })
    }

    /// Open `openings` eggs, drawing each outcome independently from `rng`.
    ///
    /// Zero openings always yields an empty tally and draws nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DropError::InvalidWeights`] if the sampler yields an index
    /// outside the table, and [`DropError::ArithmeticOverflow`] if a tally
    /// count overflows.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        openings: u64,
        rng: &mut R,
    ) -> Result<DropTally, DropError> {
        let mut tally = DropTally {
            openings,
            ..DropTally::default()
        };

        for _ in 0..openings {
            let drawn = self.index.sample(rng);
            let Some(entry) = self.table.entries.get(drawn) else {
                return Err(DropError::InvalidWeights {
                    reason: format!("sampled index {drawn} is outside the drop table"),
                });
            };
            match entry.outcome {
                DropOutcome::Item(tier) => {
                    tally
                        .items
                        .add(tier, 1)
                        .ok_or_else(|| overflow("orb tally"))?;
                }
                DropOutcome::Waste => {
                    tally.waste = tally
                        .waste
                        .checked_add(1)
                        .ok_or_else(|| overflow("waste tally"))?;
                }
            }
        }

        debug!(
            openings,
            waste = tally.waste,
            orbs = tally.items.total().unwrap_or(0),
            "golden eggs opened"
        );
        Ok(tally)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
