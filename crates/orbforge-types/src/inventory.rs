//! Per-tier item counts.
//!
//! An [`Inventory`] is a snapshot of how many orbs of each tier are held.
//! Absent and zero entries mean the same thing, and equality treats them
//! as such. All mutating arithmetic is checked -- no silent overflows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tier::Tier;

/// Mapping from [`Tier`] to a non-negative item count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<Tier, u64>);

impl Inventory {
    /// Create an empty inventory.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build an inventory from `(tier, count)` pairs.
    ///
    /// Later pairs for the same tier replace earlier ones.
    pub fn from_counts(counts: impl IntoIterator<Item = (Tier, u64)>) -> Self {
        Self(counts.into_iter().collect())
    }

    /// Number of items held at `tier` (zero when absent).
    pub fn get(&self, tier: Tier) -> u64 {
        self.0.get(&tier).copied().unwrap_or(0)
    }

    /// Overwrite the count held at `tier`.
    ///
    /// The entry is kept even when `count` is zero, so a drained tier still
    /// shows up when the inventory is listed.
    pub fn set(&mut self, tier: Tier, count: u64) {
        self.0.insert(tier, count);
    }

    /// Add `amount` items of `tier`.
    ///
    /// Returns `None` (leaving the inventory untouched) if the count would
    /// overflow `u64`.
    pub fn add(&mut self, tier: Tier, amount: u64) -> Option<()> {
        let updated = self.get(tier).checked_add(amount)?;
        self.0.insert(tier, updated);
        Some(())
    }

    /// Remove `amount` items of `tier`.
    ///
    /// Returns `None` (leaving the inventory untouched) if fewer than
    /// `amount` are held.
    pub fn remove(&mut self, tier: Tier, amount: u64) -> Option<()> {
        let updated = self.get(tier).checked_sub(amount)?;
        self.0.insert(tier, updated);
        Some(())
    }

    /// Add every count from `other` into this inventory.
    ///
    /// Returns `None` on overflow; in that case the inventory may hold a
    /// partial merge and should be discarded.
    pub fn merge(&mut self, other: &Self) -> Option<()> {
        for (tier, count) in other.iter() {
            self.add(tier, count)?;
        }
        Some(())
    }

    /// Total number of items across all tiers, or `None` on overflow.
    pub fn total(&self) -> Option<u64> {
        let mut total: u64 = 0;
        for qty in self.0.values() {
            total = total.checked_add(*qty)?;
        }
        Some(total)
    }

    /// Iterate over every stored entry in ascending tier order, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, u64)> + '_ {
        self.0.iter().map(|(tier, count)| (*tier, *count))
    }

    /// Iterate over entries with a positive count, in ascending tier order.
    pub fn nonzero(&self) -> impl Iterator<Item = (Tier, u64)> + '_ {
        self.iter().filter(|(_, count)| *count > 0)
    }

    /// Whether no tier holds a positive count.
    pub fn is_empty(&self) -> bool {
        self.nonzero().next().is_none()
    }
}

impl PartialEq for Inventory {
    fn eq(&self, other: &Self) -> bool {
        self.nonzero().eq(other.nonzero())
    }
}

impl Eq for Inventory {}

impl FromIterator<(Tier, u64)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (Tier, u64)>>(iter: I) -> Self {
        Self::from_counts(iter)
    }
}

impl<const N: usize> From<[(u32, u64); N]> for Inventory {
    fn from(counts: [(u32, u64); N]) -> Self {
        counts
            .into_iter()
            .map(|(rank, count)| (Tier::new(rank), count))
            .collect()
    }
}
