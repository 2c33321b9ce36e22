//! Tier identifiers and drop outcomes.
//!
//! A [`Tier`] is the integer rank of an orb. Tier 1 is the base tier: it has
//! no recipe and is only ever acquired (for example from golden eggs).

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// The integer rank of a craftable or acquirable item.
///
/// Tiers are totally ordered. Displayed as `N*`, the notation players use
/// for orb levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tier(u32);

impl Tier {
    /// The base tier. Never crafted, only acquired.
    pub const BASE: Self = Self(1);

    /// Create a tier from its numeric rank.
    pub const fn new(rank: u32) -> Self {
        Self(rank)
    }

    /// Return the numeric rank.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this is the base tier.
    pub const fn is_base(self) -> bool {
        self.0 == Self::BASE.0
    }
}

impl Default for Tier {
    fn default() -> Self {
        Self::BASE
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*", self.0)
    }
}

impl FromStr for Tier {
    type Err = core::num::ParseIntError;

    /// Parse `"7"` or `"7*"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('*').unwrap_or(trimmed);
        digits.parse().map(Self)
    }
}

/// The result of opening one golden egg.
///
/// Either an orb of some tier, or the waste outcome (an immortal stone,
/// which plays no part in crafting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropOutcome {
    /// An orb of the given tier.
    Item(Tier),
    /// A drop that is not an orb.
    Waste,
}

impl DropOutcome {
    /// The tier of the dropped orb, or `None` for waste.
    pub const fn tier(self) -> Option<Tier> {
        match self {
            Self::Item(tier) => Some(tier),
            Self::Waste => None,
        }
    }
}
