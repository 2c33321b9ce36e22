//! Shared value types for the Orbforge crafting calculator.
//!
//! Everything here is plain data: tiers, inventory snapshots, production
//! plans, and drop outcomes. The logic that operates on them lives in
//! `orbforge-core`.
//!
//! # Modules
//!
//! - [`tier`] -- Tier identifiers and drop outcomes
//! - [`inventory`] -- Per-tier item counts ([`Inventory`])
//! - [`plan`] -- Per-tier craft counts ([`ProductionPlan`])

pub mod inventory;
pub mod plan;
pub mod tier;

// Re-export all public types at crate root for convenience.
pub use inventory::Inventory;
pub use plan::ProductionPlan;
pub use tier::{DropOutcome, Tier};
