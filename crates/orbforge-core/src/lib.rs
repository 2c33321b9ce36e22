//! Crafting plan resolution and golden egg simulation for Orbforge.
//!
//! This crate holds all calculator logic and touches no I/O beyond reading
//! the config file. It sits between `orbforge-types` (plain data) and the
//! `orbforge-cli` binary (argument parsing and rendering).
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `orbforge-config.yaml` ([`CalculatorConfig`])
//! - [`drops`] -- Weighted golden egg simulation ([`DropTable`], [`DropSimulator`])
//! - [`error`] -- Error types ([`RecipeError`], [`PlanError`], [`DropError`])
//! - [`recipe`] -- Recipe lookup and expansion ([`RecipeGraph`])
//! - [`resolver`] -- Inventory-first demand propagation ([`resolve`], [`Resolution`])
//! - [`validate`] -- Boundary checks for user-entered counts

pub mod config;
pub mod drops;
pub mod error;
pub mod recipe;
pub mod resolver;
pub mod validate;

// Re-export primary types at crate root for convenience.
pub use config::{CalculatorConfig, ConfigError};
pub use drops::{DropEntry, DropSimulator, DropTable, DropTally};
pub use error::{DropError, PlanError, RecipeError};
pub use recipe::{Recipe, RecipeGraph};
pub use resolver::{CraftStep, Resolution, direct_base_demand, resolve};
pub use validate::{inventory_from_signed, parse_count, validate_quantity};
