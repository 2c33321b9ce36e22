//! Boundary validation for user-entered counts.
//!
//! The core works with unsigned counts. These helpers turn raw text or
//! signed values into those types, rejecting anything negative or
//! non-numeric before any computation starts.

use orbforge_types::{Inventory, Tier};

use crate::error::PlanError;

/// Parse a count typed by the user.
///
/// Blank input counts as zero, matching an empty form field. `field` names
/// the input in the error (for example `"target count"`).
pub fn parse_count(field: &'static str, text: &str) -> Result<u64, PlanError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let Ok(value) = trimmed.parse::<i64>() else {
        return Err(PlanError::InvalidQuantity {
            field,
            value: String::from(trimmed),
            reason: "not an integer",
        });
    };
    validate_quantity(field, value)
}

/// Accept a signed quantity if it is non-negative.
pub fn validate_quantity(field: &'static str, value: i64) -> Result<u64, PlanError> {
    if value < 0 {
        return Err(PlanError::InvalidQuantity {
            field,
            value: value.to_string(),
            reason: "must not be negative",
        });
    }
    Ok(value.unsigned_abs())
}

/// Build an [`Inventory`] from signed per-tier counts.
///
/// Fails on the first negative count; no inventory is produced in that case.
pub fn inventory_from_signed(
    counts: impl IntoIterator<Item = (Tier, i64)>,
) -> Result<Inventory, PlanError> {
    counts
        .into_iter()
        .map(|(tier, count)| {
            if count < 0 {
                Err(PlanError::MalformedInventory { tier, count })
            } else {
                Ok((tier, count.unsigned_abs()))
            }
        })
        .collect()
}
