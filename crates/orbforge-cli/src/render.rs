//! Report assembly and text rendering.
//!
//! The core returns plain numbers; this module turns one calculation into a
//! [`Report`] and renders it as the step list players read.

use orbforge_core::{CraftStep, DropTally, Resolution};
use orbforge_types::Tier;
use rust_decimal::Decimal;
use serde::Serialize;

/// Everything produced by one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Tier that was requested.
    pub target: Tier,
    /// How many were requested.
    pub quantity: u64,
    /// Egg openings, when any were requested.
    pub drops: Option<DropTally>,
    /// The resolver output.
    pub resolution: Resolution,
    /// The plan as numbered steps.
    pub steps: Vec<CraftStep>,
    /// Approximate eggs to buy, present only when there is a shortage.
    pub egg_estimate: Option<EggEstimate>,
}

/// Approximate golden eggs needed to cover a shortage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EggEstimate {
    /// Rounded number of eggs.
    pub eggs: u64,
    /// Expected base-tier orbs per egg used for the estimate.
    pub orbs_per_egg: Decimal,
}

/// Render the report as text.
pub fn render(report: &Report) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(tally) = report.drops.as_ref().filter(|t| !t.is_empty()) {
        lines.push(drops_line(tally));
        lines.push(String::new());
    }

    let resolution = &report.resolution;
    if resolution.is_complete() {
        lines.extend(report.steps.iter().map(step_line));
        lines.push(String::new());
        lines.push(format!("Done: {} x {}", report.quantity, report.target));
        lines.push(String::new());
        lines.push(format!("Left over: {}", leftovers(resolution)));
    } else {
        lines.push(String::from("Not enough orbs for the full craft."));
        lines.push(format!("Buy {} more {}", resolution.shortage, Tier::BASE));
        if let Some(estimate) = report.egg_estimate {
            lines.push(format!(
                "Or approximately {} golden eggs (estimate at {} orbs {} per egg)",
                estimate.eggs,
                estimate.orbs_per_egg,
                Tier::BASE
            ));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn step_line(step: &CraftStep) -> String {
    let parts: Vec<String> = step
        .components
        .iter()
        .map(|(component, used)| format!("{used} x {component}"))
        .collect();
    format!(
        "{}. Craft {} x {} from: {}",
        step.number,
        step.units,
        step.tier,
        parts.join(" + ")
    )
}

fn leftovers(resolution: &Resolution) -> String {
    let counts: Vec<String> = resolution
        .remaining
        .nonzero()
        .map(|(tier, count)| format!("{count} x {tier}"))
        .collect();
    if counts.is_empty() {
        String::from("nothing")
    } else {
        counts.join("  ")
    }
}

fn drops_line(tally: &DropTally) -> String {
    let orbs: Vec<String> = tally
        .items
        .nonzero()
        .map(|(tier, count)| format!("{count} x {tier}"))
        .collect();
    let orbs = if orbs.is_empty() {
        String::from("no orbs")
    } else {
        orbs.join("   ")
    };
    format!(
        "Opened {} golden eggs: {orbs}   ({} immortal stones)",
        tally.openings, tally.waste
    )
}
