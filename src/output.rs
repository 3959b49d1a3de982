//! Rendering of a [`RunReport`] for the console.
//!
//! Supports a human-readable summary and pretty-printed JSON.

use anyhow::Result;
use std::fmt::Write;

use crate::analyzers::select::tower_averages;
use crate::pipeline::{PipelineResult, RunReport};

/// Renders the report as plain text: the success count, every tower of the
/// farm, then the best tower.
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(
        out,
        "{} of {} resources succeeded",
        report.resources_succeeded, report.resources_total
    );

    match &report.result {
        PipelineResult::NotFound => {
            let _ = writeln!(out, "No tower found for farm {}", report.farm_id);
        }
        PipelineResult::Found(best) => {
            let _ = writeln!(out, "\nTowers in farm {}:", report.farm_id);
            for (tower_id, average, samples) in tower_averages(&report.towers) {
                let _ = writeln!(
                    out,
                    "  {tower_id}  average RSSI {average:.3} ({samples} samples)"
                );
            }
            let _ = writeln!(out, "\nBest tower:");
            let _ = writeln!(out, "  Tower ID {}", best.tower_id);
            let _ = writeln!(out, "  Average RSSI {:.3}", best.average_signal);
        }
    }

    out
}

/// Renders the report as pretty-printed JSON.
pub fn render_json(report: &RunReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
