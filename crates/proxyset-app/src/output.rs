//! Console rendering for batch progress and check results.
//!
//! Human output uses colored level styling and a table for `check`;
//! `--json` callers get the serialized report or outcome instead.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use proxyset_core::{BatchEvent, BatchOutcome, DetectionReport, EventLevel};

/// One console line for a batch event, styled by level.
pub fn event_line(event: &BatchEvent) -> String {
    match event.level {
        EventLevel::Debug => event.message.dimmed().to_string(),
        EventLevel::Info => event.message.normal().to_string(),
        EventLevel::Warning => event.message.yellow().to_string(),
        EventLevel::Error => event.message.red().bold().to_string(),
    }
}

/// Prints a batch event to stdout.
pub fn print_event(event: &BatchEvent) {
    println!("{}", event_line(event));
}

/// Formats a check report as a table of targets.
pub fn detection_table(report: &DetectionReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Target", "Status", "Locations"]);

    for detection in &report.detections {
        let status = if detection.locations.is_empty() {
            "clean"
        } else {
            "found"
        };
        table.add_row(vec![
            detection.target.name().to_string(),
            status.to_string(),
            detection.locations.join("\n"),
        ]);
    }

    table.to_string()
}

/// One-line verdict below the check table.
pub fn summary_line(report: &DetectionReport) -> String {
    let found = report.found_locations().len();
    if found == 0 {
        "No proxy settings were found.".green().to_string()
    } else {
        format!("Proxy settings were detected in {} location(s).", found)
            .yellow()
            .to_string()
    }
}

/// Advisory printed after a successful apply.
pub fn restart_advisory() -> String {
    "You might have to restart your browser or other running applications for the changes to take effect."
        .cyan()
        .to_string()
}

/// Formats a check report as JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn report_json(report: &DetectionReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Formats a batch outcome as JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn outcome_json(outcome: &BatchOutcome) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(outcome)
}
