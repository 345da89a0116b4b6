//! Output formatting - plaintext and JSON.

use crate::reconcile::{render_plain, UnusedReport};

/// Prints the unused-resource report in plain text format.
pub fn print_plain(report: &UnusedReport) {
    print!("{}", render_plain(report));
}

/// Renders the report as pretty JSON: `{ "total": n, "unused": { category: [names] } }`.
pub fn render_json(report: &UnusedReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Prints the unused-resource report in JSON format.
///
/// Falls back to a flat list of identifiers if serialization fails.
pub fn print_json(report: &UnusedReport) {
    match render_json(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::warn!(error = %e, "JSON serialization failed, using fallback output");
            let ids: Vec<String> = report.iter().map(|id| id.to_string()).collect();
            println!("{{\"total\": {}, \"unused\": {:?}}}", report.total(), ids);
        }
    }
}
