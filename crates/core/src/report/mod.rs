//! Rendering of finished runs.
//!
//! Two columns are shown, `Vehicle ID` and `Total Penalty`, preceded by a
//! row index.

use std::time::Duration;

use serde_json::{json, Value};

use crate::fetcher::DetailOutcome;
use crate::orchestrator::RunReport;

const ID_HEADER: &str = "Vehicle ID";
const PENALTY_HEADER: &str = "Total Penalty";

/// Render outcomes as a left-aligned text table.
pub fn render_table(outcomes: &[DetailOutcome]) -> String {
    let rows: Vec<(String, String, String)> = outcomes
        .iter()
        .enumerate()
        .map(|(i, o)| (i.to_string(), o.driver_id.to_string(), o.penalty_value()))
        .collect();

    let index_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0);
    let id_width = rows
        .iter()
        .map(|r| r.1.chars().count())
        .chain(std::iter::once(ID_HEADER.len()))
        .max()
        .unwrap_or(ID_HEADER.len());
    let penalty_width = rows
        .iter()
        .map(|r| r.2.chars().count())
        .chain(std::iter::once(PENALTY_HEADER.len()))
        .max()
        .unwrap_or(PENALTY_HEADER.len());

    let mut out = String::new();
    out.push_str(&format!(
        "{:<iw$}  {:<idw$}  {:<pw$}",
        "",
        ID_HEADER,
        PENALTY_HEADER,
        iw = index_width,
        idw = id_width,
        pw = penalty_width
    ));
    out.push('\n');
    out.push_str(&format!(
        "{:<iw$}  {}  {}",
        "",
        "-".repeat(id_width),
        "-".repeat(penalty_width),
        iw = index_width
    ));
    out.push('\n');

    if rows.is_empty() {
        out.push_str("(no rows)\n");
        return out;
    }

    for (index, id, penalty) in rows {
        out.push_str(&format!(
            "{:>iw$}  {:<idw$}  {}",
            index,
            id,
            penalty,
            iw = index_width,
            idw = id_width
        ));
        out.push('\n');
    }
    out
}

/// Render a whole report, including the table rows, as JSON.
pub fn render_json(report: &RunReport) -> Value {
    let rows: Vec<Value> = report
        .outcomes
        .iter()
        .map(|o| {
            json!({
                "vehicle_id": o.driver_id,
                "total_penalty": o.penalty_value(),
                "kind": o.penalty.class(),
            })
        })
        .collect();

    json!({
        "started_at": report.started_at.to_rfc3339(),
        "discovered": report.discovered,
        "total_batches": report.total_batches,
        "batches_completed": report.batches_completed,
        "aborted": report.aborted(),
        "abort_reason": report.abort.as_ref().map(|r| r.to_string()),
        "list_error": report.list_error,
        "summary": report.summary(),
        "elapsed_secs": report.elapsed.as_secs_f64(),
        "rows": rows,
    })
}

/// Human-readable elapsed time line.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("Total Execution Time: {:.2} seconds", elapsed.as_secs_f64())
}
