//! CSV export of validation outcomes
//!
//! The document opens cleanly in spreadsheet applications: UTF-8 with a byte
//! order mark, CRLF line endings, and RFC 4180 quoting.

use crate::output::stats::RunStatistics;
use crate::output::OutputError;
use crate::state::ValidationOutcome;
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::Path;

const BOM: &str = "\u{feff}";
const LINE_END: &str = "\r\n";
const HEADER: [&str; 6] = ["URL", "Type", "Text", "Status Code", "Category", "Status"];

/// Renders outcomes as a CSV document with a short summary preamble
pub fn to_csv(
    page_url: &str,
    outcomes: &[ValidationOutcome],
    exported_at: DateTime<Utc>,
) -> String {
    let stats = RunStatistics::from_outcomes(outcomes);
    let mut out = String::from(BOM);

    push_row(&mut out, &["Page URL", page_url]);
    push_row(
        &mut out,
        &["Exported At", &exported_at.to_rfc3339_opts(SecondsFormat::Secs, true)],
    );
    push_row(&mut out, &["Total Links", &outcomes.len().to_string()]);
    push_row(&mut out, &["Broken Links", &stats.broken().to_string()]);
    out.push_str(LINE_END);

    push_row(&mut out, &HEADER);
    for outcome in outcomes {
        let status_code = outcome.status.map(|code| code.to_string()).unwrap_or_default();
        push_row(
            &mut out,
            &[
                &outcome.url,
                outcome.kind.as_str(),
                outcome.text.as_deref().unwrap_or(""),
                &status_code,
                outcome.category.as_str(),
                &outcome.description,
            ],
        );
    }

    out
}

/// Writes the CSV document for `outcomes` to `path`
pub fn write_csv(
    path: &Path,
    page_url: &str,
    outcomes: &[ValidationOutcome],
    exported_at: DateTime<Utc>,
) -> Result<(), OutputError> {
    let document = to_csv(page_url, outcomes, exported_at);
    std::fs::write(path, document).map_err(|source| OutputError::Write {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!("Wrote {} outcomes to {}", outcomes.len(), path.display());
    Ok(())
}

fn push_row(out: &mut String, cells: &[&str]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_cell(out, cell);
    }
    out.push_str(LINE_END);
}

fn push_cell(out: &mut String, cell: &str) {
    if cell.contains([',', '"', '\r', '\n']) {
        out.push('"');
        out.push_str(&cell.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(cell);
    }
}
