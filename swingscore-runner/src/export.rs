//! Report export: CSV rows for spreadsheets, JSON for the full report.

use std::path::Path;

use anyhow::{Context, Result};

use crate::screen::{ScreenReport, ScreenRow};

// ─── CSV export ─────────────────────────────────────────────────────

/// One header line plus one line per row; risk columns are empty when absent.
pub fn export_csv(rows: &[ScreenRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("failed to write CSV row for {}", row.ticker))?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── JSON export ────────────────────────────────────────────────────

/// Pretty JSON of the whole report, skipped tickers included.
pub fn export_json(report: &ScreenReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize ScreenReport to JSON")
}

pub fn import_json(json: &str) -> Result<ScreenReport> {
    serde_json::from_str(json).context("failed to deserialize ScreenReport from JSON")
}

// ─── File output ────────────────────────────────────────────────────

/// Write the report to `path` as JSON or CSV, creating parent directories.
pub fn write_report(path: &Path, report: &ScreenReport, json: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let body = if json {
        export_json(report)?
    } else {
        export_csv(&report.rows)?
    };
    std::fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))
}
