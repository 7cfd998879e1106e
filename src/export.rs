//! CSV export of a filtered view.

use crate::filter::FilteredView;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

const COLUMNS: [&str; 10] = [
    "ip",
    "timestamp",
    "method",
    "url",
    "protocol",
    "status",
    "size",
    "referrer",
    "user_agent",
    "bot",
];

/// Write the view as UTF-8 CSV with a header row, one record per line.
/// Timestamps are rendered as RFC 3339; null timestamps and sizes become
/// empty cells.
pub fn write_csv<W: Write>(view: &FilteredView, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(COLUMNS)
        .context("Failed to write CSV header")?;
    for record in view.records() {
        let timestamp = record
            .timestamp
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_default();
        let size = record.size.map(|s| s.to_string()).unwrap_or_default();
        csv.write_record([
            record.ip.as_str(),
            timestamp.as_str(),
            record.method.as_str(),
            record.url.as_str(),
            record.protocol.as_deref().unwrap_or_default(),
            record.status.as_str(),
            size.as_str(),
            record.referrer.as_str(),
            record.user_agent.as_str(),
            record.bot.as_str(),
        ])
        .context("Failed to write CSV record")?;
    }
    csv.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Export the view to a file.
pub fn write_csv_file(view: &FilteredView, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    write_csv(view, file)
}
