//! Verdict reports: per-attribute CSV rows and the JSON run summary.
//!
//! Output is deterministic: entries arrive in sheet/row order from the
//! writer and are serialized as-is, so two runs over the same inputs
//! produce byte-identical reports.

use std::path::Path;

use serde::Serialize;

use partsync_io::{ReconcileSummary, VerdictEntry};

use crate::CliError;

/// Write one CSV row per compared attribute.
pub fn write_csv_report(entries: &[VerdictEntry], path: &Path) -> Result<(), CliError> {
    let file = std::fs::File::create(path)
        .map_err(|e| CliError::io(format!("cannot create {}: {e}", path.display())))?;

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(std::io::BufWriter::new(file));

    // Always write the header, even with zero entries.
    if entries.is_empty() {
        writer
            .write_record(["sheet", "source_row", "key", "attribute", "verdict", "comment"])
            .map_err(|e| CliError::io(format!("CSV write error: {e}")))?;
    }
    for entry in entries {
        writer
            .serialize(entry)
            .map_err(|e| CliError::io(format!("CSV write error: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| CliError::io(format!("CSV flush error: {e}")))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON run summary
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub meta: RunMeta,
    pub summary: ReconcileSummary,
    pub keys: KeyStats,
}

#[derive(Debug, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Serialize)]
pub struct KeyStats {
    pub unique_keys: usize,
    pub retrieved: usize,
    pub failed: usize,
}

impl RunReport {
    pub fn new(summary: ReconcileSummary, keys: KeyStats) -> Self {
        Self {
            meta: RunMeta {
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            },
            summary,
            keys,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
