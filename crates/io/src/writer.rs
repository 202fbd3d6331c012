//! The reconciliation writer.
//!
//! Walks each sheet's data region, and for every candidate row emits
//! two synthetic rows directly beneath it: a web-data row carrying the
//! retrieved record mapped into the source column layout, and a
//! comparison row carrying one verdict comment per compared attribute.
//!
//! The augmented sequence is built into a fresh row list, merged by
//! target position. Original rows are copied through untouched, so
//! indices never shift during the pass and no reverse-order iteration
//! is needed. The candidate set is computed once per sheet before any
//! synthesis; re-running the writer over an already-augmented document
//! inserts additional rows rather than detecting earlier output.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use partsync_core::compare::{
    compare_dimensions, compare_identifier, compare_text, compare_weight, FieldComparison,
    Verdict,
};
use partsync_core::config::ReconcileConfig;
use partsync_core::model::{ProductKey, ProductRecord, RetrievalOutcome};
use partsync_core::normalize::{classify_material, parse_dimensions};

use crate::document::{Document, Sheet};
use crate::layout::{col, FIRST_DATA_ROW, ROW_WIDTH};

// ---------------------------------------------------------------------------
// Output model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Source,
    WebData,
    Comparison,
}

#[derive(Debug, Clone, Default)]
pub struct AugmentedCell {
    pub text: String,
    /// Fill style keyed by verdict; set on comparison cells only.
    pub fill: Option<Verdict>,
}

#[derive(Debug, Clone)]
pub struct AugmentedRow {
    pub kind: RowKind,
    pub cells: Vec<AugmentedCell>,
}

#[derive(Debug, Clone)]
pub struct AugmentedSheet {
    pub name: String,
    pub rows: Vec<AugmentedRow>,
}

#[derive(Debug, Clone)]
pub struct AugmentedDocument {
    pub sheets: Vec<AugmentedSheet>,
}

impl AugmentedDocument {
    /// Strip fills and row kinds back to a plain document.
    pub fn to_document(&self) -> Document {
        Document {
            sheets: self
                .sheets
                .iter()
                .map(|s| Sheet {
                    name: s.name.clone(),
                    rows: s
                        .rows
                        .iter()
                        .map(|r| r.cells.iter().map(|c| c.text.clone()).collect())
                        .collect(),
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Run output
// ---------------------------------------------------------------------------

/// One compared attribute of one candidate row, for reports.
#[derive(Debug, Clone, Serialize)]
pub struct VerdictEntry {
    pub sheet: String,
    /// Row index of the candidate in the input document, zero-based.
    pub source_row: usize,
    pub key: String,
    pub attribute: &'static str,
    pub verdict: Verdict,
    pub comment: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileSummary {
    pub sheets: usize,
    pub candidate_rows: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub unresolved: usize,
}

pub struct ReconcileResult {
    pub document: AugmentedDocument,
    pub summary: ReconcileSummary,
    pub entries: Vec<VerdictEntry>,
}

// ---------------------------------------------------------------------------
// Key extraction
// ---------------------------------------------------------------------------

/// Eligible keys from the key column of every sheet's data region.
/// Non-matching values are skipped, never an error.
pub fn extract_keys(doc: &Document) -> Vec<ProductKey> {
    let mut keys = Vec::new();
    for sheet in &doc.sheets {
        for row in FIRST_DATA_ROW..sheet.rows.len() {
            if let Some(key) = ProductKey::parse(sheet.cell(row, col::KEY)) {
                keys.push(key);
            }
        }
    }
    keys
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Build the augmented document from the source document and the
/// per-key retrieval outcomes.
pub fn reconcile(
    doc: &Document,
    outcomes: &BTreeMap<ProductKey, RetrievalOutcome>,
    config: &ReconcileConfig,
) -> ReconcileResult {
    let mut summary = ReconcileSummary::default();
    let mut entries = Vec::new();

    let sheets = doc
        .sheets
        .iter()
        .map(|sheet| reconcile_sheet(sheet, outcomes, config, &mut summary, &mut entries))
        .collect();
    summary.sheets = doc.sheets.len();

    ReconcileResult {
        document: AugmentedDocument { sheets },
        summary,
        entries,
    }
}

fn reconcile_sheet(
    sheet: &Sheet,
    outcomes: &BTreeMap<ProductKey, RetrievalOutcome>,
    config: &ReconcileConfig,
    summary: &mut ReconcileSummary,
    entries: &mut Vec<VerdictEntry>,
) -> AugmentedSheet {
    // Candidate set is frozen before any synthesis.
    let candidates: BTreeSet<usize> = (FIRST_DATA_ROW..sheet.rows.len())
        .filter(|&row| is_candidate(sheet, row))
        .collect();

    let mut rows = Vec::with_capacity(sheet.rows.len() + 2 * candidates.len());

    for (row_idx, source) in sheet.rows.iter().enumerate() {
        rows.push(passthrough_row(source));

        if !candidates.contains(&row_idx) {
            continue;
        }
        summary.candidate_rows += 1;

        // Absent or ineligible key, or a failed fetch, resolves to the
        // empty placeholder record; every comparison below then reports
        // the web side as missing.
        let key = ProductKey::parse(sheet.cell(row_idx, col::KEY));
        let record = key
            .as_ref()
            .and_then(|k| outcomes.get(k))
            .and_then(|o| o.record())
            .cloned()
            .unwrap_or_default();

        rows.push(web_data_row(&record));
        rows.push(comparison_row(
            sheet, row_idx, &key, &record, config, summary, entries,
        ));
    }

    AugmentedSheet { name: sheet.name.clone(), rows }
}

/// A row is a candidate when either marker column (key, title) is
/// non-blank.
fn is_candidate(sheet: &Sheet, row: usize) -> bool {
    !sheet.cell(row, col::KEY).trim().is_empty() || !sheet.cell(row, col::TITLE).trim().is_empty()
}

fn passthrough_row(cells: &[String]) -> AugmentedRow {
    AugmentedRow {
        kind: RowKind::Source,
        cells: cells
            .iter()
            .map(|text| AugmentedCell { text: text.clone(), fill: None })
            .collect(),
    }
}

fn blank_row(kind: RowKind) -> AugmentedRow {
    AugmentedRow {
        kind,
        cells: vec![AugmentedCell::default(); ROW_WIDTH],
    }
}

fn web_data_row(record: &ProductRecord) -> AugmentedRow {
    let mut row = blank_row(RowKind::WebData);
    let dims = parse_dimensions(&record.dimensions_raw).triple;
    let dim_text = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_default();

    row.cells[col::KEY].text = record.key.clone();
    row.cells[col::ALT_ID].text = record.alt_id.clone();
    row.cells[col::TITLE].text = record.title.clone();
    row.cells[col::WEIGHT].text = record.weight_raw.clone();
    row.cells[col::LENGTH].text = dim_text(dims.length_mm);
    row.cells[col::WIDTH].text = dim_text(dims.width_mm);
    row.cells[col::HEIGHT].text = dim_text(dims.height_mm);
    row.cells[col::MATERIAL].text = record.material_raw.clone();
    row.cells[col::NOTE].text = classify_material(&record.material_class_raw).to_string();
    row.cells[col::SOURCE_URL].text = record.url.clone();
    row
}

fn comparison_row(
    sheet: &Sheet,
    row_idx: usize,
    key: &Option<ProductKey>,
    record: &ProductRecord,
    config: &ReconcileConfig,
    summary: &mut ReconcileSummary,
    entries: &mut Vec<VerdictEntry>,
) -> AugmentedRow {
    let src = |c: usize| sheet.cell(row_idx, c);
    let comparisons: [(usize, &'static str, FieldComparison); 6] = [
        (
            col::ALT_ID,
            "alt_id",
            compare_identifier(src(col::ALT_ID), &record.alt_id),
        ),
        (col::TITLE, "title", compare_text(src(col::TITLE), &record.title)),
        (
            col::WEIGHT,
            "weight",
            compare_weight(src(col::WEIGHT), &record.weight_raw, config.weight_tolerance_pct),
        ),
        (
            col::LENGTH,
            "dimensions",
            compare_dimensions(
                src(col::LENGTH),
                src(col::WIDTH),
                src(col::HEIGHT),
                &record.dimensions_raw,
            ),
        ),
        (
            col::MATERIAL,
            "material",
            compare_text(src(col::MATERIAL), &record.material_raw),
        ),
        (
            col::NOTE,
            "classification",
            compare_text(src(col::NOTE), classify_material(&record.material_class_raw)),
        ),
    ];

    let key_text = key
        .as_ref()
        .map(|k| k.to_string())
        .unwrap_or_else(|| src(col::KEY).trim().to_string());

    let mut row = blank_row(RowKind::Comparison);
    for (column, attribute, comparison) in comparisons {
        match comparison.verdict {
            Verdict::Match => summary.matches += 1,
            Verdict::Mismatch => summary.mismatches += 1,
            Verdict::Unresolved => summary.unresolved += 1,
        }
        entries.push(VerdictEntry {
            sheet: sheet.name.clone(),
            source_row: row_idx,
            key: key_text.clone(),
            attribute,
            verdict: comparison.verdict,
            comment: comparison.comment.clone(),
        });
        row.cells[column] = AugmentedCell {
            text: comparison.comment,
            fill: Some(comparison.verdict),
        };
    }
    row
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
