// Excel import (xlsx, xls, xlsb, ods) and export (xlsx only).
//
// Import: values-only, one-way conversion into the in-memory model.
// Export: presentation snapshot carrying verdict fills. Not a
//         round-trip format.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Color, Format, Workbook as XlsxWorkbook};

use partsync_core::compare::Verdict;

use crate::document::{Document, Sheet};
use crate::error::IoError;
use crate::writer::AugmentedDocument;

/// Maximum number of cells to import (prevents DoS from huge files)
const MAX_CELLS: usize = 1_000_000;

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Per-sheet import statistics
#[derive(Debug, Default, Clone)]
pub struct SheetStats {
    pub name: String,
    pub cells_imported: usize,
}

#[derive(Debug, Default)]
pub struct ImportStats {
    pub sheets_imported: usize,
    pub cells_imported: usize,
    pub sheet_stats: Vec<SheetStats>,
    pub warnings: Vec<String>,
}

/// Import a workbook as display strings.
pub fn import(path: &Path) -> Result<(Document, ImportStats), IoError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IoError::Open(e.to_string()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(IoError::Open("workbook contains no sheets".into()));
    }

    let mut stats = ImportStats::default();
    let mut sheets = Vec::with_capacity(sheet_names.len());
    let mut total_cells = 0usize;

    for sheet_name in &sheet_names {
        let range = workbook.worksheet_range(sheet_name).map_err(|e| IoError::Read {
            sheet: sheet_name.clone(),
            message: e.to_string(),
        })?;

        let mut sheet = Sheet::new(sheet_name.clone());
        let mut sheet_cells = 0usize;

        // Range may not start at A1; pad out to absolute coordinates so
        // the layout contract's fixed column indices stay valid.
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let (height, width) = range.get_size();
        let abs_rows = start_row as usize + height;
        let abs_cols = start_col as usize + width;
        sheet.rows = vec![vec![String::new(); abs_cols]; abs_rows];

        'rows: for (row_idx, row) in range.rows().enumerate() {
            let target_row = start_row as usize + row_idx;
            for (col_idx, cell) in row.iter().enumerate() {
                let target_col = start_col as usize + col_idx;
                if total_cells >= MAX_CELLS {
                    stats
                        .warnings
                        .push(format!("import stopped at {MAX_CELLS} cells (limit reached)"));
                    break 'rows;
                }
                let text = match cell {
                    Data::Empty => continue,
                    Data::String(s) => s.clone(),
                    Data::Float(n) => {
                        // Format nicely: integers without decimals
                        if n.fract() == 0.0 && n.abs() < 1e15 {
                            format!("{}", *n as i64)
                        } else {
                            format!("{n}")
                        }
                    }
                    Data::Int(n) => format!("{n}"),
                    Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
                    Data::Error(e) => format!("#{e:?}"),
                    Data::DateTime(dt) => format!("{}", dt.as_f64()),
                    Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
                };
                if text.is_empty() {
                    continue;
                }
                sheet.rows[target_row][target_col] = text;
                sheet_cells += 1;
                total_cells += 1;
            }
        }

        stats.sheet_stats.push(SheetStats {
            name: sheet_name.clone(),
            cells_imported: sheet_cells,
        });
        stats.cells_imported += sheet_cells;
        stats.sheets_imported += 1;
        sheets.push(sheet);
    }

    Ok((Document { sheets }, stats))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

// Fixed status fills, one per verdict.
const FILL_MATCH: u32 = 0xC6EFCE;
const FILL_MISMATCH: u32 = 0xFFC7CE;
const FILL_UNRESOLVED: u32 = 0xFFEB9C;

fn verdict_fill(verdict: Verdict) -> Format {
    let rgb = match verdict {
        Verdict::Match => FILL_MATCH,
        Verdict::Mismatch => FILL_MISMATCH,
        Verdict::Unresolved => FILL_UNRESOLVED,
    };
    Format::new().set_background_color(Color::RGB(rgb))
}

#[derive(Debug, Default)]
pub struct ExportStats {
    pub sheets_exported: usize,
    pub cells_exported: usize,
}

/// Export the augmented workbook to a file.
pub fn export(doc: &AugmentedDocument, path: &Path) -> Result<ExportStats, IoError> {
    let (mut workbook, stats) = build_workbook(doc)?;
    workbook.save(path).map_err(|e| IoError::Write(e.to_string()))?;
    Ok(stats)
}

/// Export the augmented workbook as an in-memory binary payload, for
/// hosts that respond with the document directly.
pub fn export_to_bytes(doc: &AugmentedDocument) -> Result<Vec<u8>, IoError> {
    let (mut workbook, _) = build_workbook(doc)?;
    workbook.save_to_buffer().map_err(|e| IoError::Write(e.to_string()))
}

fn build_workbook(doc: &AugmentedDocument) -> Result<(XlsxWorkbook, ExportStats), IoError> {
    let mut workbook = XlsxWorkbook::new();
    let mut stats = ExportStats::default();

    for sheet in &doc.sheets {
        let worksheet = workbook
            .add_worksheet()
            .set_name(&sheet.name)
            .map_err(|e| IoError::Write(format!("sheet '{}': {e}", sheet.name)))?;

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            for (col_idx, cell) in row.cells.iter().enumerate() {
                let (row32, col16) = (row_idx as u32, col_idx as u16);
                match cell.fill {
                    Some(verdict) => {
                        worksheet
                            .write_string_with_format(
                                row32,
                                col16,
                                &cell.text,
                                &verdict_fill(verdict),
                            )
                            .map_err(|e| {
                                IoError::Write(format!("cell ({row_idx}, {col_idx}): {e}"))
                            })?;
                        stats.cells_exported += 1;
                    }
                    None if !cell.text.is_empty() => {
                        worksheet
                            .write_string(row32, col16, &cell.text)
                            .map_err(|e| {
                                IoError::Write(format!("cell ({row_idx}, {col_idx}): {e}"))
                            })?;
                        stats.cells_exported += 1;
                    }
                    None => {}
                }
            }
        }
        stats.sheets_exported += 1;
    }

    Ok((workbook, stats))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
