//! `partsync-io` — workbook I/O and the reconciliation writer.
//!
//! Import is values-only: cells come in as display strings, formulas
//! and styles are not round-tripped. Export is a presentation snapshot
//! carrying the verdict fills.

pub mod document;
pub mod error;
pub mod layout;
pub mod writer;
pub mod xlsx;

pub use document::{Document, Sheet};
pub use error::IoError;
pub use writer::{
    extract_keys, reconcile, AugmentedDocument, ReconcileResult, ReconcileSummary, VerdictEntry,
};

/// MIME type of the augmented workbook payload.
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Fixed output filename for the batch boundary.
pub const OUTPUT_FILENAME: &str = "reconciliation.xlsx";
