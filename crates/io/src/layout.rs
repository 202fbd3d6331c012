//! Fixed column/row layout of a product sheet.
//!
//! This layout is assumed, not auto-detected: the header occupies row
//! 0, data begins at row 1, and the semantic columns sit at fixed
//! positions. The source-URL column is written on web-data rows only.

pub const HEADER_ROW: usize = 0;
pub const FIRST_DATA_ROW: usize = 1;

pub mod col {
    pub const KEY: usize = 0;
    pub const ALT_ID: usize = 1;
    pub const TITLE: usize = 2;
    pub const WEIGHT: usize = 3;
    pub const LENGTH: usize = 4;
    pub const WIDTH: usize = 5;
    pub const HEIGHT: usize = 6;
    pub const MATERIAL: usize = 7;
    pub const NOTE: usize = 8;
    pub const SOURCE_URL: usize = 9;
}

/// Minimum row width the writer emits, so the source-URL column always
/// exists on synthesized rows.
pub const ROW_WIDTH: usize = col::SOURCE_URL + 1;
