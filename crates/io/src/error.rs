use std::fmt;

#[derive(Debug)]
pub enum IoError {
    /// Workbook could not be opened or contains no sheets.
    Open(String),
    /// A sheet's cell range could not be read.
    Read { sheet: String, message: String },
    /// Export failed.
    Write(String),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(msg) => write!(f, "cannot open workbook: {msg}"),
            Self::Read { sheet, message } => {
                write!(f, "cannot read sheet '{sheet}': {message}")
            }
            Self::Write(msg) => write!(f, "cannot write workbook: {msg}"),
        }
    }
}

impl std::error::Error for IoError {}
