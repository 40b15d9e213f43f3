// Spreadsheet reading

pub mod csv;
pub mod error;
pub mod table;
pub mod xlsx;

use std::path::Path;

pub use error::ReadError;
pub use table::{CellValue, RawTable};

/// Workbook extensions read through calamine.
pub const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Delimited text extensions.
pub const CSV_EXTENSIONS: &[&str] = &["csv"];

/// Whether `ext` (lowercase, without the dot) names a readable spreadsheet.
pub fn is_supported_extension(ext: &str) -> bool {
    EXCEL_EXTENSIONS.contains(&ext) || CSV_EXTENSIONS.contains(&ext)
}

/// Read the first sheet of a spreadsheet file, dispatching on its extension.
pub fn read_table(path: &Path) -> Result<RawTable, ReadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if CSV_EXTENSIONS.contains(&ext.as_str()) {
        csv::import(path)
    } else if EXCEL_EXTENSIONS.contains(&ext.as_str()) {
        xlsx::import(path)
    } else {
        Err(ReadError::UnsupportedExtension(ext))
    }
}
