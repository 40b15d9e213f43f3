use thiserror::Error;

/// Failure to read one spreadsheet file.
#[derive(Debug, Error)]
pub enum ReadError {
    /// File could not be opened or is not a valid workbook.
    #[error("cannot open file: {0}")]
    Open(String),
    /// Workbook has no worksheets.
    #[error("workbook contains no sheets")]
    NoSheets,
    /// First worksheet could not be decoded.
    #[error("cannot read sheet '{sheet}': {message}")]
    Sheet { sheet: String, message: String },
    /// Sheet has more cells than the reader accepts.
    #[error("sheet exceeds the {limit} cell limit")]
    TooLarge { limit: usize },
    /// Malformed CSV content.
    #[error("CSV parse error: {0}")]
    Csv(String),
    /// Extension is not one of the spreadsheet formats we read.
    #[error("unsupported file extension: '{0}'")]
    UnsupportedExtension(String),
}
