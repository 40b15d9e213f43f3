use std::path::PathBuf;

use serde::Serialize;
use shiluvim_io::CellValue;

use crate::config::ColumnNames;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// One discovered extract file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Period identifier, `YYYY-MM`.
    pub period: String,
    /// Week-period label injected into every row of this file.
    pub label: String,
    pub file_name: String,
    pub path: PathBuf,
}

// ---------------------------------------------------------------------------
// Unified table
// ---------------------------------------------------------------------------

/// Row values, aligned with the owning table's `columns`.
pub type Row = Vec<CellValue>;

/// Merged rows from every loaded extract, in discovery order then file order.
///
/// Duplicate rows are preserved. A cell missing from its source file is an
/// explicit `CellValue::Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnifiedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl UnifiedTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Same columns, no rows.
    pub fn empty_like(&self) -> Self {
        Self::new(self.columns.clone())
    }

    /// Rows for which `keep` holds, in their original order.
    pub fn retain_rows(&self, mut keep: impl FnMut(&Row) -> bool) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

impl From<shiluvim_io::RawTable> for UnifiedTable {
    fn from(raw: shiluvim_io::RawTable) -> Self {
        Self {
            columns: raw.headers,
            rows: raw.rows,
        }
    }
}

// ---------------------------------------------------------------------------
// Column roles
// ---------------------------------------------------------------------------

/// Position of each known column role in a table, resolved once per table.
///
/// `None` means the column is absent from this dataset, which differs from
/// a present column holding `CellValue::Null` in some row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    pub station: Option<usize>,
    pub year: Option<usize>,
    pub month: Option<usize>,
    pub week_period: Option<usize>,
    pub direction: Option<usize>,
    pub train_id: Option<usize>,
    pub percent_on_time: Option<usize>,
    pub total_trips: Option<usize>,
    pub on_time_trips: Option<usize>,
}

impl ColumnIndex {
    pub fn resolve(table: &UnifiedTable, names: &ColumnNames) -> Self {
        Self {
            station: table.column(&names.station),
            year: table.column(&names.year),
            month: table.column(&names.month),
            week_period: table.column(&names.week_period),
            direction: table.column(&names.direction),
            train_id: table.column(&names.train_id),
            percent_on_time: table.column(&names.percent_on_time),
            total_trips: table.column(&names.total_trips),
            on_time_trips: table.column(&names.on_time_trips),
        }
    }
}

static NULL_CELL: CellValue = CellValue::Null;

/// Cell at `column` in `row`, `Null` when out of range.
pub fn cell(row: &Row, column: usize) -> &CellValue {
    row.get(column).unwrap_or(&NULL_CELL)
}

// ---------------------------------------------------------------------------
// Period options
// ---------------------------------------------------------------------------

/// An available (year, month) choice for a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct YearMonth {
    pub year: i64,
    pub month: i64,
}

impl YearMonth {
    pub fn new(year: i64, month: i64) -> Self {
        Self { year, month }
    }
}
