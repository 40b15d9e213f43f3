// Excel import (xlsx, xlsm, xlsb, xls, ods)
//
// Only the first worksheet is read. The first non-empty row of its used
// range is the header row.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use chrono::{NaiveDate, TimeDelta};
use tracing::warn;

use crate::error::ReadError;
use crate::table::{CellValue, RawTable};

/// Maximum number of cells to import (prevents DoS from huge files)
const MAX_CELLS: usize = 5_000_000;

/// Day zero of the 1900 date system, valid for serials after 1900-02-28.
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Import the first worksheet of an Excel file.
pub fn import(path: &Path) -> Result<RawTable, ReadError> {
    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| ReadError::Open(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ReadError::NoSheets)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ReadError::Sheet {
            sheet: sheet_name.clone(),
            message: e.to_string(),
        })?;

    let grid = range_to_grid(&range, MAX_CELLS).inspect_err(|_| {
        warn!(
            path = %path.display(),
            sheet = %sheet_name,
            limit = MAX_CELLS,
            "sheet exceeds cell limit"
        );
    })?;
    Ok(RawTable::from_grid(grid))
}

/// Convert a worksheet range, refusing ranges larger than `limit` cells.
fn range_to_grid(range: &Range<Data>, limit: usize) -> Result<Vec<Vec<CellValue>>, ReadError> {
    let (height, width) = range.get_size();
    if height.saturating_mul(width) > limit {
        return Err(ReadError::TooLarge { limit });
    }
    Ok(range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect())
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            if s.is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(s.clone())
            }
        }
        // Excel stores every number as a float; integral ones come back as ints
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                CellValue::Int(*n as i64)
            } else {
                CellValue::Float(*n)
            }
        }
        Data::Int(n) => CellValue::Int(*n),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(_) => CellValue::Null,
        Data::DateTime(dt) => serial_to_text(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Render a 1900-system date serial as ISO-8601 text.
///
/// Whole-day serials become `YYYY-MM-DD`; serials with a time part become
/// `YYYY-MM-DDTHH:MM:SS`. Out-of-range serials are kept as numbers.
pub fn serial_to_text(serial: f64) -> CellValue {
    let (y, m, d) = EXCEL_EPOCH;
    let days = serial.floor();
    let seconds = ((serial - days) * SECONDS_PER_DAY).round() as i64;

    let datetime = NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|epoch| epoch.and_hms_opt(0, 0, 0))
        .zip(TimeDelta::try_days(days as i64))
        .and_then(|(epoch, day_offset)| epoch.checked_add_signed(day_offset))
        .zip(TimeDelta::try_seconds(seconds))
        .and_then(|(date, time_offset)| date.checked_add_signed(time_offset));

    match datetime {
        Some(dt) if seconds == 0 => CellValue::Text(dt.format("%Y-%m-%d").to_string()),
        Some(dt) => CellValue::Text(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
        None => CellValue::Float(serial),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_date_only() {
        // 2025-11-01 is serial 45962
        assert_eq!(serial_to_text(45962.0), CellValue::Text("2025-11-01".into()));
    }

    #[test]
    fn test_serial_with_time() {
        // 06:30 = 0.2708333...
        let serial = 45962.0 + 6.5 / 24.0;
        assert_eq!(
            serial_to_text(serial),
            CellValue::Text("2025-11-01T06:30:00".into())
        );
    }

    #[test]
    fn test_serial_rounding_rolls_over_midnight() {
        let serial = 45962.0 + 0.999_999_99;
        assert_eq!(
            serial_to_text(serial),
            CellValue::Text("2025-11-02T00:00:00".into())
        );
    }

    #[test]
    fn test_range_over_limit_is_an_error() {
        let mut range = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String("שנה".into()));
        range.set_value((1, 0), Data::Float(2025.0));

        let err = range_to_grid(&range, 5).unwrap_err();
        assert!(matches!(err, ReadError::TooLarge { limit: 5 }));

        let grid = range_to_grid(&range, 6).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[1][0], CellValue::Int(2025));
        assert_eq!(grid[2][1], CellValue::Null);
    }

    #[test]
    fn test_convert_integral_float_to_int() {
        assert_eq!(convert_cell(&Data::Float(2025.0)), CellValue::Int(2025));
        assert_eq!(convert_cell(&Data::Float(93.4)), CellValue::Float(93.4));
        assert_eq!(convert_cell(&Data::String(String::new())), CellValue::Null);
        assert_eq!(convert_cell(&Data::Empty), CellValue::Null);
    }
}
