//! Station and period filtering.

use std::collections::BTreeSet;

use crate::model::{cell, ColumnIndex, UnifiedTable, YearMonth};

/// Rows whose trimmed station equals the trimmed `station`, case-sensitive.
///
/// Without a station column the table passes through unchanged.
pub fn narrow_to_station(table: &UnifiedTable, index: &ColumnIndex, station: &str) -> UnifiedTable {
    let Some(col) = index.station else {
        return table.clone();
    };
    let wanted = station.trim();
    table.retain_rows(|row| cell(row, col).to_trimmed_text() == wanted)
}

/// Distinct (year, month) pairs in ascending order.
///
/// Rows whose year or month does not coerce to an integer are ignored.
/// Either column missing yields no options.
pub fn year_month_options(table: &UnifiedTable, index: &ColumnIndex) -> Vec<YearMonth> {
    let (Some(year_col), Some(month_col)) = (index.year, index.month) else {
        return Vec::new();
    };

    let pairs: BTreeSet<YearMonth> = table
        .rows
        .iter()
        .filter_map(|row| {
            let year = cell(row, year_col).as_i64()?;
            let month = cell(row, month_col).as_i64()?;
            Some(YearMonth::new(year, month))
        })
        .collect();

    pairs.into_iter().collect()
}

/// Rows whose `column` numerically equals `value`.
///
/// No column means no filtering. Cells that do not coerce never match.
pub fn filter_numeric_eq(table: &UnifiedTable, column: Option<usize>, value: i64) -> UnifiedTable {
    let Some(col) = column else {
        return table.clone();
    };
    let target = value as f64;
    table.retain_rows(|row| cell(row, col).as_f64() == Some(target))
}

/// Fill in whichever of year and month is missing from `options`.
///
/// With a year given, the first option in that year supplies the month.
/// Otherwise the first option overall supplies the missing parts. A value
/// that was passed in is never replaced.
pub fn select_default_period(
    options: &[YearMonth],
    year: Option<i64>,
    month: Option<i64>,
) -> (Option<i64>, Option<i64>) {
    if year.is_some() && month.is_some() {
        return (year, month);
    }

    let pick = match year {
        Some(y) => options.iter().find(|ym| ym.year == y),
        None => options.first(),
    };

    match pick {
        Some(ym) => (year.or(Some(ym.year)), month.or(Some(ym.month))),
        None => (year, month),
    }
}
