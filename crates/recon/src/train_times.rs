//! Train Times query over the arrival and departure passenger extracts.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use shiluvim_io::{RawTable, ReadError};
use tracing::{info, warn};

use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::model::{cell, UnifiedTable};
use crate::query::parse_digits;
use crate::serialize::table_to_value;

pub const MSG_MISSING_FILTERS: &str = "missing station/year/month in query, no data shown";

pub const COL_YEAR: &str = "Year";
pub const COL_MONTH: &str = "Month";
pub const COL_STATION_NAME: &str = "StationName";

/// Hebrew headers shared by both extracts, and their stable English keys.
const COMMON_RENAMES: &[(&str, &str)] = &[
    ("שנה", COL_YEAR),
    ("חודש", COL_MONTH),
    ("תקופת שבוע", "WeekPeriod"),
    ("קוד תחנת הרכבת", "train_station_code"),
    ("שם תחנת הרכבת", COL_STATION_NAME),
    ("מספר רכבת", "Train_number"),
    ("מספר עולים בתחנה", "PassengersAscending"),
    ("מספר יורדים בתחנה", "PassengersDescending"),
];

const ARRIVAL_TIME: (&str, &str) = ("זמן הגעה לתחנה (רישוי)", "Planned_Train_Arrivel_Time");
const DEPARTURE_TIME: (&str, &str) = ("זמן יציאה מהתחנה (רישוי)", "Planned_Train_Departure_Time");

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainTimesQuery {
    pub station: String,
    pub year: Option<i64>,
    pub month: Option<i64>,
}

impl TrainTimesQuery {
    pub fn from_params(station: Option<&str>, year: Option<&str>, month: Option<&str>) -> Self {
        Self {
            station: station.unwrap_or_default().trim().to_string(),
            year: parse_digits(year),
            month: parse_digits(month),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainTimesContext {
    pub debug_message: String,
    pub station: String,
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub station_options: Vec<String>,
    pub year_options: Vec<i64>,
    pub month_options: Vec<i64>,
    /// JSON array of arrival records.
    pub arr_rows: Value,
    /// JSON array of departure records.
    pub dep_rows: Value,
}

impl TrainTimesContext {
    fn empty(query: &TrainTimesQuery, debug_message: String) -> Self {
        Self {
            debug_message,
            station: query.station.clone(),
            year: query.year,
            month: query.month,
            station_options: Vec::new(),
            year_options: Vec::new(),
            month_options: Vec::new(),
            arr_rows: Value::Array(Vec::new()),
            dep_rows: Value::Array(Vec::new()),
        }
    }
}

pub fn run_train_times(
    config: &ReconConfig,
    query: &TrainTimesQuery,
) -> Result<TrainTimesContext, ReconError> {
    run_train_times_with(config, query, shiluvim_io::read_table)
}

/// Same as [`run_train_times`] with a custom file reader.
pub fn run_train_times_with<F>(
    config: &ReconConfig,
    query: &TrainTimesQuery,
    read: F,
) -> Result<TrainTimesContext, ReconError>
where
    F: Fn(&Path) -> Result<RawTable, ReadError>,
{
    if query.station.is_empty() || query.year.is_none() || query.month.is_none() {
        return Ok(TrainTimesContext::empty(query, MSG_MISSING_FILTERS.into()));
    }
    if !config.tables_dir.is_dir() {
        return Err(ReconError::DirectoryNotFound(config.tables_dir.clone()));
    }

    let mut errors = Vec::new();
    let arrivals = load_renamed(config, &config.train_times.arrivals, ARRIVAL_TIME, &read, &mut errors);
    let departures = load_renamed(config, &config.train_times.departures, DEPARTURE_TIME, &read, &mut errors);

    let station_options = station_options(&[&arrivals, &departures]);

    let arr_station = rows_for_station(&arrivals, &query.station);
    let dep_station = rows_for_station(&departures, &query.station);

    let year_options = distinct_ints(&[&arr_station, &dep_station], COL_YEAR, None);
    let year = query.year.filter(|y| year_options.contains(y));

    let month_options = match year {
        Some(y) => distinct_ints(&[&arr_station, &dep_station], COL_MONTH, Some(y)),
        None => Vec::new(),
    };
    let month = query.month.filter(|m| month_options.contains(m));

    let arr = slice(&arrivals, &query.station, year, month);
    let dep = slice(&departures, &query.station, year, month);

    info!(
        station = %query.station,
        year = ?year,
        month = ?month,
        arrivals = arr.len(),
        departures = dep.len(),
        failed = errors.len(),
        "train times query"
    );

    Ok(TrainTimesContext {
        debug_message: errors.join("\n"),
        station: query.station.clone(),
        year,
        month,
        station_options,
        year_options,
        month_options,
        arr_rows: table_to_value(&arr),
        dep_rows: table_to_value(&dep),
    })
}

/// Read one extract and rename its headers. A failure leaves an empty table.
fn load_renamed<F>(
    config: &ReconConfig,
    file_name: &str,
    time_column: (&str, &str),
    read: &F,
    errors: &mut Vec<String>,
) -> UnifiedTable
where
    F: Fn(&Path) -> Result<RawTable, ReadError>,
{
    let path = config.tables_dir.join(file_name);
    match read(&path) {
        Ok(raw) => {
            let mut table = UnifiedTable::from(raw);
            for column in &mut table.columns {
                let renamed = COMMON_RENAMES
                    .iter()
                    .chain(std::iter::once(&time_column))
                    .find(|(hebrew, _)| *hebrew == column.as_str())
                    .map(|(_, english)| *english);
                if let Some(english) = renamed {
                    *column = english.to_string();
                }
            }
            table
        }
        Err(e) => {
            warn!(file = %file_name, error = %e, "failed to read train times extract");
            errors.push(format!("failed to read {file_name}: {e}"));
            UnifiedTable::default()
        }
    }
}

fn station_options(tables: &[&UnifiedTable]) -> Vec<String> {
    let mut names = BTreeSet::new();
    for table in tables {
        let Some(col) = table.column(COL_STATION_NAME) else {
            continue;
        };
        for row in &table.rows {
            let value = cell(row, col);
            if !value.is_null() {
                names.insert(value.to_trimmed_text());
            }
        }
    }
    names.into_iter().collect()
}

/// Station rows used for option lists. No station column means no rows.
fn rows_for_station(table: &UnifiedTable, station: &str) -> UnifiedTable {
    match table.column(COL_STATION_NAME) {
        Some(col) => table.retain_rows(|row| cell(row, col).to_trimmed_text() == station),
        None => table.empty_like(),
    }
}

/// Sorted distinct integers of `column`, optionally within one year.
fn distinct_ints(tables: &[&UnifiedTable], column: &str, in_year: Option<i64>) -> Vec<i64> {
    let mut values = BTreeSet::new();
    for table in tables {
        let Some(col) = table.column(column) else {
            continue;
        };
        let year_col = table.column(COL_YEAR);
        for row in &table.rows {
            if let Some(y) = in_year {
                let row_year = year_col.and_then(|c| cell(row, c).as_i64());
                if row_year != Some(y) {
                    continue;
                }
            }
            if let Some(v) = cell(row, col).as_i64() {
                values.insert(v);
            }
        }
    }
    values.into_iter().collect()
}

/// Station, then year and month when set. Absent columns are not filtered.
fn slice(table: &UnifiedTable, station: &str, year: Option<i64>, month: Option<i64>) -> UnifiedTable {
    let station_col = table.column(COL_STATION_NAME);
    let year_col = table.column(COL_YEAR);
    let month_col = table.column(COL_MONTH);

    table.retain_rows(|row| {
        let station_ok = station_col.map_or(true, |c| cell(row, c).to_trimmed_text() == station);
        let year_ok = match (year, year_col) {
            (Some(y), Some(c)) => cell(row, c).as_f64() == Some(y as f64),
            _ => true,
        };
        let month_ok = match (month, month_col) {
            (Some(m), Some(c)) => cell(row, c).as_f64() == Some(m as f64),
            _ => true,
        };
        station_ok && year_ok && month_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ARRIVALS_FILE;
    use shiluvim_io::CellValue;
    use tempfile::tempdir;

    fn arrivals() -> RawTable {
        RawTable {
            headers: vec![
                "שנה".into(),
                "חודש".into(),
                "שם תחנת הרכבת".into(),
                "זמן הגעה לתחנה (רישוי)".into(),
            ],
            rows: vec![
                vec![CellValue::Int(2025), CellValue::Int(10), "חיפה".into(), "06:30".into()],
                vec![CellValue::Int(2025), CellValue::Int(11), "חיפה ".into(), "07:00".into()],
                vec![CellValue::Int(2024), CellValue::Int(3), "חיפה".into(), "08:00".into()],
                vec![CellValue::Int(2025), CellValue::Int(10), "לוד".into(), "09:00".into()],
            ],
        }
    }

    fn query(station: &str, year: &str, month: &str) -> TrainTimesQuery {
        TrainTimesQuery::from_params(Some(station), Some(year), Some(month))
    }

    fn config(dir: &Path) -> ReconConfig {
        ReconConfig {
            tables_dir: dir.to_path_buf(),
            ..ReconConfig::default()
        }
    }

    #[test]
    fn all_three_filters_required() {
        let ctx = run_train_times(&ReconConfig::default(), &query("חיפה", "2025", "")).unwrap();
        assert_eq!(ctx.debug_message, MSG_MISSING_FILTERS);
        assert_eq!(ctx.arr_rows, Value::Array(Vec::new()));
    }

    #[test]
    fn slices_and_renames() {
        let dir = tempdir().unwrap();
        let ctx = run_train_times_with(&config(dir.path()), &query("חיפה", "2025", "10"), |path| {
            if path.ends_with(ARRIVALS_FILE) {
                Ok(arrivals())
            } else {
                Err(ReadError::Open("missing".into()))
            }
        })
        .unwrap();

        assert_eq!(ctx.station_options, vec!["חיפה", "לוד"]);
        assert_eq!(ctx.year_options, vec![2024, 2025]);
        assert_eq!(ctx.month_options, vec![10, 11]);
        assert_eq!((ctx.year, ctx.month), (Some(2025), Some(10)));
        assert_eq!(
            ctx.arr_rows,
            serde_json::json!([{
                "Year": 2025,
                "Month": 10,
                "StationName": "חיפה",
                "Planned_Train_Arrivel_Time": "06:30"
            }])
        );
        assert_eq!(ctx.dep_rows, Value::Array(Vec::new()));
        assert_eq!(
            ctx.debug_message,
            "failed to read Departure_train_passengers_numbers.csv: cannot open file: missing"
        );
    }

    #[test]
    fn unknown_year_resets_period() {
        let dir = tempdir().unwrap();
        let ctx = run_train_times_with(&config(dir.path()), &query("חיפה", "2030", "10"), |_| {
            Ok(arrivals())
        })
        .unwrap();

        assert_eq!((ctx.year, ctx.month), (None, None));
        assert!(ctx.month_options.is_empty());
        // Station-only slice, from both files
        assert_eq!(ctx.arr_rows.as_array().map(Vec::len), Some(3));
        assert_eq!(ctx.dep_rows.as_array().map(Vec::len), Some(3));
    }
}
