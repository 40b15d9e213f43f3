//! The convergence query: one full scan, load, merge, filter and aggregate pass.

use serde::Serialize;
use tracing::info;

use crate::aggregate::build_percentage_map;
use crate::config::ReconConfig;
use crate::discover::discover_sources;
use crate::error::ReconError;
use crate::filter::{filter_numeric_eq, narrow_to_station, select_default_period, year_month_options};
use crate::loader::load_sources;
use crate::merge::merge_tables;
use crate::model::ColumnIndex;
use crate::partition::partition_by_direction;
use crate::serialize::{map_to_json, options_to_json, table_to_json};

pub const MSG_MISSING_STATION: &str = "missing station in query, no data shown";
pub const MSG_NO_DATA: &str = "no data found";

/// Parsed query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvergenceQuery {
    pub station: String,
    pub year: Option<i64>,
    pub month: Option<i64>,
}

impl ConvergenceQuery {
    /// Station is trimmed. Year and month are kept only when all digits.
    pub fn from_params(station: Option<&str>, year: Option<&str>, month: Option<&str>) -> Self {
        Self {
            station: station.unwrap_or_default().trim().to_string(),
            year: parse_digits(year),
            month: parse_digits(month),
        }
    }
}

pub(crate) fn parse_digits(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Response payload for the convergence page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvergenceContext {
    pub station: String,
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub debug_message: String,
    /// Rows toward the reference city.
    pub bus_to_rail_js: String,
    /// Rows away from the reference city.
    pub rail_to_bus_js: String,
    pub train_perc_js: String,
    pub year_month_options_js: String,
}

impl ConvergenceContext {
    fn empty(query: &ConvergenceQuery, debug_message: String) -> Self {
        Self {
            station: query.station.clone(),
            year: query.year,
            month: query.month,
            debug_message,
            bus_to_rail_js: "[]".into(),
            rail_to_bus_js: "[]".into(),
            train_perc_js: "{}".into(),
            year_month_options_js: "[]".into(),
        }
    }
}

/// Answer one convergence query from the files in `config.tables_dir`.
///
/// Only a missing or unreadable tables directory is an error. Unreadable
/// files end up in `debug_message`.
pub fn run_convergence(
    config: &ReconConfig,
    query: &ConvergenceQuery,
) -> Result<ConvergenceContext, ReconError> {
    if query.station.is_empty() {
        return Ok(ConvergenceContext::empty(query, MSG_MISSING_STATION.into()));
    }

    let sources = discover_sources(&config.tables_dir, config)?;
    let loaded = load_sources(&sources, &config.columns.week_period);
    let errors = loaded.errors;
    let merged = merge_tables(loaded.tables.into_iter().map(|t| t.table));

    if merged.is_empty() {
        let message = if errors.is_empty() {
            MSG_NO_DATA.to_string()
        } else {
            errors.join("\n")
        };
        info!(
            station = %query.station,
            files = sources.len(),
            failed = errors.len(),
            "convergence query found no rows"
        );
        return Ok(ConvergenceContext::empty(query, message));
    }

    let index = ColumnIndex::resolve(&merged, &config.columns);
    let station_rows = narrow_to_station(&merged, &index, &query.station);
    let options = year_month_options(&station_rows, &index);
    let (year, month) = select_default_period(&options, query.year, query.month);

    let mut filtered = station_rows;
    if let Some(y) = year {
        filtered = filter_numeric_eq(&filtered, index.year, y);
    }
    if let Some(m) = month {
        filtered = filter_numeric_eq(&filtered, index.month, m);
    }

    let split = partition_by_direction(&filtered, &index, &config.directions);
    let percentages = build_percentage_map(&filtered, &index);

    info!(
        station = %query.station,
        year = ?year,
        month = ?month,
        files = sources.len(),
        failed = errors.len(),
        rows = filtered.len(),
        toward = split.toward.len(),
        away = split.away.len(),
        keys = percentages.entries.len(),
        "convergence query"
    );

    Ok(ConvergenceContext {
        station: query.station.clone(),
        year,
        month,
        debug_message: errors.join("\n"),
        bus_to_rail_js: table_to_json(&split.toward)?,
        rail_to_bus_js: table_to_json(&split.away)?,
        train_perc_js: map_to_json(&percentages.entries)?,
        year_month_options_js: options_to_json(&options)?,
    })
}
