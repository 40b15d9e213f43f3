use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::warn;

use crate::model::{cell, ColumnIndex, Row, UnifiedTable};

/// How on-time percentages are obtained for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Each row carries a ready percentage.
    PreAggregated {
        year: usize,
        month: usize,
        train_id: usize,
        direction: usize,
        percent: usize,
    },
    /// Rows carry raw counts that are summed per key.
    RawCounts {
        year: usize,
        month: usize,
        train_id: usize,
        direction: usize,
        total: usize,
        on_time: usize,
    },
}

impl Strategy {
    /// Pick a strategy from the columns populated in `table`.
    ///
    /// A column counts only when some row holds a non-null cell in it, so a
    /// column a merged table inherited from another extract does not decide
    /// the shape. The percent column wins when both shapes are populated.
    pub fn resolve(table: &UnifiedTable, index: &ColumnIndex) -> Option<Self> {
        let populated = |column: Option<usize>| {
            column.filter(|&c| table.rows.iter().any(|row| !cell(row, c).is_null()))
        };

        let year = populated(index.year)?;
        let month = populated(index.month)?;
        let train_id = populated(index.train_id)?;
        let direction = populated(index.direction)?;

        if let Some(percent) = populated(index.percent_on_time) {
            return Some(Self::PreAggregated {
                year,
                month,
                train_id,
                direction,
                percent,
            });
        }
        match (populated(index.total_trips), populated(index.on_time_trips)) {
            (Some(total), Some(on_time)) => Some(Self::RawCounts {
                year,
                month,
                train_id,
                direction,
                total,
                on_time,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PercentageOutcome {
    pub strategy: Option<Strategy>,
    /// Composite key → percentage, in insertion order.
    pub entries: Map<String, Value>,
    /// Keys written more than once (pre-aggregated input only).
    pub overwritten: usize,
}

/// `{year}_{month}_{train_id}_{direction}`
pub fn composite_key(year: i64, month: i64, train_id: &str, direction: &str) -> String {
    format!("{year}_{month}_{train_id}_{direction}")
}

/// One decimal place, half away from zero, with a trailing `%`.
pub fn format_percentage(on_time: f64, total: f64) -> String {
    let pct = on_time / total * 100.0;
    let rounded = (pct * 10.0).round() / 10.0;
    format!("{rounded:.1}%")
}

/// Build the percentage lookup for a station-filtered table.
///
/// Tables lacking the key columns, or both value shapes, give an empty map.
pub fn build_percentage_map(table: &UnifiedTable, index: &ColumnIndex) -> PercentageOutcome {
    let Some(strategy) = Strategy::resolve(table, index) else {
        return PercentageOutcome::default();
    };

    let (entries, overwritten) = match strategy {
        Strategy::PreAggregated {
            year,
            month,
            train_id,
            direction,
            percent,
        } => pre_aggregated(table, [year, month, train_id, direction], percent),
        Strategy::RawCounts {
            year,
            month,
            train_id,
            direction,
            total,
            on_time,
        } => (
            raw_counts(table, [year, month, train_id, direction], total, on_time),
            0,
        ),
    };

    PercentageOutcome {
        strategy: Some(strategy),
        entries,
        overwritten,
    }
}

/// Coerced (year, month, train id, direction), `None` when any part is unusable.
fn key_parts(row: &Row, cols: [usize; 4]) -> Option<(i64, i64, String, String)> {
    let year = cell(row, cols[0]).as_i64()?;
    let month = cell(row, cols[1]).as_i64()?;
    let train_id = cell(row, cols[2]).to_trimmed_text();
    let direction = cell(row, cols[3]).to_trimmed_text();
    if train_id.is_empty() || direction.is_empty() {
        return None;
    }
    Some((year, month, train_id, direction))
}

fn pre_aggregated(table: &UnifiedTable, cols: [usize; 4], percent: usize) -> (Map<String, Value>, usize) {
    let mut entries = Map::new();
    let mut overwritten = 0;

    for row in &table.rows {
        let value = cell(row, percent);
        if value.is_null() {
            continue;
        }
        let Some((year, month, train_id, direction)) = key_parts(row, cols) else {
            continue;
        };
        let key = composite_key(year, month, &train_id, &direction);
        if entries.insert(key.clone(), value.to_json()).is_some() {
            warn!(key = %key, "duplicate percentage key, keeping the later row");
            overwritten += 1;
        }
    }

    (entries, overwritten)
}

fn raw_counts(table: &UnifiedTable, cols: [usize; 4], total: usize, on_time: usize) -> Map<String, Value> {
    let mut groups: BTreeMap<(i64, i64, String, String), (f64, f64)> = BTreeMap::new();

    for row in &table.rows {
        let Some(key) = key_parts(row, cols) else {
            continue;
        };
        let (Some(total_n), Some(on_time_n)) = (cell(row, total).as_f64(), cell(row, on_time).as_f64())
        else {
            continue;
        };
        if total_n <= 0.0 {
            continue;
        }
        let entry = groups.entry(key).or_insert((0.0, 0.0));
        entry.0 += total_n;
        entry.1 += on_time_n;
    }

    groups
        .into_iter()
        .map(|((year, month, train_id, direction), (total_sum, on_time_sum))| {
            (
                composite_key(year, month, &train_id, &direction),
                Value::String(format_percentage(on_time_sum, total_sum)),
            )
        })
        .collect()
}
