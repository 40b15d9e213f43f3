//! Direction split of a station/period-filtered table.

use crate::config::DirectionLiterals;
use crate::model::{cell, ColumnIndex, UnifiedTable};

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionSplit {
    /// Rows travelling toward the reference city.
    pub toward: UnifiedTable,
    /// Rows travelling away from it.
    pub away: UnifiedTable,
}

/// Split rows by exact trimmed match on the direction column.
///
/// Rows matching neither literal are dropped. Without a direction column
/// both halves are empty.
pub fn partition_by_direction(
    table: &UnifiedTable,
    index: &ColumnIndex,
    directions: &DirectionLiterals,
) -> DirectionSplit {
    let Some(col) = index.direction else {
        return DirectionSplit {
            toward: table.empty_like(),
            away: table.empty_like(),
        };
    };

    let toward_literal = directions.toward.trim();
    let away_literal = directions.away.trim();
    let mut toward = table.empty_like();
    let mut away = table.empty_like();

    for row in &table.rows {
        let value = cell(row, col).to_trimmed_text();
        if value == toward_literal {
            toward.rows.push(row.clone());
        } else if value == away_literal {
            away.rows.push(row.clone());
        }
    }

    DirectionSplit { toward, away }
}
