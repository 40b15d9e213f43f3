//! Table loading: read each discovered extract and tag it with its week-period label.

use std::path::Path;

use shiluvim_io::{CellValue, RawTable, ReadError};
use tracing::{debug, warn};

use crate::model::SourceFile;

/// One successfully read extract.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub source: SourceFile,
    pub table: RawTable,
}

/// Loaded tables plus one diagnostic line per file that failed to read.
///
/// Both lists follow discovery order.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub tables: Vec<LoadedTable>,
    pub errors: Vec<String>,
}

/// Read every source with the spreadsheet reader.
pub fn load_sources(sources: &[SourceFile], week_period_column: &str) -> LoadOutcome {
    load_sources_with(sources, week_period_column, shiluvim_io::read_table)
}

/// Read every source with `read`. A failing file is recorded and skipped.
pub fn load_sources_with<F>(sources: &[SourceFile], week_period_column: &str, read: F) -> LoadOutcome
where
    F: Fn(&Path) -> Result<RawTable, ReadError>,
{
    let mut outcome = LoadOutcome::default();

    for source in sources {
        match read(&source.path) {
            Ok(mut table) => {
                inject_label(&mut table, week_period_column, &source.label);
                debug!(file = %source.file_name, rows = table.len(), "loaded extract");
                outcome.tables.push(LoadedTable {
                    source: source.clone(),
                    table,
                });
            }
            Err(e) => {
                warn!(file = %source.file_name, error = %e, "failed to read extract");
                outcome
                    .errors
                    .push(format!("failed to read {}: {e}", source.file_name));
            }
        }
    }

    outcome
}

/// Set `column` to `label` on every row, appending the column when absent.
fn inject_label(table: &mut RawTable, column: &str, label: &str) {
    let idx = match table.column(column) {
        Some(idx) => idx,
        None => {
            table.headers.push(column.to_string());
            for row in &mut table.rows {
                row.push(CellValue::Null);
            }
            table.headers.len() - 1
        }
    };
    for row in &mut table.rows {
        row[idx] = CellValue::Text(label.to_string());
    }
}
