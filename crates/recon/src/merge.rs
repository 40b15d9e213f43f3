//! Table merging: concatenate per-file tables into one unified table.

use std::collections::HashMap;

use shiluvim_io::{CellValue, RawTable};

use crate::model::UnifiedTable;

/// Append all rows in input order. Columns are the union of every input's
/// headers in first-appearance order; cells a file lacks are `Null`.
pub fn merge_tables<I>(tables: I) -> UnifiedTable
where
    I: IntoIterator<Item = RawTable>,
{
    let mut merged = UnifiedTable::default();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for table in tables {
        let mapping: Vec<usize> = table
            .headers
            .iter()
            .map(|h| {
                *positions.entry(h.clone()).or_insert_with(|| {
                    merged.columns.push(h.clone());
                    merged.columns.len() - 1
                })
            })
            .collect();

        for row in table.rows {
            let mut out = vec![CellValue::Null; merged.columns.len()];
            for (value, &target) in row.into_iter().zip(&mapping) {
                out[target] = value;
            }
            merged.rows.push(out);
        }
    }

    // Earlier rows predate columns introduced by later tables
    let width = merged.columns.len();
    for row in &mut merged.rows {
        row.resize(width, CellValue::Null);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], rows: Vec<Vec<CellValue>>) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn union_of_columns_with_nulls() {
        let a = raw(&["x", "y"], vec![vec![CellValue::Int(1), CellValue::Int(2)]]);
        let b = raw(&["y", "z"], vec![vec![CellValue::Int(3), CellValue::Int(4)]]);

        let merged = merge_tables(vec![a, b]);
        assert_eq!(merged.columns, vec!["x", "y", "z"]);
        assert_eq!(
            merged.rows,
            vec![
                vec![CellValue::Int(1), CellValue::Int(2), CellValue::Null],
                vec![CellValue::Null, CellValue::Int(3), CellValue::Int(4)],
            ]
        );
    }

    #[test]
    fn duplicates_preserved_in_order() {
        let row = vec![CellValue::from("same")];
        let a = raw(&["x"], vec![row.clone(), row.clone()]);
        let b = raw(&["x"], vec![row.clone()]);

        let merged = merge_tables(vec![a, b]);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn empty_input() {
        let merged = merge_tables(Vec::new());
        assert!(merged.columns.is_empty());
        assert!(merged.is_empty());
    }
}
