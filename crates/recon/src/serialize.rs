//! JSON text blobs handed to the page layer.
//!
//! Non-ASCII text is written as-is. Object keys keep insertion order.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ReconError;
use crate::model::{UnifiedTable, YearMonth};

/// Rows as a JSON array of objects keyed by column name in column order.
pub fn table_to_value(table: &UnifiedTable) -> Value {
    let records = table
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, Value> = table
                .columns
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = row.get(i).map(|c| c.to_json()).unwrap_or(Value::Null);
                    (name.clone(), value)
                })
                .collect();
            Value::Object(object)
        })
        .collect();
    Value::Array(records)
}

/// `[]` for an empty table, never `null`.
pub fn table_to_json(table: &UnifiedTable) -> Result<String, ReconError> {
    to_json(&table_to_value(table))
}

pub fn map_to_json(map: &Map<String, Value>) -> Result<String, ReconError> {
    to_json(map)
}

/// `[{"year":2025,"month":10}, ...]`
pub fn options_to_json(options: &[YearMonth]) -> Result<String, ReconError> {
    to_json(options)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ReconError> {
    serde_json::to_string(value).map_err(|e| ReconError::Serialize(e.to_string()))
}
