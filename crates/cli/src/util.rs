use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::exit_codes::{EXIT_ERROR, EXIT_OUTPUT_WRITE};
use crate::CliError;

/// Pretty JSON to `output`, or to stdout when no path is given.
pub(crate) fn emit_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError {
        code: EXIT_ERROR,
        message: format!("JSON serialization error: {e}"),
        hint: None,
    })?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n")).map_err(|e| CliError {
                code: EXIT_OUTPUT_WRITE,
                message: format!("cannot write {}: {e}", path.display()),
                hint: None,
            })?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{json}").map_err(|e| CliError {
                code: EXIT_OUTPUT_WRITE,
                message: format!("cannot write to stdout: {e}"),
                hint: None,
            })?;
        }
    }
    Ok(())
}

/// Number of records in a JSON array blob, 0 when it does not parse.
pub(crate) fn record_count(blob: &str) -> usize {
    serde_json::from_str::<serde_json::Value>(blob)
        .ok()
        .and_then(|v| v.as_array().map(Vec::len))
        .unwrap_or(0)
}
