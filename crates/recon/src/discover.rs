//! File discovery: find monthly convergence extracts in a flat directory.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::config::{normalize_token, ReconConfig};
use crate::error::ReconError;
use crate::model::SourceFile;

/// `<token>_rail_bus_convergence_<YYYY-MM>.<ext>`
fn file_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9]+)_rail_bus_convergence_([0-9]{4}-[0-9]{2})\.([A-Za-z0-9]+)$")
            .expect("extract file name pattern is a valid regex")
    })
}

/// Scan `dir` (no recursion) for extracts named after a configured week-period token.
///
/// Non-matching names, unknown tokens, unsupported extensions and periods
/// outside a non-empty allow-list are skipped. The result is sorted by
/// (period, file name).
pub fn discover_sources(dir: &Path, config: &ReconConfig) -> Result<Vec<SourceFile>, ReconError> {
    let entries = std::fs::read_dir(dir).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ReconError::DirectoryNotFound(dir.to_path_buf()),
        _ => ReconError::Io {
            path: dir.to_path_buf(),
            message: e.to_string(),
        },
    })?;

    let labels = config.week_period_labels();
    let mut sources = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| ReconError::Io {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };

        let Some(caps) = file_name_pattern().captures(&file_name) else {
            debug!(file = %file_name, "skipping: name does not match extract pattern");
            continue;
        };
        let token = normalize_token(&caps[1]);
        let period = caps[2].to_string();
        let ext = &caps[3];

        let Some(label) = labels.get(&token) else {
            debug!(file = %file_name, token = %token, "skipping: unknown week-period token");
            continue;
        };
        if !shiluvim_io::is_supported_extension(ext) {
            debug!(file = %file_name, ext = %ext, "skipping: unsupported extension");
            continue;
        }
        if !config.periods.is_empty() && !config.periods.contains(&period) {
            debug!(file = %file_name, period = %period, "skipping: period not allowed");
            continue;
        }

        sources.push(SourceFile {
            period,
            label: label.clone(),
            file_name,
            path,
        });
    }

    sources.sort_by(|a, b| {
        a.period
            .cmp(&b.period)
            .then_with(|| a.file_name.cmp(&b.file_name))
    });

    debug!(dir = %dir.display(), count = sources.len(), "discovered extracts");
    Ok(sources)
}
