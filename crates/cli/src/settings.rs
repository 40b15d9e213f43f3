//! Config file resolution.

use std::path::{Path, PathBuf};

use shiluvim_recon::{ReconConfig, ReconError};
use tracing::debug;

use crate::exit_codes::{recon_exit_code, EXIT_USAGE};
use crate::CliError;

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "shiluvim.toml";

/// Per-user config: `~/.config/shiluvim/config.toml` on Linux.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("shiluvim").join("config.toml"))
}

/// Resolve the config in order: `--config`, `./shiluvim.toml`, the user
/// config file, built-in defaults. `tables_dir` overrides whatever was loaded.
pub fn resolve_config(
    explicit: Option<&Path>,
    tables_dir: Option<PathBuf>,
) -> Result<ReconConfig, CliError> {
    let mut config = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(CliError {
                    code: EXIT_USAGE,
                    message: format!("config file not found: {}", path.display()),
                    hint: None,
                });
            }
            load(path)?
        }
        None => match discovered_config() {
            Some(path) => load(&path)?,
            None => {
                debug!("no config file found, using defaults");
                ReconConfig::default()
            }
        },
    };

    if let Some(dir) = tables_dir {
        config.tables_dir = dir;
    }
    Ok(config)
}

fn discovered_config() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    user_config_path().filter(|p| p.is_file())
}

fn load(path: &Path) -> Result<ReconConfig, CliError> {
    debug!(path = %path.display(), "loading config");
    ReconConfig::load(path).map_err(|e| {
        let code = match e {
            ReconError::Io { .. } => EXIT_USAGE,
            _ => recon_exit_code(&e),
        };
        CliError {
            code,
            message: e.to_string(),
            hint: Some(format!("check {}", path.display())),
        }
    })
}
