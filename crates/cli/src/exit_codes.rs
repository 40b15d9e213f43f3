//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                            |
//! |------|----------------------------------------------------|
//! | 0    | Success (including queries with diagnostics)       |
//! | 1    | General error (unspecified)                        |
//! | 2    | CLI usage error (bad args, unreadable config file) |
//! | 3    | Tables directory missing or unreadable             |
//! | 4    | Config failed to parse or validate                 |
//! | 5    | Output file could not be written                   |
//!
//! Unreadable extracts are not an exit condition: they are reported in the
//! payload's `debug_message` and the command still exits 0.

use shiluvim_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing config file.
pub const EXIT_USAGE: u8 = 2;

/// Tables directory does not exist or cannot be listed.
pub const EXIT_SOURCE_MISSING: u8 = 3;

/// Config TOML is malformed or fails validation.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// `--output` target could not be written.
pub const EXIT_OUTPUT_WRITE: u8 = 5;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::DirectoryNotFound(_) | ReconError::Io { .. } => EXIT_SOURCE_MISSING,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::Serialize(_) => EXIT_ERROR,
    }
}
