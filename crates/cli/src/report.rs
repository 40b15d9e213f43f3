//! `shiluvim convergence | train-times | discover | validate`

use std::path::PathBuf;

use shiluvim_recon::discover::discover_sources;
use shiluvim_recon::{
    run_convergence, run_train_times, ConvergenceQuery, ReconConfig, ReconError, TrainTimesQuery,
};

use crate::exit_codes::{recon_exit_code, EXIT_USAGE};
use crate::settings::resolve_config;
use crate::util::{emit_json, record_count};
use crate::{CliError, QueryArgs, SourceArgs};

fn recon_err(err: ReconError) -> CliError {
    let hint = match &err {
        ReconError::DirectoryNotFound(_) => {
            Some("pass --tables-dir or set tables_dir in shiluvim.toml".to_string())
        }
        _ => None,
    };
    CliError {
        code: recon_exit_code(&err),
        message: err.to_string(),
        hint,
    }
}

fn load_config(source: &SourceArgs) -> Result<ReconConfig, CliError> {
    resolve_config(source.config.as_deref(), source.tables_dir.clone())
}

/// Diagnostics are part of the payload; echo them to stderr as well.
fn print_diagnostics(debug_message: &str) {
    for line in debug_message.lines() {
        eprintln!("note: {line}");
    }
}

// ============================================================================
// convergence
// ============================================================================

pub fn cmd_convergence(source: SourceArgs, args: QueryArgs) -> Result<(), CliError> {
    let config = load_config(&source)?;
    let query = ConvergenceQuery::from_params(
        args.station.as_deref(),
        args.year.as_deref(),
        args.month.as_deref(),
    );

    let ctx = run_convergence(&config, &query).map_err(recon_err)?;
    emit_json(&ctx, args.output.as_deref())?;

    if !args.quiet {
        print_diagnostics(&ctx.debug_message);
        let period = match (ctx.year, ctx.month) {
            (Some(y), Some(m)) => format!("{y}-{m:02}"),
            _ => "no period".to_string(),
        };
        eprintln!(
            "convergence: '{}' {}: {} toward, {} away, {} options",
            ctx.station,
            period,
            record_count(&ctx.bus_to_rail_js),
            record_count(&ctx.rail_to_bus_js),
            record_count(&ctx.year_month_options_js),
        );
    }
    Ok(())
}

// ============================================================================
// train-times
// ============================================================================

pub fn cmd_train_times(source: SourceArgs, args: QueryArgs) -> Result<(), CliError> {
    let config = load_config(&source)?;
    let query = TrainTimesQuery::from_params(
        args.station.as_deref(),
        args.year.as_deref(),
        args.month.as_deref(),
    );

    let ctx = run_train_times(&config, &query).map_err(recon_err)?;
    emit_json(&ctx, args.output.as_deref())?;

    if !args.quiet {
        print_diagnostics(&ctx.debug_message);
        let count = |rows: &serde_json::Value| rows.as_array().map_or(0, Vec::len);
        eprintln!(
            "train times: '{}': {} arrivals, {} departures, {} stations",
            ctx.station,
            count(&ctx.arr_rows),
            count(&ctx.dep_rows),
            ctx.station_options.len(),
        );
    }
    Ok(())
}

// ============================================================================
// discover
// ============================================================================

pub fn cmd_discover(source: SourceArgs, json: bool) -> Result<(), CliError> {
    let config = load_config(&source)?;
    let sources = discover_sources(&config.tables_dir, &config).map_err(recon_err)?;

    if json {
        let records: Vec<serde_json::Value> = sources
            .iter()
            .map(|s| {
                serde_json::json!({
                    "period": s.period,
                    "label": s.label,
                    "file_name": s.file_name,
                    "path": s.path.display().to_string(),
                })
            })
            .collect();
        return emit_json(&records, None);
    }

    for s in &sources {
        println!("{}\t{}\t{}", s.period, s.label, s.file_name);
    }
    eprintln!(
        "{} extract(s) in {}",
        sources.len(),
        config.tables_dir.display()
    );
    Ok(())
}

// ============================================================================
// validate
// ============================================================================

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    if !config_path.is_file() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: format!("config file not found: {}", config_path.display()),
            hint: None,
        });
    }

    let config = ReconConfig::load(&config_path)
        .map_err(|e| recon_err(e).with_hint(format!("check {}", config_path.display())))?;

    let periods = if config.periods.is_empty() {
        "all periods".to_string()
    } else {
        config.periods.join(", ")
    };
    eprintln!(
        "valid: {} week period(s), {}, tables_dir {}",
        config.week_periods.len(),
        periods,
        config.tables_dir.display()
    );
    Ok(())
}
