// Shiluvim CLI - rail/bus convergence reports from the command line

mod exit_codes;
mod report;
mod settings;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "shiluvim")]
#[command(about = "Rail/bus convergence reconciliation over monthly spreadsheet extracts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the extracts and settings come from.
#[derive(Args)]
pub struct SourceArgs {
    /// Config file (default: ./shiluvim.toml, then the user config dir)
    #[arg(long, env = "SHILUVIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the extracts (overrides the config's tables_dir)
    #[arg(long, env = "SHILUVIM_TABLES_DIR")]
    pub tables_dir: Option<PathBuf>,
}

/// Station and period filters, passed through as raw text.
#[derive(Args)]
pub struct QueryArgs {
    /// Station name (matched exactly after trimming)
    #[arg(long)]
    pub station: Option<String>,

    /// Year; ignored unless all digits
    #[arg(long)]
    pub year: Option<String>,

    /// Month; ignored unless all digits
    #[arg(long)]
    pub month: Option<String>,

    /// Write the payload to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Suppress the stderr summary
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Directional subsets and on-time percentages for one station and month
    #[command(after_help = "\
Year and month default to the station's earliest available period.

Examples:
  shiluvim convergence --station 'תל אביב סבידור'
  shiluvim convergence --station 'חיפה מרכז' --year 2025 --month 11
  shiluvim convergence --station 'לוד' --tables-dir ./tables -o payload.json")]
    Convergence {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Planned arrival/departure passenger records for one station and month
    #[command(after_help = "\
Station, year and month are all required for rows to be returned.

Examples:
  shiluvim train-times --station 'בית יהושע' --year 2025 --month 10")]
    TrainTimes {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        query: QueryArgs,
    },

    /// List the extracts that would be loaded
    Discover {
        #[command(flatten)]
        source: SourceArgs,

        /// Print a JSON array instead of one line per file
        #[arg(long)]
        json: bool,
    },

    /// Validate a config file without running a query
    Validate {
        /// Path to the TOML config
        config: PathBuf,
    },
}

/// Logs go to stderr so stdout carries only the JSON payload.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convergence { source, query } => report::cmd_convergence(source, query),
        Commands::TrainTimes { source, query } => report::cmd_train_times(source, query),
        Commands::Discover { source, json } => report::cmd_discover(source, json),
        Commands::Validate { config } => report::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
