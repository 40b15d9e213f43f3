//! `shiluvim-recon`: rail/bus convergence reconciliation engine.
//!
//! Scans a flat directory of monthly extracts, merges them, and answers
//! point queries by station and period: two directional subsets and an
//! on-time percentage lookup, each as a JSON text blob.

pub mod aggregate;
pub mod config;
pub mod discover;
pub mod error;
pub mod filter;
pub mod loader;
pub mod merge;
pub mod model;
pub mod partition;
pub mod query;
pub mod serialize;
pub mod train_times;

pub use config::ReconConfig;
pub use error::ReconError;
pub use query::{run_convergence, ConvergenceContext, ConvergenceQuery};
pub use train_times::{run_train_times, TrainTimesContext, TrainTimesQuery};
