//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod doctor;
mod index;
mod ingest;
mod search;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use index::run_index;
pub use ingest::run_ingest;
pub use search::run_search;

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Secrets, Settings};

/// Run pre-flight checks, printing a hint on failure.
fn preflight(operation: Operation, settings: &Settings, secrets: &Secrets) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(operation, settings, secrets) {
        Output::error(&format!("{}", e));
        Output::info("Run 'spotter doctor' for detailed diagnostics.");
        return Err(e.into());
    }
    Ok(())
}
