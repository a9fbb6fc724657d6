//! Ask command implementation.

use super::preflight;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::{Secrets, Settings};
use crate::orchestrator::Pipeline;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    top_k: Option<usize>,
    mut settings: Settings,
    secrets: Secrets,
) -> Result<()> {
    preflight(Operation::Ask, &settings, &secrets)?;

    if let Some(k) = top_k {
        settings.vector_store.top_k = k;
    }
    let pipeline = Pipeline::from_settings(&settings, &secrets).await?;

    let spinner = Output::spinner("Thinking...");
    let result = pipeline.answer(question).await;
    spinner.finish_and_clear();

    match result {
        Ok(turn) => {
            println!("\n{}\n", turn.answer);
            Output::response_time(turn.response_time_secs());
            Output::recommendations(&turn.recommendations);
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
