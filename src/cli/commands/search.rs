//! Search command implementation.

use super::preflight;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::{Secrets, Settings};
use crate::orchestrator::Retriever;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, limit: usize, settings: Settings, secrets: Secrets) -> Result<()> {
    preflight(Operation::Search, &settings, &secrets)?;

    if query.trim().is_empty() {
        anyhow::bail!("Query cannot be empty");
    }

    let spinner = Output::spinner("Searching...");
    let results = match Retriever::from_settings(&settings, &secrets).await {
        Ok(retriever) => retriever.search(query, limit).await,
        Err(e) => Err(e),
    };
    spinner.finish_and_clear();

    match results {
        Ok(matches) if matches.is_empty() => {
            Output::warning("No results found matching your query.");
        }
        Ok(matches) => {
            Output::success(&format!("Found {} results", matches.len()));
            for (rank, m) in matches.iter().enumerate() {
                Output::search_result(
                    rank + 1,
                    m.title.as_deref().unwrap_or("(untitled)"),
                    &m.id,
                    m.score,
                    m.content.as_deref().unwrap_or(""),
                );
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
