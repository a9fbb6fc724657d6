//! Index command: JSON records into the vector store.

use super::preflight;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::{Secrets, Settings, VectorStoreProvider};
use crate::embedding::create_embedder;
use crate::index::{index_records, load_records};
use crate::vector_store::create_vector_store;
use anyhow::Result;

/// Run the index command.
pub async fn run_index(input: Option<String>, settings: Settings, secrets: Secrets) -> Result<()> {
    preflight(Operation::Index, &settings, &secrets)?;

    if settings.vector_store.provider == VectorStoreProvider::Memory {
        Output::info("The memory vector store is rebuilt from the ingested records on every run; nothing to index.");
        return Ok(());
    }

    let dir = input
        .map(|i| Settings::expand_path(&i))
        .unwrap_or_else(|| settings.ingest_output_dir());
    let records = load_records(&dir)?;
    if records.is_empty() {
        Output::warning(&format!("No JSON records in {}. Run 'spotter ingest' first.", dir.display()));
        return Ok(());
    }
    Output::info(&format!("Indexing {} records from {}", records.len(), dir.display()));

    let embedder = create_embedder(&settings, &secrets)?;
    let store = create_vector_store(&settings, &secrets, embedder.as_ref()).await?;

    let spinner = Output::spinner("Embedding and uploading...");
    let written = index_records(
        &records,
        embedder.as_ref(),
        store.as_ref(),
        settings.ingest.chunk_size,
        settings.ingest.chunk_overlap,
    )
    .await;
    spinner.finish_and_clear();

    let written = written?;
    Output::success(&format!(
        "Indexed {} chunks into '{}'",
        written, settings.vector_store.index_name
    ));
    Ok(())
}
