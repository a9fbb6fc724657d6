//! Populating the vector index from ingested PDF records.

use crate::embedding::Embedder;
use crate::error::{Result, SpotterError};
use crate::ingest::{read_record, PdfRecord, NOT_AVAILABLE};
use crate::vector_store::{IndexRecord, VectorStore};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Split `text` into overlapping windows of `size` characters.
///
/// Windows are trimmed and empty ones dropped. `overlap` must be smaller than
/// `size`.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Result<Vec<String>> {
    if size == 0 || overlap >= size {
        return Err(SpotterError::InvalidInput(format!(
            "chunk overlap ({}) must be smaller than chunk size ({})",
            overlap, size
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    let step = size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + size).min(chars.len());
        let window: String = chars[start..end].iter().collect();
        let window = window.trim();
        if !window.is_empty() {
            chunks.push(window.to_string());
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }

    Ok(chunks)
}

/// Load every `*.json` record in `dir`, sorted by file name.
///
/// Files that do not parse as records are skipped with a warning.
pub fn load_records(dir: &Path) -> Result<Vec<PdfRecord>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "json"))
        .collect();
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        match read_record(&path) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Ignoring {}: {}", path.display(), e),
        }
    }
    Ok(records)
}

fn display_title(record: &PdfRecord) -> String {
    if record.title == NOT_AVAILABLE {
        record.stem().to_string()
    } else {
        record.title.clone()
    }
}

/// Chunk, embed and upsert records. Returns the number of vectors written.
#[instrument(skip_all, fields(records = records.len()))]
pub async fn index_records(
    records: &[PdfRecord],
    embedder: &dyn Embedder,
    store: &dyn VectorStore,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<usize> {
    let mut total = 0;

    for record in records {
        let chunks = chunk_text(&record.text, chunk_size, chunk_overlap)?;
        if chunks.is_empty() {
            debug!("{} has no text, skipping", record.file_name);
            continue;
        }

        let vectors = embedder.embed_batch(&chunks).await?;
        if vectors.len() != chunks.len() {
            return Err(SpotterError::Embedding(format!(
                "{}: {} chunks but {} embeddings",
                record.file_name,
                chunks.len(),
                vectors.len()
            )));
        }
        let title = display_title(record);
        let batch: Vec<IndexRecord> = chunks
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(n, (content, values))| IndexRecord {
                id: format!("{}-{}", record.stem(), n),
                values,
                title: title.clone(),
                content,
                source: record.file_name.clone(),
            })
            .collect();

        total += store.upsert(&batch).await?;
        debug!("Indexed {} chunks from {}", batch.len(), record.file_name);
    }

    info!("Indexed {} vectors", total);
    Ok(total)
}
