//! Vector store abstraction for Spotter.
//!
//! Provides a trait-based interface over the similarity-search backend that
//! holds the fitness content chunks.

mod memory;
mod pinecone;

pub use memory::MemoryVectorStore;
pub use pinecone::PineconeStore;

use crate::config::{Secrets, Settings, VectorStoreProvider};
use crate::embedding::Embedder;
use crate::error::{Result, SpotterError};
use crate::index::{index_records, load_records};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// One nearest-neighbour hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedMatch {
    /// Record ID in the index.
    pub id: String,
    /// Similarity score (higher is better).
    pub score: f32,
    /// `title` metadata, if the record carries one.
    pub title: Option<String>,
    /// `content` metadata, if the record carries one.
    pub content: Option<String>,
}

impl RetrievedMatch {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
            title: None,
            content: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// A record written into the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub title: String,
    pub content: String,
    /// File the chunk came from.
    pub source: String,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Return at most `top_k` matches, highest similarity first.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedMatch>>;

    /// Insert or replace records. Returns the number written.
    async fn upsert(&self, records: &[IndexRecord]) -> Result<usize>;

    /// Total number of stored records.
    async fn count(&self) -> Result<usize>;
}

/// Construct the configured vector store.
///
/// The memory store has no persistence, so it is filled from the ingested
/// JSON records using `embedder` before it is returned.
pub async fn create_vector_store(
    settings: &Settings,
    secrets: &Secrets,
    embedder: &dyn Embedder,
) -> Result<Arc<dyn VectorStore>> {
    let timeout = settings.general.timeout();
    Ok(match settings.vector_store.provider {
        VectorStoreProvider::Pinecone => {
            let key = Secrets::require(&secrets.pinecone_api_key, Secrets::PINECONE)?;
            match settings.vector_store.host.as_deref() {
                Some(host) => Arc::new(PineconeStore::with_host(host, &key, timeout)?),
                None => Arc::new(
                    PineconeStore::connect(
                        &settings.vector_store.control_url,
                        &settings.vector_store.index_name,
                        &key,
                        timeout,
                    )
                    .await?,
                ),
            }
        }
        VectorStoreProvider::Memory => Arc::new(seed_memory_store(settings, embedder).await?),
    })
}

async fn seed_memory_store(settings: &Settings, embedder: &dyn Embedder) -> Result<MemoryVectorStore> {
    let dir = settings.ingest_output_dir();
    if !dir.is_dir() {
        return Err(SpotterError::Config(format!(
            "The memory vector store is built from {}, which does not exist. Run 'spotter ingest' first.",
            dir.display()
        )));
    }

    let store = MemoryVectorStore::new();
    let records = load_records(&dir)?;
    let written = index_records(
        &records,
        embedder,
        &store,
        settings.ingest.chunk_size,
        settings.ingest.chunk_overlap,
    )
    .await?;
    info!("Loaded {} chunks from {} into the memory store", written, dir.display());
    Ok(store)
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
