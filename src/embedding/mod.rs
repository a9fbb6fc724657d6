//! Embedding generation for semantic retrieval.

mod huggingface;
mod openai;

pub use huggingface::HuggingFaceEmbedder;
pub use openai::OpenAIEmbedder;

use crate::config::{EmbeddingProvider, Secrets, Settings};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}

/// Construct the configured embedder. Called once per process.
pub fn create_embedder(settings: &Settings, secrets: &Secrets) -> Result<Arc<dyn Embedder>> {
    let embedding = &settings.embedding;
    let timeout = settings.general.timeout();
    let dims = embedding.dimensions();

    info!("Using {} embeddings ({})", embedding.provider, embedding.model());

    Ok(match embedding.provider {
        EmbeddingProvider::HuggingFace => Arc::new(HuggingFaceEmbedder::new(
            embedding.base_url(),
            embedding.model(),
            dims,
            secrets.hf_api_token.clone(),
            timeout,
        )?),
        EmbeddingProvider::OpenAI => {
            let key = Secrets::require(&secrets.openai_api_key, Secrets::OPENAI)?;
            Arc::new(OpenAIEmbedder::with_config(
                &key,
                embedding.base_url(),
                embedding.model(),
                dims,
                timeout,
            )?)
        }
    })
}
