//! Pre-flight checks before expensive operations.
//!
//! Validates that the credentials an operation needs are present before
//! starting work that would otherwise fail midway.

use crate::config::{
    EmbeddingProvider, LlmProvider, RecommendationStrategy, Secrets, Settings, VectorStoreProvider,
};
use crate::error::{Result, SpotterError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Embedding, retrieval, generation and recommendations.
    Ask,
    /// Embedding and retrieval.
    Search,
    /// Embedding and upserts.
    Index,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error naming the first missing key.
pub fn check(operation: Operation, settings: &Settings, secrets: &Secrets) -> Result<()> {
    match operation {
        Operation::Ask => {
            check_retrieval(settings, secrets)?;
            match settings.llm.provider {
                LlmProvider::Gemini => present(&secrets.google_api_key, Secrets::GOOGLE)?,
                LlmProvider::OpenAI => present(&secrets.openai_api_key, Secrets::OPENAI)?,
            }
            if settings.recommendations.strategy == RecommendationStrategy::Videos {
                present(&secrets.youtube_api_key, Secrets::YOUTUBE)?;
            }
        }
        Operation::Search | Operation::Index => check_retrieval(settings, secrets)?,
    }
    Ok(())
}

fn check_retrieval(settings: &Settings, secrets: &Secrets) -> Result<()> {
    // Public Hugging Face models work without a token.
    if settings.embedding.provider == EmbeddingProvider::OpenAI {
        present(&secrets.openai_api_key, Secrets::OPENAI)?;
    }
    if settings.vector_store.provider == VectorStoreProvider::Pinecone {
        present(&secrets.pinecone_api_key, Secrets::PINECONE)?;
    }
    Ok(())
}

fn present(value: &Option<String>, name: &'static str) -> Result<()> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(SpotterError::MissingKey(name)),
    }
}
