//! Error types for Spotter.

use thiserror::Error;

/// Library-level error type for Spotter operations.
#[derive(Error, Debug)]
pub enum SpotterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Language model error: {0}")]
    Llm(String),

    #[error("Recommendation error: {0}")]
    Recommendation(String),

    #[error("PDF ingestion failed: {0}")]
    Ingest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Missing credential: {0} is not set")]
    MissingKey(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Spotter operations.
pub type Result<T> = std::result::Result<T, SpotterError>;
