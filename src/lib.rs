//! Spotter - a retrieval-augmented fitness coaching assistant
//!
//! Answers training and nutrition questions by retrieving passages from a
//! vector index of fitness material and handing them to an LLM in a coach
//! persona, alongside reading or video recommendations.
//!
//! # Architecture
//!
//! - `config` - Settings, secrets and prompt templates
//! - `embedding` - Query and passage embeddings
//! - `vector_store` - Nearest-neighbour retrieval (Pinecone, in-memory)
//! - `rag` - Context assembly
//! - `llm` - Answer generation (Gemini, OpenAI)
//! - `recommend` - Reading or video recommendations
//! - `orchestrator` - The per-question pipeline
//! - `session` - Chat transcript for the interactive front end
//! - `ingest` - PDF to JSON extraction
//! - `index` - Chunking ingested records into the vector store
//!
//! # Example
//!
//! ```rust,no_run
//! use spotter::config::{Secrets, Settings};
//! use spotter::orchestrator::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = Pipeline::from_settings(&settings, &Secrets::from_env()).await?;
//!
//!     let turn = pipeline.answer("How should I warm up before a workout?").await?;
//!     println!("{} ({:.2}s)", turn.answer, turn.response_time_secs());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod orchestrator;
pub mod rag;
pub mod recommend;
pub mod session;
pub mod vector_store;

pub use error::{Result, SpotterError};
