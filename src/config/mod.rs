//! Configuration module for Spotter.
//!
//! Handles loading application settings, environment credentials and prompt templates.

mod prompts;
mod settings;

pub use prompts::{CoachPrompts, Prompts};
pub use settings::{
    EmbeddingProvider, EmbeddingSettings, GeneralSettings, IngestSettings, LlmProvider,
    LlmSettings, PromptSettings, RecommendationSettings, RecommendationStrategy, Secrets,
    Settings, VectorStoreProvider, VectorStoreSettings, YoutubeSettings,
};
