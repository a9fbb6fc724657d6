//! Configuration settings for Spotter.

use crate::error::{Result, SpotterError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub embedding: EmbeddingSettings,
    pub vector_store: VectorStoreSettings,
    pub llm: LlmSettings,
    pub recommendations: RecommendationSettings,
    pub youtube: YoutubeSettings,
    pub ingest: IngestSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Request timeout for every outbound call, in seconds.
    pub timeout_secs: u64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            timeout_secs: crate::client::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GeneralSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Embedding provider type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Sentence-transformers checkpoint served by Hugging Face inference.
    #[default]
    HuggingFace,
    /// OpenAI embeddings endpoint.
    OpenAI,
}

impl std::fmt::Display for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingProvider::HuggingFace => write!(f, "huggingface"),
            EmbeddingProvider::OpenAI => write!(f, "openai"),
        }
    }
}

/// Embedding generation settings.
///
/// Unset `model`, `dimensions` and `base_url` fall back to the provider's defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub provider: EmbeddingProvider,
    /// Model checkpoint name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Embedding dimensions; must match the index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<u32>,
    /// API root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl EmbeddingSettings {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(match self.provider {
            EmbeddingProvider::HuggingFace => "sentence-transformers/multi-qa-mpnet-base-dot-v1",
            EmbeddingProvider::OpenAI => "text-embedding-3-small",
        })
    }

    pub fn dimensions(&self) -> usize {
        let dims = self.dimensions.unwrap_or(match self.provider {
            EmbeddingProvider::HuggingFace => 768,
            EmbeddingProvider::OpenAI => 1536,
        });
        dims as usize
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(match self.provider {
            EmbeddingProvider::HuggingFace => "https://router.huggingface.co/hf-inference",
            EmbeddingProvider::OpenAI => OPENAI_API_BASE,
        })
    }
}

/// Vector store provider type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VectorStoreProvider {
    #[default]
    Pinecone,
    /// In-process store rebuilt from the ingested JSON records at start-up.
    Memory,
}

impl std::fmt::Display for VectorStoreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorStoreProvider::Pinecone => write!(f, "pinecone"),
            VectorStoreProvider::Memory => write!(f, "memory"),
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    pub provider: VectorStoreProvider,
    /// Name of the index holding the fitness chunks.
    pub index_name: String,
    /// Number of matches retrieved per question.
    pub top_k: usize,
    /// Pinecone control plane, used to resolve the index host.
    pub control_url: String,
    /// Data-plane host of the index. Skips the control-plane lookup when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            provider: VectorStoreProvider::Pinecone,
            index_name: "fitness-chatbot-enhanced".to_string(),
            top_k: 6,
            control_url: "https://api.pinecone.io".to_string(),
            host: None,
        }
    }
}

/// Language model provider type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Gemini,
    OpenAI,
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::Gemini => write!(f, "gemini"),
            LlmProvider::OpenAI => write!(f, "openai"),
        }
    }
}

/// Response generation settings.
///
/// Unset `model` and `base_url` fall back to the provider's defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    /// Model used for answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub temperature: f32,
    /// API root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Gemini,
            model: None,
            temperature: 0.7,
            base_url: None,
        }
    }
}

impl LlmSettings {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(match self.provider {
            LlmProvider::Gemini => "gemini-1.5-pro",
            LlmProvider::OpenAI => "gpt-4o-mini",
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(match self.provider {
            LlmProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            LlmProvider::OpenAI => OPENAI_API_BASE,
        })
    }
}

/// Recommendation strategy, fixed for the lifetime of a process.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStrategy {
    /// Recommend the retrieved chunks themselves as further reading.
    #[default]
    Chunks,
    /// Search YouTube for videos matching the question.
    Videos,
}

impl std::fmt::Display for RecommendationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationStrategy::Chunks => write!(f, "chunks"),
            RecommendationStrategy::Videos => write!(f, "videos"),
        }
    }
}

/// Recommendation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationSettings {
    pub strategy: RecommendationStrategy,
    /// Maximum number of recommendations per answer.
    pub count: usize,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            strategy: RecommendationStrategy::Chunks,
            count: 3,
        }
    }
}

/// YouTube Data API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    pub base_url: String,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
        }
    }
}

/// PDF ingestion and indexing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Where JSON records are written.
    pub output_dir: String,
    /// Characters per indexed chunk.
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks.
    pub chunk_overlap: usize,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            output_dir: "data/pdf".to_string(),
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: HashMap<String, String>,
}

/// Credentials read from the environment once at start-up.
#[derive(Clone, Default)]
pub struct Secrets {
    pub pinecone_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub hf_api_token: Option<String>,
    pub youtube_api_key: Option<String>,
}

impl Secrets {
    pub const PINECONE: &'static str = "PINECONE_API_KEY";
    pub const GOOGLE: &'static str = "GOOGLE_API_KEY";
    pub const OPENAI: &'static str = "OPENAI_API_KEY";
    pub const HF: &'static str = "HF_API_TOKEN";
    pub const YOUTUBE: &'static str = "YOUTUBE_API_KEY";

    /// Read every known key from the process environment.
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            pinecone_api_key: read(Self::PINECONE),
            google_api_key: read(Self::GOOGLE),
            openai_api_key: read(Self::OPENAI),
            hf_api_token: read(Self::HF),
            youtube_api_key: read(Self::YOUTUBE),
        }
    }

    /// Return the key or a `MissingKey` error naming the variable.
    pub fn require(value: &Option<String>, name: &'static str) -> Result<String> {
        value.clone().ok_or(SpotterError::MissingKey(name))
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "set" } else { "unset" };
        f.debug_struct("Secrets")
            .field("pinecone_api_key", &mask(&self.pinecone_api_key))
            .field("google_api_key", &mask(&self.google_api_key))
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("hf_api_token", &mask(&self.hf_api_token))
            .field("youtube_api_key", &mask(&self.youtube_api_key))
            .finish()
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SpotterError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spotter")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded directory for ingested PDF records.
    pub fn ingest_output_dir(&self) -> PathBuf {
        Self::expand_path(&self.ingest.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment() {
        let settings = Settings::default();
        assert_eq!(settings.vector_store.index_name, "fitness-chatbot-enhanced");
        assert_eq!(settings.vector_store.top_k, 6);
        assert_eq!(settings.recommendations.count, 3);
        assert_eq!(settings.llm.model(), "gemini-1.5-pro");
        assert_eq!(settings.embedding.dimensions(), 768);
        assert_eq!(settings.general.timeout(), Duration::from_secs(300));
        assert_eq!(settings.ingest.output_dir, "data/pdf");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [recommendations]
            strategy = "videos"

            [vector_store]
            top_k = 4
            "#,
        )
        .unwrap();

        assert_eq!(settings.recommendations.strategy, RecommendationStrategy::Videos);
        assert_eq!(settings.recommendations.count, 3);
        assert_eq!(settings.vector_store.top_k, 4);
        assert_eq!(settings.vector_store.provider, VectorStoreProvider::Pinecone);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.llm.provider = LlmProvider::OpenAI;
        settings.llm.model = Some("gpt-4o".to_string());
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.llm.provider, LlmProvider::OpenAI);
        assert_eq!(loaded.llm.model(), "gpt-4o");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.vector_store.top_k, 6);
    }

    #[test]
    fn test_provider_defaults_follow_provider() {
        let settings: Settings = toml::from_str(
            r#"
            [general]
            timeout_secs = 30

            [llm]
            provider = "openai"

            [embedding]
            provider = "openai"
            "#,
        )
        .unwrap();

        assert_eq!(settings.llm.model(), "gpt-4o-mini");
        assert_eq!(settings.llm.base_url(), "https://api.openai.com/v1");
        assert_eq!(settings.embedding.model(), "text-embedding-3-small");
        assert_eq!(settings.embedding.dimensions(), 1536);
        assert_eq!(settings.general.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_explicit_model_wins() {
        let settings: Settings = toml::from_str(
            r#"
            [llm]
            model = "gemini-1.5-flash"
            base_url = "http://localhost:9000"
            "#,
        )
        .unwrap();

        assert_eq!(settings.llm.provider, LlmProvider::Gemini);
        assert_eq!(settings.llm.model(), "gemini-1.5-flash");
        assert_eq!(settings.llm.base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_require_secret() {
        let secrets = Secrets::default();
        let err = Secrets::require(&secrets.pinecone_api_key, Secrets::PINECONE).unwrap_err();
        assert!(err.to_string().contains("PINECONE_API_KEY"));
        assert!(!format!("{:?}", Secrets { google_api_key: Some("k".into()), ..Default::default() })
            .contains("\"k\""));
    }
}
