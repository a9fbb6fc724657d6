//! Answer generation with a hosted language model.

mod gemini;
mod openai;

pub use gemini::GeminiGenerator;
pub use openai::OpenAIGenerator;

use crate::config::{LlmProvider, Secrets, Settings};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Turns a fully rendered prompt into a completion.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Send the prompt and wait for the whole completion.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model name, for display.
    fn model(&self) -> &str;
}

/// Construct the configured generator.
pub fn create_generator(settings: &Settings, secrets: &Secrets) -> Result<Arc<dyn Generator>> {
    let llm = &settings.llm;
    let timeout = settings.general.timeout();
    info!("Using {} for answers ({})", llm.provider, llm.model());

    Ok(match llm.provider {
        LlmProvider::Gemini => {
            let key = Secrets::require(&secrets.google_api_key, Secrets::GOOGLE)?;
            Arc::new(
                GeminiGenerator::new(&key, llm.model(), timeout)?
                    .with_base_url(llm.base_url())
                    .with_temperature(llm.temperature),
            )
        }
        LlmProvider::OpenAI => {
            let key = Secrets::require(&secrets.openai_api_key, Secrets::OPENAI)?;
            Arc::new(OpenAIGenerator::new(
                &key,
                llm.base_url(),
                llm.model(),
                llm.temperature,
                timeout,
            )?)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_provider_defaults_to_openai_model() {
        let mut settings = Settings::default();
        settings.llm.provider = LlmProvider::OpenAI;
        let secrets = Secrets {
            openai_api_key: Some("sk-test".to_string()),
            ..Secrets::default()
        };

        let generator = create_generator(&settings, &secrets).unwrap();
        assert_eq!(generator.model(), "gpt-4o-mini");
    }
}
