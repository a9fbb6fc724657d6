//! Sentence-transformers embeddings served by Hugging Face inference.

use super::Embedder;
use crate::client::http_client;
use crate::error::{Result, SpotterError};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

const BATCH_SIZE: usize = 32;

#[derive(Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [String],
}

/// Embedder backed by the feature-extraction pipeline of a hosted checkpoint.
pub struct HuggingFaceEmbedder {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    dimensions: usize,
}

impl HuggingFaceEmbedder {
    /// Create an embedder for `model` (e.g. `sentence-transformers/multi-qa-mpnet-base-dot-v1`).
    pub fn new(
        base_url: &str,
        model: &str,
        dimensions: usize,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: format!(
                "{}/models/{}/pipeline/feature-extraction",
                base_url.trim_end_matches('/'),
                model
            ),
            token,
            dimensions,
        })
    }

    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&FeatureExtractionRequest { inputs: texts });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpotterError::Embedding(format!(
                "Inference API returned {}: {}",
                status, body
            )));
        }

        let vectors: Vec<Vec<f32>> = response.json().await.map_err(|e| {
            SpotterError::Embedding(format!("Unexpected feature-extraction response: {}", e))
        })?;

        if vectors.len() != texts.len() {
            return Err(SpotterError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }

        if let Some(v) = vectors.iter().find(|v| v.len() != self.dimensions) {
            return Err(SpotterError::Embedding(format!(
                "Dimension mismatch: expected {}, got {}",
                self.dimensions,
                v.len()
            )));
        }

        Ok(vectors)
    }
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.request(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SpotterError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut all = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(BATCH_SIZE) {
            all.extend(self.request(chunk).await?);
        }
        debug!("Generated {} embeddings", all.len());
        Ok(all)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "sentence-transformers/multi-qa-mpnet-base-dot-v1";

    fn embedder(url: &str, dims: usize, token: Option<&str>) -> HuggingFaceEmbedder {
        HuggingFaceEmbedder::new(url, MODEL, dims, token.map(String::from), Duration::from_secs(5))
            .unwrap()
    }

    #[tokio::test]
    async fn test_embed_single() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", format!("/models/{}/pipeline/feature-extraction", MODEL).as_str())
            .match_header("authorization", "Bearer hf_test")
            .match_body(mockito::Matcher::Json(serde_json::json!({"inputs": ["squat depth"]})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[[0.5, 0.25, -1.0]]")
            .create_async()
            .await;

        let vector = embedder(&server.url(), 3, Some("hf_test"))
            .embed("squat depth")
            .await
            .unwrap();

        assert_eq!(vector, vec![0.5, 0.25, -1.0]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", mockito::Matcher::Any)
            .with_status(200)
            .with_body("[[0.1, 0.2]]")
            .create_async()
            .await;

        let err = embedder(&server.url(), 768, None).embed("plank").await.unwrap_err();
        assert!(matches!(err, SpotterError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_model_unavailable_propagates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", mockito::Matcher::Any)
            .with_status(503)
            .with_body(r#"{"error":"Model is currently loading"}"#)
            .create_async()
            .await;

        let err = embedder(&server.url(), 3, None).embed("deadlift").await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }
}
