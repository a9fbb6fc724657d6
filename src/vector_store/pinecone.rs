//! Pinecone vector store over its REST API.

use super::{IndexRecord, RetrievedMatch, VectorStore};
use crate::client::http_client;
use crate::error::{Result, SpotterError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info, instrument};

const API_VERSION: &str = "2024-07";
const UPSERT_BATCH: usize = 100;

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<PineconeMatch>,
}

#[derive(Deserialize)]
struct PineconeMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<UpsertVector<'a>>,
}

#[derive(Serialize)]
struct UpsertVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(default)]
    total_vector_count: usize,
}

/// Client for a single Pinecone index.
pub struct PineconeStore {
    client: reqwest::Client,
    api_key: String,
    /// Data-plane base URL of the index.
    base_url: String,
}

impl PineconeStore {
    /// Resolve the index host through the control plane and connect to it.
    #[instrument(skip(api_key, timeout))]
    pub async fn connect(
        control_url: &str,
        index_name: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = http_client(timeout)?;
        let url = format!("{}/indexes/{}", control_url.trim_end_matches('/'), index_name);

        let response = client
            .get(&url)
            .header("Api-Key", api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SpotterError::VectorStore(format!(
                "Index '{}' not found",
                index_name
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpotterError::VectorStore(format!(
                "Failed to describe index '{}' ({}): {}",
                index_name, status, body
            )));
        }

        let described: DescribeIndexResponse = response.json().await?;
        info!("Connected to index '{}' at {}", index_name, described.host);

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: normalize_host(&described.host),
        })
    }

    /// Connect directly to a known index host.
    pub fn with_host(host: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.to_string(),
            base_url: normalize_host(host),
        })
    }

    async fn post<B: Serialize + ?Sized, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpotterError::VectorStore(format!(
                "{} returned {}: {}",
                path, status, body
            )));
        }

        Ok(response.json().await?)
    }
}

/// Index hosts come back without a scheme.
fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

fn metadata_str(metadata: &Option<Map<String, Value>>, key: &str) -> Option<String> {
    metadata
        .as_ref()
        .and_then(|m| m.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl VectorStore for PineconeStore {
    #[instrument(skip(self, vector), fields(dims = vector.len()))]
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedMatch>> {
        let response: QueryResponse = self
            .post(
                "/query",
                &QueryRequest {
                    vector,
                    top_k,
                    include_metadata: true,
                    include_values: false,
                },
            )
            .await?;

        let matches: Vec<RetrievedMatch> = response
            .matches
            .into_iter()
            .take(top_k)
            .map(|m| RetrievedMatch {
                title: metadata_str(&m.metadata, "title"),
                content: metadata_str(&m.metadata, "content"),
                id: m.id,
                score: m.score,
            })
            .collect();

        debug!("Retrieved {} matches", matches.len());
        Ok(matches)
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn upsert(&self, records: &[IndexRecord]) -> Result<usize> {
        let mut written = 0;
        for batch in records.chunks(UPSERT_BATCH) {
            let vectors = batch
                .iter()
                .map(|r| UpsertVector {
                    id: &r.id,
                    values: &r.values,
                    metadata: serde_json::json!({
                        "title": r.title,
                        "content": r.content,
                        "source": r.source,
                    }),
                })
                .collect();

            let response: UpsertResponse =
                self.post("/vectors/upsert", &UpsertRequest { vectors }).await?;
            written += response.upserted_count;
        }
        Ok(written)
    }

    async fn count(&self) -> Result<usize> {
        let stats: StatsResponse = self
            .post("/describe_index_stats", &serde_json::json!({}))
            .await?;
        Ok(stats.total_vector_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn timeout() -> Duration {
        Duration::from_secs(5)
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(
            normalize_host("fitness-abc123.svc.pinecone.io"),
            "https://fitness-abc123.svc.pinecone.io"
        );
        assert_eq!(normalize_host("http://localhost:5080/"), "http://localhost:5080");
    }

    #[tokio::test]
    async fn test_connect_resolves_host() {
        let mut server = mockito::Server::new_async().await;
        let host = server.url();
        let describe = server
            .mock("GET", "/indexes/fitness-chatbot-enhanced")
            .match_header("api-key", "pc-key")
            .with_status(200)
            .with_body(serde_json::json!({ "name": "fitness-chatbot-enhanced", "host": host }).to_string())
            .create_async()
            .await;
        let query = server
            .mock("POST", "/query")
            .with_status(200)
            .with_body(r#"{"matches": [], "namespace": ""}"#)
            .create_async()
            .await;

        let store = PineconeStore::connect(&host, "fitness-chatbot-enhanced", "pc-key", timeout())
            .await
            .unwrap();
        assert!(store.query(&[0.1, 0.2], 6).await.unwrap().is_empty());

        describe.assert_async().await;
        query.assert_async().await;
    }

    #[tokio::test]
    async fn test_connect_missing_index() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/indexes/nope")
            .with_status(404)
            .create_async()
            .await;

        let err = match PineconeStore::connect(&server.url(), "nope", "k", timeout()).await {
            Ok(_) => panic!("expected failure"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_query_preserves_order_and_metadata() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/query")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "topK": 6,
                "includeMetadata": true
            })))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "matches": [
                        {"id": "m1", "score": 0.91, "metadata": {"title": "Warm-ups", "content": "Warm up with dynamic stretches."}},
                        {"id": "m2", "score": 0.85, "metadata": {"content": "Increase heart rate gradually."}},
                        {"id": "m3", "score": 0.80}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let store = PineconeStore::with_host(&server.url(), "k", timeout()).unwrap();
        let matches = store.query(&[0.0; 4], 6).await.unwrap();

        assert_eq!(
            matches.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            vec!["m1", "m2", "m3"]
        );
        assert_eq!(matches[0].title.as_deref(), Some("Warm-ups"));
        assert!(matches[1].title.is_none());
        assert!(matches[2].content.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upsert_and_count() {
        let mut server = mockito::Server::new_async().await;
        let upsert = server
            .mock("POST", "/vectors/upsert")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#""id":"guide-0""#.to_string()),
                Matcher::Regex(r#""source":"guide.pdf""#.to_string()),
            ]))
            .with_status(200)
            .with_body(r#"{"upsertedCount": 1}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/describe_index_stats")
            .with_status(200)
            .with_body(r#"{"totalVectorCount": 42, "dimension": 768}"#)
            .create_async()
            .await;

        let store = PineconeStore::with_host(&server.url(), "k", timeout()).unwrap();
        let written = store
            .upsert(&[IndexRecord {
                id: "guide-0".to_string(),
                values: vec![0.1, 0.2],
                title: "Guide".to_string(),
                content: "Brace your core.".to_string(),
                source: "guide.pdf".to_string(),
            }])
            .await
            .unwrap();

        assert_eq!(written, 1);
        assert_eq!(store.count().await.unwrap(), 42);
        upsert.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_error_propagates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/query")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let store = PineconeStore::with_host(&server.url(), "bad", timeout()).unwrap();
        let err = store.query(&[0.1], 6).await.unwrap_err();
        assert!(matches!(err, SpotterError::VectorStore(_)));
    }
}
