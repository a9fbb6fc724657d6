//! Video recommendations from the YouTube Data API search endpoint.

use super::{Recommendation, Recommender};
use crate::client::http_client;
use crate::config::RecommendationStrategy;
use crate::error::{Result, SpotterError};
use crate::vector_store::RetrievedMatch;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Thumbnail variants from largest to smallest.
const THUMBNAIL_PREFERENCE: &[&str] = &["maxres", "standard", "high", "medium", "default"];

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: ItemId,
    snippet: Snippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemId {
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct Snippet {
    title: String,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    url: String,
}

/// Link to watch a video.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

fn best_thumbnail(thumbnails: &HashMap<String, Thumbnail>) -> String {
    THUMBNAIL_PREFERENCE
        .iter()
        .find_map(|k| thumbnails.get(*k))
        .map(|t| t.url.clone())
        .unwrap_or_default()
}

/// Recommends videos by keyword search on the raw question.
pub struct YoutubeRecommender {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    count: usize,
}

impl YoutubeRecommender {
    pub fn new(base_url: &str, api_key: &str, count: usize, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            count,
        })
    }
}

#[async_trait]
impl Recommender for YoutubeRecommender {
    #[instrument(skip(self, _matches))]
    async fn recommend(
        &self,
        query: &str,
        _matches: &[RetrievedMatch],
    ) -> Result<Vec<Recommendation>> {
        let max_results = self.count.to_string();
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpotterError::Recommendation(format!(
                "YouTube search returned {}: {}",
                status, body
            )));
        }

        let parsed: SearchResponse = response.json().await?;
        let videos: Vec<Recommendation> = parsed
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                Some(Recommendation::Video {
                    thumbnail_url: best_thumbnail(&item.snippet.thumbnails),
                    title: item.snippet.title,
                    video_id,
                })
            })
            .take(self.count)
            .collect();

        debug!("Found {} videos", videos.len());
        Ok(videos)
    }

    fn strategy(&self) -> RecommendationStrategy {
        RecommendationStrategy::Videos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn recommender(url: &str, count: usize) -> YoutubeRecommender {
        YoutubeRecommender::new(url, "yt-key", count, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_search_maps_videos() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex("^/search".to_string()))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "best ab exercises".into()),
                Matcher::UrlEncoded("maxResults".into(), "3".into()),
                Matcher::UrlEncoded("type".into(), "video".into()),
                Matcher::UrlEncoded("key".into(), "yt-key".into()),
            ]))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "items": [
                        {
                            "id": {"kind": "youtube#video", "videoId": "abc123"},
                            "snippet": {
                                "title": "Six Pack Abs",
                                "thumbnails": {
                                    "default": {"url": "https://i.ytimg.com/vi/abc123/default.jpg"},
                                    "high": {"url": "https://i.ytimg.com/vi/abc123/hqdefault.jpg"}
                                }
                            }
                        },
                        {
                            "id": {"kind": "youtube#channel", "channelId": "UCxyz"},
                            "snippet": {"title": "A channel", "thumbnails": {}}
                        },
                        {
                            "id": {"kind": "youtube#video", "videoId": "def456"},
                            "snippet": {"title": "Core Stability", "thumbnails": {
                                "maxres": {"url": "https://i.ytimg.com/vi/def456/maxresdefault.jpg"},
                                "medium": {"url": "https://i.ytimg.com/vi/def456/mqdefault.jpg"}
                            }}
                        }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let videos = recommender(&server.url(), 3)
            .recommend("best ab exercises", &[])
            .await
            .unwrap();

        assert_eq!(
            videos,
            vec![
                Recommendation::Video {
                    title: "Six Pack Abs".to_string(),
                    video_id: "abc123".to_string(),
                    thumbnail_url: "https://i.ytimg.com/vi/abc123/hqdefault.jpg".to_string(),
                },
                Recommendation::Video {
                    title: "Core Stability".to_string(),
                    video_id: "def456".to_string(),
                    thumbnail_url: "https://i.ytimg.com/vi/def456/maxresdefault.jpg".to_string(),
                },
            ]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_quota_error_propagates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error": {"errors": [{"reason": "quotaExceeded"}]}}"#)
            .create_async()
            .await;

        let err = recommender(&server.url(), 3)
            .recommend("squats", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, SpotterError::Recommendation(_)));
        assert!(err.to_string().contains("quotaExceeded"));
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(watch_url("abc123"), "https://www.youtube.com/watch?v=abc123");
    }
}
