//! Secondary recommendations shown next to an answer.
//!
//! Two interchangeable strategies share the [`Recommender`] contract: reusing
//! the retrieved chunks as further reading, or searching YouTube for videos.
//! The strategy is picked once at start-up from configuration.

mod chunks;
mod youtube;

pub use chunks::ChunkRecommender;
pub use youtube::{watch_url, YoutubeRecommender};

use crate::config::{RecommendationStrategy, Secrets, Settings};
use crate::error::Result;
use crate::vector_store::RetrievedMatch;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A recommended item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Recommendation {
    /// A retrieved passage offered as further reading.
    Reading { title: String, content: String },
    /// A video from the search API.
    Video {
        title: String,
        video_id: String,
        thumbnail_url: String,
    },
}

impl Recommendation {
    pub fn title(&self) -> &str {
        match self {
            Recommendation::Reading { title, .. } | Recommendation::Video { title, .. } => title,
        }
    }
}

/// Produces up to N recommendations for a question and its retrieval results.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(&self, query: &str, matches: &[RetrievedMatch])
        -> Result<Vec<Recommendation>>;

    fn strategy(&self) -> RecommendationStrategy;
}

/// Construct the configured recommender.
pub fn create_recommender(settings: &Settings, secrets: &Secrets) -> Result<Arc<dyn Recommender>> {
    let count = settings.recommendations.count;
    Ok(match settings.recommendations.strategy {
        RecommendationStrategy::Chunks => Arc::new(ChunkRecommender::new(count)),
        RecommendationStrategy::Videos => {
            let key = Secrets::require(&secrets.youtube_api_key, Secrets::YOUTUBE)?;
            Arc::new(YoutubeRecommender::new(
                &settings.youtube.base_url,
                &key,
                count,
                settings.general.timeout(),
            )?)
        }
    })
}
