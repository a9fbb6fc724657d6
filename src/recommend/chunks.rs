//! Reading recommendations taken from the retrieved chunks.

use super::{Recommendation, Recommender};
use crate::config::RecommendationStrategy;
use crate::error::Result;
use crate::vector_store::RetrievedMatch;
use async_trait::async_trait;

/// Recommends the first `count` matches carrying both a title and content.
pub struct ChunkRecommender {
    count: usize,
}

impl ChunkRecommender {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    /// Select recommendations without any I/O.
    pub fn select(&self, matches: &[RetrievedMatch]) -> Vec<Recommendation> {
        matches
            .iter()
            .filter_map(|m| match (m.title.as_deref(), m.content.as_deref()) {
                (Some(title), Some(content)) if !title.is_empty() && !content.is_empty() => {
                    Some(Recommendation::Reading {
                        title: title.to_string(),
                        content: content.to_string(),
                    })
                }
                _ => None,
            })
            .take(self.count)
            .collect()
    }
}

#[async_trait]
impl Recommender for ChunkRecommender {
    async fn recommend(
        &self,
        _query: &str,
        matches: &[RetrievedMatch],
    ) -> Result<Vec<Recommendation>> {
        Ok(self.select(matches))
    }

    fn strategy(&self) -> RecommendationStrategy {
        RecommendationStrategy::Chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(id: &str) -> RetrievedMatch {
        RetrievedMatch::new(id, 0.5)
            .with_title(format!("title {}", id))
            .with_content(format!("content {}", id))
    }

    fn titles(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.title()).collect()
    }

    #[test]
    fn test_takes_first_n_in_order() {
        let matches: Vec<_> = ["a", "b", "c", "d", "e"].iter().map(|id| full(id)).collect();
        let recs = ChunkRecommender::new(3).select(&matches);
        assert_eq!(titles(&recs), vec!["title a", "title b", "title c"]);
    }

    #[test]
    fn test_fewer_than_n_returns_all_qualifying() {
        let matches = vec![
            full("a"),
            RetrievedMatch::new("b", 0.4).with_content("no title"),
            full("c"),
        ];
        let recs = ChunkRecommender::new(3).select(&matches);
        assert_eq!(titles(&recs), vec!["title a", "title c"]);
    }

    #[test]
    fn test_skips_incomplete_matches_before_later_ones() {
        let matches = vec![
            RetrievedMatch::new("x", 0.9).with_title("only title"),
            RetrievedMatch::new("y", 0.8),
            RetrievedMatch::new("z", 0.7).with_title("").with_content("empty title"),
            full("a"),
        ];
        let recs = ChunkRecommender::new(1).select(&matches);
        assert_eq!(
            recs,
            vec![Recommendation::Reading {
                title: "title a".to_string(),
                content: "content a".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_recommend_ignores_query() {
        let recs = ChunkRecommender::new(3)
            .recommend("anything", &[full("a")])
            .await
            .unwrap();
        assert_eq!(recs.len(), 1);
    }
}
