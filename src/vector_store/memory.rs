//! In-memory vector store implementation.
//!
//! Useful for testing and small datasets.

use super::{cosine_similarity, IndexRecord, RetrievedMatch, VectorStore};
use crate::error::{Result, SpotterError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory vector store keyed by record ID.
pub struct MemoryVectorStore {
    records: RwLock<HashMap<String, IndexRecord>>,
}

impl MemoryVectorStore {
    /// Create a new, empty in-memory vector store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> SpotterError {
    SpotterError::VectorStore("memory store lock poisoned".to_string())
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedMatch>> {
        let records = self.records.read().map_err(|_| poisoned())?;

        let mut results: Vec<RetrievedMatch> = records
            .values()
            .map(|r| RetrievedMatch {
                id: r.id.clone(),
                score: cosine_similarity(vector, &r.values),
                title: Some(r.title.clone()).filter(|t| !t.is_empty()),
                content: Some(r.content.clone()).filter(|c| !c.is_empty()),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        results.truncate(top_k);

        Ok(results)
    }

    async fn upsert(&self, records: &[IndexRecord]) -> Result<usize> {
        let mut store = self.records.write().map_err(|_| poisoned())?;
        for record in records {
            store.insert(record.id.clone(), record.clone());
        }
        Ok(records.len())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().map_err(|_| poisoned())?.len())
    }
}
