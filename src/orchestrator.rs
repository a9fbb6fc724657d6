//! Pipeline orchestrator for Spotter.
//!
//! Sequences one question through embedding, retrieval, context assembly,
//! prompt rendering, generation and recommendation.

use crate::config::{Prompts, Secrets, Settings};
use crate::embedding::{create_embedder, Embedder};
use crate::error::{Result, SpotterError};
use crate::llm::{create_generator, Generator};
use crate::rag::assemble_context;
use crate::recommend::{create_recommender, Recommendation, Recommender};
use crate::vector_store::{create_vector_store, RetrievedMatch, VectorStore};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Embedding plus nearest-neighbour lookup, shared by answering and search.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, vector_store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            vector_store,
        }
    }

    /// Build the configured embedder and vector store.
    pub async fn from_settings(settings: &Settings, secrets: &Secrets) -> Result<Self> {
        let embedder = create_embedder(settings, secrets)?;
        let vector_store = create_vector_store(settings, secrets, embedder.as_ref()).await?;
        Ok(Self::new(embedder, vector_store))
    }

    /// Embed a question and fetch its nearest matches.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedMatch>> {
        validate_query(query)?;
        let embedding = self.embedder.embed(query).await?;
        let matches = self.vector_store.query(&embedding, top_k).await?;
        debug!("Retrieved {} matches", matches.len());
        Ok(matches)
    }
}

/// The question-answering pipeline. Stateless between turns.
pub struct Pipeline {
    retriever: Retriever,
    generator: Arc<dyn Generator>,
    recommender: Arc<dyn Recommender>,
    prompts: Prompts,
    top_k: usize,
}

impl Pipeline {
    /// Create a pipeline from explicit service handles.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        generator: Arc<dyn Generator>,
        recommender: Arc<dyn Recommender>,
        prompts: Prompts,
        top_k: usize,
    ) -> Self {
        Self {
            retriever: Retriever::new(embedder, vector_store),
            generator,
            recommender,
            prompts,
            top_k,
        }
    }

    /// Wire up the configured services. Each is constructed exactly once.
    pub async fn from_settings(settings: &Settings, secrets: &Secrets) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let retriever = Retriever::from_settings(settings, secrets).await?;
        let generator = create_generator(settings, secrets)?;
        let recommender = create_recommender(settings, secrets)?;

        info!(
            "Pipeline ready (top_k={}, recommendations={})",
            settings.vector_store.top_k,
            recommender.strategy()
        );

        Ok(Self {
            retriever,
            generator,
            recommender,
            prompts,
            top_k: settings.vector_store.top_k,
        })
    }

    /// Model used for answers.
    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Answer one question.
    ///
    /// Generation and recommendation run concurrently once retrieval is done;
    /// a failure in either aborts the turn. An empty retrieval still produces
    /// a prompt and a generation call. The query is passed on exactly as
    /// given.
    #[instrument(skip(self))]
    pub async fn answer(&self, query: &str) -> Result<TurnResult> {
        validate_query(query)?;
        let started = Instant::now();

        let matches = self.retriever.search(query, self.top_k).await?;
        let context = assemble_context(&matches);
        let prompt = self.prompts.coach_prompt(query, &context);

        let (answer, recommendations) = tokio::try_join!(
            self.generator.generate(&prompt),
            self.recommender.recommend(query, &matches),
        )?;

        let elapsed = started.elapsed();
        info!(
            "Answered in {:.2}s with {} recommendations",
            elapsed.as_secs_f64(),
            recommendations.len()
        );

        Ok(TurnResult {
            answer,
            recommendations,
            elapsed,
            matches,
        })
    }
}

fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(SpotterError::InvalidInput("Question cannot be empty".to_string()));
    }
    Ok(())
}

/// Result of one answered question.
#[derive(Debug, Clone)]
pub struct TurnResult {
    /// Generated answer text.
    pub answer: String,
    /// Up to N recommendations.
    pub recommendations: Vec<Recommendation>,
    /// Wall-clock time from embedding to the last of generation/recommendation.
    pub elapsed: Duration,
    /// Retrieval results the answer was grounded on.
    pub matches: Vec<RetrievedMatch>,
}

impl TurnResult {
    pub fn response_time_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::vector_store::{IndexRecord, MemoryVectorStore};

    #[tokio::test]
    async fn test_warm_up_scenario() {
        let generator = Arc::new(RecordingGenerator::default());
        let pipeline = pipeline(
            vec![
                RetrievedMatch::new("1", 0.9).with_content("Warm up with dynamic stretches."),
                RetrievedMatch::new("2", 0.8).with_content("Increase heart rate gradually."),
            ],
            generator.clone(),
        );

        let query = "How should I warm up before a workout?";
        let result = pipeline.answer(query).await.unwrap();

        assert_eq!(result.answer, "Keep your core tight.");
        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(query));
        assert!(prompts[0]
            .contains("Warm up with dynamic stretches. Increase heart rate gradually."));
        // No titles, so nothing qualifies as reading material.
        assert!(result.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_empty_retrieval_still_generates() {
        let generator = Arc::new(RecordingGenerator::default());
        let pipeline = pipeline(Vec::new(), generator.clone());

        let result = pipeline.answer("Is cardio bad for gains?").await.unwrap();

        assert_eq!(result.answer, "Keep your core tight.");
        assert!(result.matches.is_empty());
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("Context: \n"));
    }

    #[tokio::test]
    async fn test_ranking_preserved_into_context() {
        let generator = Arc::new(RecordingGenerator::default());
        let matches: Vec<_> = (0..6)
            .map(|i| {
                RetrievedMatch::new(format!("m{}", i), 0.9 - i as f32 * 0.1)
                    .with_title(format!("T{}", i))
                    .with_content(format!("c{}", i))
            })
            .collect();
        let pipeline = pipeline(matches.clone(), generator.clone());

        let result = pipeline.answer("order?").await.unwrap();

        assert_eq!(result.matches, matches);
        assert!(generator.prompts.lock().unwrap()[0].contains("c0 c1 c2 c3 c4 c5"));
        let titles: Vec<_> = result.recommendations.iter().map(|r| r.title()).collect();
        assert_eq!(titles, vec!["T0", "T1", "T2"]);
    }

    #[tokio::test]
    async fn test_generation_failure_aborts_turn() {
        let generator = Arc::new(RecordingGenerator {
            fail: true,
            ..Default::default()
        });
        let pipeline = pipeline(Vec::new(), generator);

        let err = pipeline.answer("deadlift cues").await.unwrap_err();
        assert!(matches!(err, SpotterError::Llm(_)));
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let generator = Arc::new(RecordingGenerator::default());
        let pipeline = pipeline(Vec::new(), generator.clone());

        let err = pipeline.answer("   ").await.unwrap_err();
        assert!(matches!(err, SpotterError::InvalidInput(_)));
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_against_memory_store() {
        let store = Arc::new(MemoryVectorStore::new());
        store
            .upsert(&[IndexRecord {
                id: "r0".to_string(),
                values: vec![1.0, 0.0, 0.0],
                title: "Posture".to_string(),
                content: "Face pulls fix rounded shoulders.".to_string(),
                source: "posture.pdf".to_string(),
            }])
            .await
            .unwrap();

        let retriever = Retriever::new(Arc::new(FixedEmbedder), store);

        let matches = retriever.search("desk posture", 6).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title.as_deref(), Some("Posture"));

        let err = retriever.search("  ", 6).await.unwrap_err();
        assert!(matches!(err, SpotterError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_query_reaches_prompt_verbatim() {
        let generator = Arc::new(RecordingGenerator::default());
        let pipeline = pipeline(Vec::new(), generator.clone());

        pipeline.answer("  Knee pain on lunges?  ").await.unwrap();

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("User Query:   Knee pain on lunges?  \n"));
    }

    #[tokio::test]
    async fn test_memory_provider_serves_ingested_records() {
        let dir = tempfile::tempdir().unwrap();
        crate::ingest::write_record(
            &crate::ingest::PdfRecord {
                file_name: "grip.pdf".to_string(),
                title: "Grip Strength".to_string(),
                author: "N/A".to_string(),
                creation_date: "N/A".to_string(),
                subject: "N/A".to_string(),
                keywords: "N/A".to_string(),
                text: "Farmer carries build grip.".to_string(),
            },
            dir.path(),
        )
        .unwrap();

        let mut settings = Settings::default();
        settings.vector_store.provider = crate::config::VectorStoreProvider::Memory;
        settings.ingest.output_dir = dir.path().to_string_lossy().into_owned();
        let store = create_vector_store(&settings, &Secrets::default(), &FixedEmbedder)
            .await
            .unwrap();
        let retriever = Retriever::new(Arc::new(FixedEmbedder), store);

        let matches = retriever.search("How do I improve grip?", 6).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "grip-0");
        assert_eq!(matches[0].content.as_deref(), Some("Farmer carries build grip."));
    }
}
