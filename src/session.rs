//! Per-session chat state owned by the interactive front end.

use crate::error::Result;
use crate::orchestrator::{Pipeline, TurnResult};
use crate::recommend::Recommendation;
use serde::{Deserialize, Serialize};

/// Suggested opening questions.
pub const STARTER_PROMPTS: [&str; 4] = [
    "How important is meal timing when it comes to muscle gain?",
    "I sit at a desk all day. What exercises can help with posture?",
    "How can I prevent wrist pain during push-ups and planks?",
    "What are some lifestyle changes I can make to prevent love handles?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Recommendation>>,
    /// Seconds taken to produce an assistant turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
}

impl ChatTurn {
    fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
            recommendations: None,
            response_time: None,
        }
    }

    fn assistant(result: &TurnResult) -> Self {
        Self {
            role: Role::Assistant,
            content: result.answer.clone(),
            recommendations: Some(result.recommendations.clone()),
            response_time: Some(result.response_time_secs()),
        }
    }
}

/// Append-only transcript for one interactive session.
#[derive(Debug, Default)]
pub struct ChatSession {
    history: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one turn. The user and assistant turns are recorded together, and
    /// only when the pipeline succeeds.
    pub async fn ask(&mut self, pipeline: &Pipeline, query: &str) -> Result<&ChatTurn> {
        let result = pipeline.answer(query).await?;
        self.history.push(ChatTurn::user(query));
        self.history.push(ChatTurn::assistant(&result));
        Ok(&self.history[self.history.len() - 1])
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
