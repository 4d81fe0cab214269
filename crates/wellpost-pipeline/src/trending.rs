use std::sync::Arc;

use rand::seq::IndexedRandom;

use crate::backend::TextBackend;
use crate::error::BackendError;

pub const TRENDING_TEMPERATURE: f32 = 0.7;
pub const MAX_TRENDING_TOPICS: usize = 5;
pub const FALLBACK_TOPIC: &str = "Natural immunity for current health challenges";

const TRENDING_INSTRUCTION: &str = "\
You are a holistic homeopathic doctor analyzing latest health issues and talks in news in India.
Choose 5 homeopathic topics for latest health issues/talks in news in India focusing on:
- Current health challenges trending in Indian news
- Seasonal health concerns being discussed
- Popular wellness topics in Indian media
- Traditional remedies for current health issues
- Natural healing approaches for trending health problems

Return only topic names, one per line.";

const TRENDING_QUESTION: &str =
    "What are the latest health issues/talks in news in India that need homeopathic solutions?";

/// Suggests topical subjects to post about.
#[derive(Clone)]
pub struct TrendingTopicsService {
    backend: Arc<dyn TextBackend>,
}

impl TrendingTopicsService {
    #[must_use]
    pub fn new(backend: Arc<dyn TextBackend>) -> Self {
        Self { backend }
    }

    /// # Errors
    ///
    /// Propagates the backend failure unchanged.
    pub async fn trending_topics(&self) -> Result<Vec<String>, BackendError> {
        let reply = self
            .backend
            .invoke(TRENDING_INSTRUCTION, TRENDING_QUESTION, TRENDING_TEMPERATURE)
            .await?;
        let topics = parse_topics(&reply);
        tracing::info!(count = topics.len(), "trending topics fetched");
        Ok(topics)
    }

    /// One topic at random, or [`FALLBACK_TOPIC`] when the reply had none.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure unchanged.
    pub async fn random_trending_topic(&self) -> Result<String, BackendError> {
        let topics = self.trending_topics().await?;
        Ok(topics
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_else(|| FALLBACK_TOPIC.to_string()))
    }
}

fn parse_topics(reply: &str) -> Vec<String> {
    reply
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .take(MAX_TRENDING_TOPICS)
        .collect()
}
