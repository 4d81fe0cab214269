use std::sync::Arc;

use crate::backend::TextBackend;
use crate::error::BackendError;

const TOPIC_INSTRUCTION: &str = "\
Extract the main holistic health topic focusing on natural healing, homeopathy, immunity, hormones, mind-body balance, and emotional wellness.
Return only the topic name (e.g., 'natural stress relief', 'immune harmony', 'hormonal balance').";

pub const TOPIC_TEMPERATURE: f32 = 0.3;

/// Normalizes free-form input into a short canonical topic phrase.
#[derive(Clone)]
pub struct TopicAnalyzer {
    backend: Arc<dyn TextBackend>,
}

impl TopicAnalyzer {
    #[must_use]
    pub fn new(backend: Arc<dyn TextBackend>) -> Self {
        Self { backend }
    }

    /// One backend call; the reply is trimmed and otherwise returned as-is.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure unchanged.
    pub async fn extract_topic(&self, raw_input: &str) -> Result<String, BackendError> {
        tracing::debug!(raw_input, "extracting topic");
        let reply = self
            .backend
            .invoke(TOPIC_INSTRUCTION, raw_input, TOPIC_TEMPERATURE)
            .await?;
        let topic = reply.trim().to_string();
        tracing::info!(raw_input, topic = %topic, "topic extracted");
        Ok(topic)
    }
}
