//! Post generation orchestrator.
//!
//! [`PostService::generate_post`] is the single place where pipeline errors
//! become a failed [`GenerationResult`]; every component below it propagates.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use wellpost_core::PromptTemplateRegistry;

use crate::backend::TextBackend;
use crate::error::{BackendError, PipelineError};
use crate::generator::GeneratorFactory;
use crate::parser::{parse_response, ParsedPost};
use crate::settings::PipelineSettings;
use crate::topic::TopicAnalyzer;

fn default_user_id() -> String {
    "anonymous".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostRequest {
    pub topic: String,
    /// Raw selector, validated against the supported platforms per request.
    pub platform: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

impl PostRequest {
    #[must_use]
    pub fn new(topic: &str, platform: &str) -> Self {
        Self {
            topic: topic.to_string(),
            platform: platform.to_string(),
            user_id: default_user_id(),
        }
    }
}

/// Why a generation failed, for transports that map failures to status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnsupportedPlatform,
    Configuration,
    BackendUnavailable,
}

impl From<&PipelineError> for FailureKind {
    fn from(err: &PipelineError) -> Self {
        match err {
            PipelineError::UnsupportedPlatform(_) => FailureKind::UnsupportedPlatform,
            PipelineError::Configuration(_) => FailureKind::Configuration,
            PipelineError::BackendUnavailable(_) => FailureKind::BackendUnavailable,
        }
    }
}

/// Outcome of one generation call.
///
/// On failure `content` and `body` are empty and `error` is non-empty; on
/// success `content` is non-empty and `error` is empty.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub content: String,
    pub subject_line: Option<String>,
    pub body: String,
    pub platform: String,
    pub topic: String,
    pub success: bool,
    pub error: String,
    #[serde(skip)]
    pub failure: Option<FailureKind>,
}

impl GenerationResult {
    fn succeeded(content: String, parsed: ParsedPost, platform: String, topic: String) -> Self {
        Self {
            content,
            subject_line: parsed.subject_line,
            body: parsed.body,
            platform,
            topic,
            success: true,
            error: String::new(),
            failure: None,
        }
    }

    fn failed(request: &PostRequest, err: &PipelineError) -> Self {
        Self {
            content: String::new(),
            subject_line: None,
            body: String::new(),
            platform: request.platform.clone(),
            topic: request.topic.clone(),
            success: false,
            error: err.user_message(),
            failure: Some(FailureKind::from(err)),
        }
    }
}

#[derive(Clone)]
pub struct PostService {
    analyzer: TopicAnalyzer,
    factory: GeneratorFactory,
    settings: Arc<PipelineSettings>,
}

impl PostService {
    #[must_use]
    pub fn new(
        backend: Arc<dyn TextBackend>,
        registry: Arc<PromptTemplateRegistry>,
        settings: Arc<PipelineSettings>,
    ) -> Self {
        Self {
            analyzer: TopicAnalyzer::new(Arc::clone(&backend)),
            factory: GeneratorFactory::new(registry, backend, settings.post_temperature),
            settings,
        }
    }

    /// Validate, normalize the topic, generate, parse. Never fails: errors
    /// come back as a result with `success == false`.
    pub async fn generate_post(&self, request: &PostRequest) -> GenerationResult {
        match self.try_generate(request).await {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(
                    platform = %request.platform,
                    topic = %request.topic,
                    user_id = %request.user_id,
                    error = %err,
                    "post generation failed"
                );
                GenerationResult::failed(request, &err)
            }
        }
    }

    async fn try_generate(&self, request: &PostRequest) -> Result<GenerationResult, PipelineError> {
        self.settings.ensure_credentials()?;
        let generator = self.factory.create(&request.platform)?;

        let topic = self.analyzer.extract_topic(&request.topic).await?;
        let content = generator.generate(&topic).await?;
        if content.trim().is_empty() {
            return Err(BackendError::Other("backend returned an empty post".to_string()).into());
        }

        let parsed = parse_response(&content);
        tracing::info!(
            platform = %generator.platform(),
            topic = %topic,
            user_id = %request.user_id,
            has_subject = parsed.subject_line.is_some(),
            "post generation succeeded"
        );
        Ok(GenerationResult::succeeded(
            content,
            parsed,
            generator.platform().to_string(),
            topic,
        ))
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
