//! Per-platform post generation.
//!
//! Every platform shares the invocation and logging path; they differ only
//! in the prompt, which is rendered from that platform's profile template.

use std::sync::Arc;

use wellpost_core::{Platform, PlatformProfile, PromptTemplateRegistry, UnsupportedPlatformError};

use crate::backend::TextBackend;
use crate::error::BackendError;
use crate::voice::HOLISTIC_VOICE;

#[derive(Clone)]
pub struct PostGenerator {
    profile: PlatformProfile,
    backend: Arc<dyn TextBackend>,
    temperature: f32,
}

impl PostGenerator {
    #[must_use]
    pub fn new(profile: PlatformProfile, backend: Arc<dyn TextBackend>, temperature: f32) -> Self {
        Self {
            profile,
            backend,
            temperature,
        }
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.profile.platform
    }

    #[must_use]
    pub fn build_prompt(&self, topic: &str) -> String {
        render_prompt(&self.profile, topic)
    }

    /// One outbound call. No retry, caching or dedup of repeated topics.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure unchanged.
    pub async fn generate(&self, topic: &str) -> Result<String, BackendError> {
        let platform = self.platform();
        tracing::info!(%platform, topic, "generating post");
        let prompt = self.build_prompt(topic);
        let content = self
            .backend
            .invoke(&prompt, &format!("Generate post about: {topic}"), self.temperature)
            .await?;
        tracing::info!(%platform, topic, chars = content.chars().count(), "post generated");
        Ok(content)
    }
}

fn render_prompt(profile: &PlatformProfile, topic: &str) -> String {
    let format_lines: String = profile
        .template
        .format_lines(profile.hashtag_limit)
        .iter()
        .map(|line| format!("- {line}\n"))
        .collect();
    format!(
        "{HOLISTIC_VOICE}\n\nTopic: {topic}\n\nFormat:\n{format_lines}\nStart with 'Subject: [your subject line]' then the post content.\nMax {} characters. Use {} tone.",
        profile.max_length, profile.template.tone
    )
}

/// Maps a platform selector to its generator. No default platform.
#[derive(Clone)]
pub struct GeneratorFactory {
    registry: Arc<PromptTemplateRegistry>,
    backend: Arc<dyn TextBackend>,
    temperature: f32,
}

impl GeneratorFactory {
    #[must_use]
    pub fn new(
        registry: Arc<PromptTemplateRegistry>,
        backend: Arc<dyn TextBackend>,
        temperature: f32,
    ) -> Self {
        Self {
            registry,
            backend,
            temperature,
        }
    }

    /// # Errors
    ///
    /// Returns [`UnsupportedPlatformError`] for anything other than
    /// `instagram`, `facebook` or `linkedin`.
    pub fn create(&self, platform: &str) -> Result<PostGenerator, UnsupportedPlatformError> {
        let profile = self.registry.profile_for_name(platform)?;
        Ok(PostGenerator::new(
            profile.clone(),
            Arc::clone(&self.backend),
            self.temperature,
        ))
    }

    #[must_use]
    pub fn for_platform(&self, platform: Platform) -> PostGenerator {
        PostGenerator::new(
            self.registry.profile_for(platform).clone(),
            Arc::clone(&self.backend),
            self.temperature,
        )
    }
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
