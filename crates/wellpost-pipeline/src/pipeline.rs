//! Wires every pipeline service over shared backends and settings.

use std::sync::Arc;

use wellpost_core::{AppConfig, Platform, PromptTemplateRegistry};

use crate::backend::{ImageBackend, OpenAiBackend, TextBackend};
use crate::editor::{EditRequest, PostEditingService};
use crate::error::PipelineError;
use crate::image::{ImageAsset, ImageService};
use crate::service::{GenerationResult, PostRequest, PostService};
use crate::settings::PipelineSettings;
use crate::trending::TrendingTopicsService;

/// Entry point for transports. Everything except [`Pipeline::generate_post`]
/// checks credentials first and returns [`PipelineError`] on failure.
#[derive(Clone)]
pub struct Pipeline {
    posts: PostService,
    editor: PostEditingService,
    images: ImageService,
    trending: TrendingTopicsService,
    registry: Arc<PromptTemplateRegistry>,
    settings: Arc<PipelineSettings>,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        text: Arc<dyn TextBackend>,
        images: Arc<dyn ImageBackend>,
        registry: Arc<PromptTemplateRegistry>,
        settings: PipelineSettings,
    ) -> Self {
        let settings = Arc::new(settings);
        Self {
            posts: PostService::new(Arc::clone(&text), Arc::clone(&registry), Arc::clone(&settings)),
            editor: PostEditingService::new(Arc::clone(&text)),
            images: ImageService::new(
                images,
                settings.images_dir.clone(),
                settings.image_download_timeout,
                settings.image_retry_backoff_ms,
            ),
            trending: TrendingTopicsService::new(text),
            registry,
            settings,
        }
    }

    /// OpenAI-backed pipeline with profiles from `WELLPOST_PROFILES_PATH`
    /// or the built-in set.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] if the profiles file is
    /// invalid or the OpenAI client cannot be built.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let registry = PromptTemplateRegistry::from_optional_path(config.profiles_path.as_deref())
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;
        let backend = Arc::new(
            OpenAiBackend::from_app_config(config)
                .map_err(|e| PipelineError::Configuration(e.to_string()))?,
        );
        Ok(Self::new(
            backend.clone(),
            backend,
            Arc::new(registry),
            PipelineSettings::from_app_config(config),
        ))
    }

    #[must_use]
    pub fn registry(&self) -> &PromptTemplateRegistry {
        &self.registry
    }

    #[must_use]
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub async fn generate_post(&self, request: &PostRequest) -> GenerationResult {
        self.posts.generate_post(request).await
    }

    /// # Errors
    ///
    /// Configuration or backend failure.
    pub async fn edit_post(&self, request: &EditRequest) -> Result<String, PipelineError> {
        self.settings.ensure_credentials()?;
        Ok(self.editor.edit_post(request).await?)
    }

    /// # Errors
    ///
    /// Configuration or backend failure.
    pub async fn suggest_improvements(
        &self,
        body: &str,
        platform: Platform,
    ) -> Result<Vec<String>, PipelineError> {
        self.settings.ensure_credentials()?;
        Ok(self.editor.suggest_improvements(body, platform).await?)
    }

    /// Backend failures degrade inside the returned asset.
    ///
    /// # Errors
    ///
    /// Configuration failure only.
    pub async fn generate_image(
        &self,
        topic: &str,
        platform: Platform,
        subject_line: Option<&str>,
    ) -> Result<ImageAsset, PipelineError> {
        self.settings.ensure_credentials()?;
        Ok(self.images.generate_image(topic, platform, subject_line).await)
    }

    /// # Errors
    ///
    /// Configuration or backend failure.
    pub async fn trending_topics(&self) -> Result<Vec<String>, PipelineError> {
        self.settings.ensure_credentials()?;
        Ok(self.trending.trending_topics().await?)
    }

    /// # Errors
    ///
    /// Configuration or backend failure.
    pub async fn random_trending_topic(&self) -> Result<String, PipelineError> {
        self.settings.ensure_credentials()?;
        Ok(self.trending.random_trending_topic().await?)
    }
}
