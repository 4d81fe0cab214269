//! Image prompt construction, generation, and local storage.
//!
//! Download is the only retried operation in the pipeline. Exhausted retries
//! or storage failures degrade to a placeholder path instead of an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use wellpost_core::Platform;

use crate::backend::ImageBackend;
use crate::error::BackendError;
use crate::retry::retry_with_backoff;

pub const MAX_DOWNLOAD_ATTEMPTS: u32 = 3;
pub const PLACEHOLDER_FILE_NAME: &str = "placeholder.png";

const SAFE_TOPIC_MAX_CHARS: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct ImageAsset {
    /// `None` when the image request itself failed; the placeholder path when
    /// download or storage failed.
    pub local_path: Option<PathBuf>,
    pub source_topic: String,
    pub platform: Platform,
    pub created_at: DateTime<Utc>,
}

pub struct ImageRequestBuilder;

impl ImageRequestBuilder {
    /// Calming palette and nature motifs. A non-empty subject adds an
    /// exact-text overlay instruction with the text spelled letter by letter;
    /// the backend may still misspell it.
    #[must_use]
    pub fn build_prompt(topic: &str, platform: Platform, subject_line: &str) -> String {
        let overlay = if subject_line.is_empty() {
            "No text overlay.".to_string()
        } else {
            let spelled = subject_line
                .chars()
                .map(String::from)
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                "Include elegant text overlay with EXACTLY these words '{subject_line}', spell each letter correctly: {spelled}, in beautiful, readable calming typography. Double-check spelling before rendering."
            )
        };

        format!(
            "Create a serene, holistic health image for {topic}.
Style: Soft, calming colors (greens, golds, whites), natural elements, peaceful atmosphere, spiritual wellness vibe.
Include: nature elements like sunlight, water, plants, peaceful setting.
{overlay}
CRITICAL: Verify spelling accuracy. Avoid any spelling errors or typos.
Aesthetic: Minimalist, zen-like, Instagram-worthy for {platform}."
        )
    }
}

#[derive(Clone)]
pub struct ImageService {
    backend: Arc<dyn ImageBackend>,
    images_dir: PathBuf,
    download_timeout: Duration,
    backoff_base_ms: u64,
}

impl ImageService {
    #[must_use]
    pub fn new(
        backend: Arc<dyn ImageBackend>,
        images_dir: PathBuf,
        download_timeout: Duration,
        backoff_base_ms: u64,
    ) -> Self {
        Self {
            backend,
            images_dir,
            download_timeout,
            backoff_base_ms,
        }
    }

    #[must_use]
    pub fn placeholder_path(&self) -> PathBuf {
        self.images_dir.join(PLACEHOLDER_FILE_NAME)
    }

    /// Requests one image (single attempt) and stores it. Never fails.
    pub async fn generate_image(
        &self,
        topic: &str,
        platform: Platform,
        subject_line: Option<&str>,
    ) -> ImageAsset {
        let prompt = ImageRequestBuilder::build_prompt(topic, platform, subject_line.unwrap_or(""));
        tracing::info!(%platform, topic, "requesting image");

        let local_path = match self.backend.request_image(&prompt).await {
            Ok(url) => Some(self.fetch_and_store(&url, topic, platform).await),
            Err(err) => {
                tracing::error!(%platform, topic, error = %err, "image generation failed");
                None
            }
        };

        ImageAsset {
            local_path,
            source_topic: topic.to_string(),
            platform,
            created_at: Utc::now(),
        }
    }

    /// Downloads `image_url` with up to [`MAX_DOWNLOAD_ATTEMPTS`] attempts and
    /// writes it under the images directory. Returns the placeholder path
    /// when every attempt fails or the write fails.
    pub async fn fetch_and_store(&self, image_url: &str, topic: &str, platform: Platform) -> PathBuf {
        let backend = self.backend.as_ref();
        let timeout = self.download_timeout;
        let downloaded =
            retry_with_backoff(MAX_DOWNLOAD_ATTEMPTS, self.backoff_base_ms, || async move {
                tokio::time::timeout(timeout, backend.download(image_url, timeout))
                    .await
                    .unwrap_or_else(|_| {
                        Err(BackendError::Connection(format!(
                            "download timed out after {}s",
                            timeout.as_secs()
                        )))
                    })
            })
            .await;

        let bytes = match downloaded {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(
                    %platform,
                    topic,
                    error = %err,
                    "image download failed, using placeholder"
                );
                return self.placeholder_path();
            }
        };

        let path = self
            .images_dir
            .join(image_file_name(topic, platform, Utc::now()));
        if let Err(err) = store(&self.images_dir, &path, &bytes).await {
            tracing::error!(
                path = %path.display(),
                error = %err,
                "image write failed, using placeholder"
            );
            return self.placeholder_path();
        }

        tracing::info!(path = %path.display(), bytes = bytes.len(), "image saved");
        path
    }
}

async fn store(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(path, bytes).await
}

/// `{platform}_{safe_topic}_{YYYYmmdd_HHMMSS}.png`
pub(crate) fn image_file_name(topic: &str, platform: Platform, now: DateTime<Utc>) -> String {
    let filtered: String = topic
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let safe_topic: String = filtered.trim_end().chars().take(SAFE_TOPIC_MAX_CHARS).collect();
    format!("{platform}_{safe_topic}_{}.png", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
#[path = "image_test.rs"]
mod tests;
