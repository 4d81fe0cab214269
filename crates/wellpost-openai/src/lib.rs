//! Minimal client for the OpenAI-compatible REST API: chat completions,
//! image generation, and download of generated image assets.

pub mod client;
pub mod error;
pub mod types;

pub use client::OpenAiClient;
pub use error::OpenAiError;
pub use types::{ChatCompletionRequest, ChatMessage, ImageGenerationRequest};
