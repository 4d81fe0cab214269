//! Post-generation pipeline for wellpost.
//!
//! Normalizes a free-form topic, renders a platform-specific prompt, calls the
//! text backend, and splits the reply into subject line and body. Editing,
//! improvement suggestions, image generation, trending topics, and mailto
//! delivery links sit beside the main flow and reuse the same backends.

pub mod backend;
pub mod delivery;
pub mod editor;
pub mod error;
pub mod generator;
pub mod image;
pub mod parser;
pub mod pipeline;
pub mod service;
pub mod settings;
pub mod topic;
pub mod trending;

mod retry;
mod voice;

#[cfg(test)]
mod test_support;

pub use backend::{ImageBackend, OpenAiBackend, TextBackend};
pub use delivery::{mailto_link, MailtoMessage};
pub use editor::{parse_suggestions, EditRequest, PostEditingService};
pub use error::{BackendError, PipelineError};
pub use generator::{GeneratorFactory, PostGenerator};
pub use image::{ImageAsset, ImageRequestBuilder, ImageService};
pub use parser::{parse_response, ParsedPost};
pub use pipeline::Pipeline;
pub use service::{FailureKind, GenerationResult, PostRequest, PostService};
pub use settings::PipelineSettings;
pub use topic::TopicAnalyzer;
pub use trending::TrendingTopicsService;
