use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
}

impl<'a> ChatCompletionRequest<'a> {
    /// A two-message request: one system instruction and one user message.
    #[must_use]
    pub fn new(model: &'a str, system: &'a str, user: &'a str, temperature: f32) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    pub content: Option<String>,
}

/// Body of `POST /images/generations`.
#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub size: &'a str,
    pub quality: &'a str,
    pub n: u8,
}

impl<'a> ImageGenerationRequest<'a> {
    /// One standard-quality image.
    #[must_use]
    pub fn new(model: &'a str, prompt: &'a str, size: &'a str) -> Self {
        Self {
            model,
            prompt,
            size,
            quality: "standard",
            n: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageGenerationResponse {
    #[serde(default)]
    pub data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageData {
    pub url: Option<String>,
}

/// Error envelope: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}
