//! Scripted backends for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::{ImageBackend, TextBackend};
use crate::error::BackendError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

/// Replays queued replies in order and records every call.
#[derive(Default)]
pub(crate) struct ScriptedText {
    replies: Mutex<VecDeque<Result<String, BackendError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedText {
    pub fn with_replies(replies: Vec<Result<String, BackendError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(replies: &[&str]) -> Self {
        Self::with_replies(replies.iter().map(|r| Ok((*r).to_string())).collect())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextBackend for ScriptedText {
    async fn invoke(
        &self,
        system_instruction: &str,
        user_message: &str,
        temperature: f32,
    ) -> Result<String, BackendError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: system_instruction.to_string(),
            user: user_message.to_string(),
            temperature,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Other("no scripted reply left".to_string())))
    }
}

/// Image backend whose downloads fail `failures` times before succeeding.
pub(crate) struct FlakyImages {
    pub url: Result<String, ()>,
    pub failures: u32,
    pub bytes: Vec<u8>,
    pub prompts: Mutex<Vec<String>>,
    pub downloads: AtomicU32,
}

impl FlakyImages {
    pub fn new(failures: u32) -> Self {
        Self {
            url: Ok("https://cdn.example.com/generated.png".to_string()),
            failures,
            bytes: vec![0x89, b'P', b'N', b'G'],
            prompts: Mutex::new(Vec::new()),
            downloads: AtomicU32::new(0),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            url: Err(()),
            ..Self::new(0)
        }
    }

    pub fn download_count(&self) -> u32 {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageBackend for FlakyImages {
    async fn request_image(&self, prompt: &str) -> Result<String, BackendError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.url
            .clone()
            .map_err(|()| BackendError::Auth("Incorrect API key provided".to_string()))
    }

    async fn download(&self, _url: &str, _timeout: Duration) -> Result<Vec<u8>, BackendError> {
        let n = self.downloads.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.failures {
            Err(BackendError::Connection(format!("download attempt {n} failed")))
        } else {
            Ok(self.bytes.clone())
        }
    }
}
