//! End-to-end pipeline runs against a mocked OpenAI API.

use std::collections::HashMap;
use std::env::VarError;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wellpost_core::{build_app_config, Platform};
use wellpost_pipeline::error::CONNECTION_HINT;
use wellpost_pipeline::{FailureKind, Pipeline, PostRequest};

fn chat_body(content: &str) -> serde_json::Value {
    json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
}

fn pipeline(server: &MockServer, images_dir: &std::path::Path, api_key: &str) -> Pipeline {
    let base_url = server.uri();
    let images_dir = images_dir.display().to_string();
    let vars: HashMap<&str, &str> = HashMap::from([
        ("OPENAI_API_KEY", api_key),
        ("WELLPOST_OPENAI_BASE_URL", base_url.as_str()),
        ("WELLPOST_IMAGES_DIR", images_dir.as_str()),
        ("WELLPOST_IMAGE_RETRY_BACKOFF_MS", "0"),
        ("WELLPOST_IMAGE_DOWNLOAD_TIMEOUT_SECS", "5"),
    ]);
    let config = build_app_config(|key| {
        vars.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    })
    .expect("config");
    Pipeline::from_app_config(&config).expect("pipeline")
}

#[tokio::test]
async fn generates_post_through_openai() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Return only the topic name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(" sleep troubles ")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Generate post about: sleep troubles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(
            "Subject: Rest Restored\nProfessional body text...",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline(&server, dir.path(), "sk-test");
    let result = pipeline
        .generate_post(&PostRequest::new("sleep troubles", "linkedin"))
        .await;

    assert!(result.success, "{result:?}");
    assert_eq!(result.topic, "sleep troubles");
    assert_eq!(result.subject_line.as_deref(), Some("Rest Restored"));
    assert_eq!(result.body, "Professional body text...");
}

#[tokio::test]
async fn padded_key_is_sent_trimmed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-padded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("Subject: Calm\nBody")))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline(&server, dir.path(), "  sk-padded \n");
    let result = pipeline
        .generate_post(&PostRequest::new("stress", "instagram"))
        .await;

    assert!(result.success, "{result:?}");
}

#[tokio::test]
async fn rejected_key_yields_connection_hint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline(&server, dir.path(), "sk-wrong");
    let result = pipeline
        .generate_post(&PostRequest::new("sleep troubles", "linkedin"))
        .await;

    assert!(!result.success);
    assert!(result.content.is_empty());
    assert_eq!(result.error, CONNECTION_HINT);
    assert_eq!(result.failure, Some(FailureKind::BackendUnavailable));
}

#[tokio::test]
async fn placeholder_key_never_reaches_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline(&server, dir.path(), "your_openai_api_key_here");
    let result = pipeline
        .generate_post(&PostRequest::new("sleep", "instagram"))
        .await;

    assert!(!result.success);
    assert_eq!(result.failure, Some(FailureKind::Configuration));
    assert!(pipeline.trending_topics().await.is_err());
}

#[tokio::test]
async fn image_is_downloaded_after_transient_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "url": format!("{}/assets/calm.png", server.uri()) }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assets/calm.png"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assets/calm.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline(&server, dir.path(), "sk-test");
    let asset = pipeline
        .generate_image("stress relief", Platform::Instagram, Some("Breathe"))
        .await
        .expect("credentials present");

    let path = asset.local_path.expect("stored");
    assert_ne!(path, dir.path().join("placeholder.png"));
    assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
}

#[tokio::test]
async fn image_download_that_never_succeeds_uses_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "url": format!("{}/assets/gone.png", server.uri()) }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assets/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline(&server, dir.path(), "sk-test");
    let asset = tokio::time::timeout(
        Duration::from_secs(10),
        pipeline.generate_image("sleep", Platform::Linkedin, None),
    )
    .await
    .expect("bounded")
    .expect("credentials present");

    assert_eq!(asset.local_path, Some(dir.path().join("placeholder.png")));
}
