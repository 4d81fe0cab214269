use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use tower::ServiceExt;
use wellpost_core::PromptTemplateRegistry;
use wellpost_pipeline::{ImageBackend, PipelineSettings, TextBackend};

use super::*;

struct QueuedText(Mutex<VecDeque<Result<String, BackendError>>>);

impl QueuedText {
    fn new(replies: Vec<Result<String, BackendError>>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(replies.into())))
    }
}

#[async_trait]
impl TextBackend for QueuedText {
    async fn invoke(&self, _: &str, _: &str, _: f32) -> Result<String, BackendError> {
        self.0
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Other("no reply queued".into())))
    }
}

struct StaticImages;

#[async_trait]
impl ImageBackend for StaticImages {
    async fn request_image(&self, _prompt: &str) -> Result<String, BackendError> {
        Ok("https://cdn.example.com/generated.png".into())
    }

    async fn download(&self, _url: &str, _timeout: Duration) -> Result<Vec<u8>, BackendError> {
        Ok(vec![1, 2, 3])
    }
}

fn app_with(
    replies: Vec<Result<String, BackendError>>,
    settings: PipelineSettings,
    access: ApiAccess,
) -> Router {
    let pipeline = Pipeline::new(
        QueuedText::new(replies),
        Arc::new(StaticImages),
        Arc::new(PromptTemplateRegistry::builtin()),
        settings,
    );
    build_app(
        AppState {
            pipeline: Arc::new(pipeline),
            mail_recipient: Some("doc@example.com".into()),
        },
        access,
    )
}

fn app(replies: Vec<Result<String, BackendError>>) -> Router {
    app_with(
        replies,
        PipelineSettings::default(),
        ApiAccess::Open,
    )
}

fn ok(reply: &str) -> Result<String, BackendError> {
    Ok(reply.to_string())
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("validation_error", StatusCode::BAD_REQUEST),
        ("unauthorized", StatusCode::UNAUTHORIZED),
        ("configuration_error", StatusCode::SERVICE_UNAVAILABLE),
        ("backend_unavailable", StatusCode::BAD_GATEWAY),
        ("anything_else", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "msg").into_response();
        assert_eq!(response.status(), status, "{code}");
    }
}

#[tokio::test]
async fn health_reports_ok_with_credentials() {
    let response = app(vec![]).oneshot(get("/api/v1/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["openai_key"], true);
}

#[tokio::test]
async fn health_reports_degraded_without_credentials() {
    let settings = PipelineSettings {
        credential_error: Some("missing required environment variable: OPENAI_API_KEY".into()),
        ..PipelineSettings::default()
    };
    let app = app_with(vec![], settings, ApiAccess::Open);

    let response = app.oneshot(get("/api/v1/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "degraded");
    assert_eq!(json["data"]["openai_key"], false);
}

#[tokio::test]
async fn request_id_header_is_echoed() {
    let request = Request::builder()
        .uri("/api/v1/health")
        .header("x-request-id", "req-abc")
        .body(Body::empty())
        .unwrap();

    let response = app(vec![]).oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-abc");
    let json = json_body(response).await;
    assert_eq!(json["meta"]["request_id"], "req-abc");
}

#[tokio::test]
async fn platforms_lists_every_profile() {
    let response = app(vec![]).oneshot(get("/api/v1/platforms")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let items = json["data"].as_array().expect("array");
    assert_eq!(items.len(), 3);
    let linkedin = items
        .iter()
        .find(|i| i["platform"] == "linkedin")
        .expect("linkedin");
    assert_eq!(linkedin["max_length"], 3000);
    assert_eq!(linkedin["hashtag_limit"], 5);
    assert_eq!(linkedin["style"], "professional");
}

#[tokio::test]
async fn generate_post_returns_parsed_result() {
    let app = app(vec![
        ok("sleep troubles"),
        ok("Subject: Rest Restored\nProfessional body text..."),
    ]);

    let response = app
        .oneshot(post_json(
            "/api/v1/posts",
            &serde_json::json!({ "topic": "sleep troubles", "platform": "linkedin" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["success"], true);
    assert_eq!(json["data"]["subject_line"], "Rest Restored");
    assert_eq!(json["data"]["body"], "Professional body text...");
    assert_eq!(json["data"]["error"], "");
    assert!(json["data"].get("failure").is_none());
}

#[tokio::test]
async fn generate_post_rejects_unknown_platform() {
    let response = app(vec![])
        .oneshot(post_json(
            "/api/v1/posts",
            &serde_json::json!({ "topic": "sleep", "platform": "myspace" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("myspace"));
}

#[tokio::test]
async fn generate_post_maps_backend_auth_failure_to_bad_gateway() {
    let app = app(vec![Err(BackendError::Auth("Incorrect API key".into()))]);

    let response = app
        .oneshot(post_json(
            "/api/v1/posts",
            &serde_json::json!({ "topic": "sleep", "platform": "facebook" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "backend_unavailable");
    assert_eq!(
        json["error"]["message"],
        "OpenAI API connection failed. Check your API key and internet connection."
    );
}

#[tokio::test]
async fn generate_post_without_credentials_is_service_unavailable() {
    let settings = PipelineSettings {
        credential_error: Some("placeholder credential".into()),
        ..PipelineSettings::default()
    };
    let app = app_with(vec![], settings, ApiAccess::Open);

    let response = app
        .oneshot(post_json(
            "/api/v1/posts",
            &serde_json::json!({ "topic": "sleep", "platform": "instagram" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "configuration_error");
}

#[tokio::test]
async fn edit_returns_revised_post() {
    let app = app(vec![ok("A shorter, gentler post.")]);

    let response = app
        .oneshot(post_json(
            "/api/v1/posts/edit",
            &serde_json::json!({
                "post": "A long post.",
                "instruction": "make it shorter",
                "platform": "instagram"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["post"], "A shorter, gentler post.");
}

#[tokio::test]
async fn suggestions_are_capped_at_three() {
    let app = app(vec![ok("1. a\n2. b\n3. c\n4. d")]);

    let response = app
        .oneshot(post_json(
            "/api/v1/posts/suggestions",
            &serde_json::json!({ "post": "body", "platform": "linkedin" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["suggestions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn suggestions_reject_unknown_platform() {
    let response = app(vec![])
        .oneshot(post_json(
            "/api/v1/posts/suggestions",
            &serde_json::json!({ "post": "body", "platform": "LinkedIn" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn image_route_stores_asset() {
    let dir = tempfile::tempdir().unwrap();
    let settings = PipelineSettings {
        images_dir: dir.path().to_path_buf(),
        image_retry_backoff_ms: 0,
        ..PipelineSettings::default()
    };
    let app = app_with(vec![], settings, ApiAccess::Open);

    let response = app
        .oneshot(post_json(
            "/api/v1/images",
            &serde_json::json!({
                "topic": "immune harmony",
                "platform": "facebook",
                "subject_line": "Natural Strength"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let path = json["data"]["local_path"].as_str().expect("path");
    assert!(path.contains("facebook_immune harmony_"));
    assert_eq!(json["data"]["source_topic"], "immune harmony");
}

#[tokio::test]
async fn trending_route_returns_topics() {
    let app = app(vec![ok("Dengue prevention\nMonsoon immunity\n\n")]);

    let response = app.oneshot(get("/api/v1/topics/trending")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(
        json["data"]["topics"],
        serde_json::json!(["Dengue prevention", "Monsoon immunity"])
    );
}

#[tokio::test]
async fn trending_route_maps_rate_limit_to_bad_gateway() {
    let app = app(vec![Err(BackendError::RateLimited("quota".into()))]);

    let response = app.oneshot(get("/api/v1/topics/trending")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn mailto_route_builds_encoded_link() {
    let response = app(vec![])
        .oneshot(post_json(
            "/api/v1/delivery/mailto",
            &serde_json::json!({
                "post": "Rest well.",
                "topic": "sleep",
                "platform": "linkedin",
                "subject_line": "Rest Restored"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let link = json["data"]["link"].as_str().unwrap();
    assert!(link.starts_with("mailto:doc@example.com?subject=Generated%20Linkedin%20Post%20%2D%20sleep&body="));
    assert!(link.contains("Subject%20Line%3A%20Rest%20Restored"));
}

#[tokio::test]
async fn protected_routes_require_bearer_token_when_enabled() {
    let app = app_with(
        vec![],
        PipelineSettings::default(),
        ApiAccess::Keys(Arc::new(HashSet::from(["secret-key".to_string()]))),
    );

    let denied = app
        .clone()
        .oneshot(get("/api/v1/platforms"))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    let denied_id = denied.headers()["x-request-id"].to_str().unwrap().to_string();
    let json = json_body(denied).await;
    assert_eq!(json["error"]["code"], "unauthorized");
    assert_eq!(json["meta"]["request_id"], denied_id.as_str());

    let allowed = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/platforms")
                .header("authorization", "Bearer secret-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);

    let health = app.oneshot(get("/api/v1/health")).await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}
