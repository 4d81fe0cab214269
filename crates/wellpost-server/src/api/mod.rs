mod delivery;
mod images;
mod posts;
mod topics;

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use wellpost_core::{FormatStyle, Platform};
use wellpost_pipeline::{BackendError, FailureKind, Pipeline, PipelineError};

use crate::middleware::{propagate_request_id, require_api_key, ApiAccess, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// Pre-filled `to:` address for mailto links.
    pub mail_recipient: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    openai_key: bool,
}

#[derive(Debug, Serialize)]
struct PlatformItem {
    platform: Platform,
    title: &'static str,
    max_length: u32,
    hashtag_limit: u32,
    style: FormatStyle,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    pub(super) fn from_failure(request_id: String, kind: FailureKind, message: String) -> Self {
        let code = match kind {
            FailureKind::UnsupportedPlatform => "validation_error",
            FailureKind::Configuration => "configuration_error",
            FailureKind::BackendUnavailable => "backend_unavailable",
        };
        Self::new(request_id, code, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "configuration_error" => StatusCode::SERVICE_UNAVAILABLE,
            "backend_unavailable" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Logs and converts a pipeline failure for the given request.
pub(super) fn map_pipeline_error(request_id: String, error: &PipelineError) -> ApiError {
    match error {
        PipelineError::BackendUnavailable(BackendError::RateLimited(_)) => {
            tracing::warn!(error = %error, "backend rate limited request");
        }
        PipelineError::UnsupportedPlatform(_) => {}
        _ => tracing::error!(error = %error, "pipeline request failed"),
    }
    ApiError::from_failure(request_id, FailureKind::from(error), error.user_message())
}

/// Parses a platform selector from a request body.
pub(super) fn parse_platform(request_id: &str, raw: &str) -> Result<Platform, ApiError> {
    Platform::from_str(raw).map_err(|e| ApiError::new(request_id, "validation_error", e.to_string()))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

fn protected_router(access: ApiAccess) -> Router<AppState> {
    Router::new()
        .route("/api/v1/platforms", get(list_platforms))
        .route("/api/v1/posts", post(posts::generate_post))
        .route("/api/v1/posts/edit", post(posts::edit_post))
        .route("/api/v1/posts/suggestions", post(posts::suggest_improvements))
        .route("/api/v1/images", post(images::generate_image))
        .route("/api/v1/topics/trending", get(topics::list_trending))
        .route("/api/v1/delivery/mailto", post(delivery::build_mailto))
        .layer(axum::middleware::from_fn_with_state(
            access,
            require_api_key,
        ))
}

pub fn build_app(state: AppState, access: ApiAccess) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(access))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(propagate_request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.pipeline.settings().ensure_credentials() {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    openai_key: true,
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: OpenAI credentials unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        openai_key: false,
                    },
                    meta,
                }),
            )
        }
    }
}

async fn list_platforms(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let items: Vec<PlatformItem> = state
        .pipeline
        .registry()
        .iter()
        .map(|profile| PlatformItem {
            platform: profile.platform,
            title: profile.platform.title(),
            max_length: profile.max_length,
            hashtag_limit: profile.hashtag_limit,
            style: profile.style,
        })
        .collect();
    ApiResponse::new(req_id.0, items)
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
