use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use wellpost_pipeline::{EditRequest, FailureKind, GenerationResult, PostRequest};

use super::{map_pipeline_error, parse_platform, ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct EditBody {
    post: String,
    instruction: String,
    platform: String,
}

#[derive(Debug, Serialize)]
pub(super) struct EditedPost {
    post: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SuggestionsBody {
    post: String,
    platform: String,
}

#[derive(Debug, Serialize)]
pub(super) struct Suggestions {
    suggestions: Vec<String>,
}

pub(super) async fn generate_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<PostRequest>,
) -> Result<Json<ApiResponse<GenerationResult>>, ApiError> {
    let result = state.pipeline.generate_post(&request).await;
    if result.success {
        return Ok(ApiResponse::new(req_id.0, result));
    }
    Err(ApiError::from_failure(
        req_id.0,
        result.failure.unwrap_or(FailureKind::BackendUnavailable),
        result.error,
    ))
}

pub(super) async fn edit_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<EditBody>,
) -> Result<Json<ApiResponse<EditedPost>>, ApiError> {
    let platform = parse_platform(&req_id.0, &body.platform)?;
    let request = EditRequest {
        original_body: body.post,
        instruction: body.instruction,
        platform,
    };
    let post = state
        .pipeline
        .edit_post(&request)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(req_id.0, EditedPost { post }))
}

pub(super) async fn suggest_improvements(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SuggestionsBody>,
) -> Result<Json<ApiResponse<Suggestions>>, ApiError> {
    let platform = parse_platform(&req_id.0, &body.platform)?;
    let suggestions = state
        .pipeline
        .suggest_improvements(&body.post, platform)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(req_id.0, Suggestions { suggestions }))
}
