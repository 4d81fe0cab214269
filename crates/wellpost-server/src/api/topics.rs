use axum::{extract::State, Extension, Json};
use serde::Serialize;

use super::{map_pipeline_error, ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct TrendingTopics {
    topics: Vec<String>,
}

pub(super) async fn list_trending(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<TrendingTopics>>, ApiError> {
    let topics = state
        .pipeline
        .trending_topics()
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(req_id.0, TrendingTopics { topics }))
}
