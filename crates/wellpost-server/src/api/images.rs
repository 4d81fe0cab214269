use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use wellpost_pipeline::ImageAsset;

use super::{map_pipeline_error, parse_platform, ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct ImageBody {
    topic: String,
    platform: String,
    #[serde(default)]
    subject_line: Option<String>,
}

/// Image failures degrade inside the asset (no path, or the placeholder),
/// so only validation and configuration errors produce an error response.
pub(super) async fn generate_image(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ImageBody>,
) -> Result<Json<ApiResponse<ImageAsset>>, ApiError> {
    let platform = parse_platform(&req_id.0, &body.platform)?;
    let asset = state
        .pipeline
        .generate_image(&body.topic, platform, body.subject_line.as_deref())
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(req_id.0, asset))
}
