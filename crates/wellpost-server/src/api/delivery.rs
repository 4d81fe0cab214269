use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use wellpost_pipeline::{mailto_link, MailtoMessage};

use super::{parse_platform, ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct MailtoBody {
    post: String,
    topic: String,
    platform: String,
    #[serde(default)]
    subject_line: Option<String>,
    #[serde(default)]
    image_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct MailtoLink {
    link: String,
}

pub(super) async fn build_mailto(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<MailtoBody>,
) -> Result<Json<ApiResponse<MailtoLink>>, ApiError> {
    let platform = parse_platform(&req_id.0, &body.platform)?;
    let message = MailtoMessage {
        recipient: state.mail_recipient.as_deref(),
        post: &body.post,
        topic: &body.topic,
        subject_line: body.subject_line.as_deref(),
        image_path: body.image_path.as_deref(),
    };
    let link = mailto_link(&message, platform);
    Ok(ApiResponse::new(req_id.0, MailtoLink { link }))
}
