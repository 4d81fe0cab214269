//! Request-scoped layers: request id propagation and API key access control
//! for the generation routes.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;
use wellpost_core::{AppConfig, Environment};

use crate::api::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id for one request, stored as a request extension and echoed
/// in both the response header and the envelope `meta`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuses a caller-supplied id, otherwise mints a `UUIDv4`.
    fn from_headers(headers: &HeaderMap) -> Self {
        let supplied = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty());
        Self(supplied.map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned))
    }
}

/// Who may call the generation routes. Health stays public either way so a
/// monitor can see a degraded instance.
#[derive(Debug, Clone)]
pub enum ApiAccess {
    /// No keys configured in development.
    Open,
    Keys(Arc<HashSet<String>>),
}

impl ApiAccess {
    /// Every generation call spends OpenAI quota, so outside development an
    /// empty `WELLPOST_API_KEYS` is a startup error.
    ///
    /// # Errors
    ///
    /// Returns an error when no keys are configured and the environment is
    /// not development.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        if !config.api_keys.is_empty() {
            return Ok(Self::Keys(Arc::new(
                config.api_keys.iter().cloned().collect(),
            )));
        }
        if config.env == Environment::Development {
            tracing::warn!("WELLPOST_API_KEYS is empty; generation routes are open");
            return Ok(Self::Open);
        }
        anyhow::bail!(
            "WELLPOST_API_KEYS must list at least one key when WELLPOST_ENV={}",
            config.env
        )
    }

    fn admits(&self, headers: &HeaderMap) -> bool {
        match self {
            Self::Open => true,
            Self::Keys(keys) => presented_key(headers).is_some_and(|key| keys.contains(key)),
        }
    }
}

/// Token from `Authorization: Bearer <key>`; the scheme is case-insensitive.
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    let (scheme, key) = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .split_once(' ')?;
    let key = key.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !key.is_empty()).then_some(key)
}

pub async fn propagate_request_id(mut req: Request, next: Next) -> Response {
    let id = RequestId::from_headers(req.headers());
    let echoed = HeaderValue::from_str(&id.0).ok();
    req.extensions_mut().insert(id);

    let mut res = next.run(req).await;
    if let Some(value) = echoed {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

/// Rejects callers without a configured key using the regular error
/// envelope, so clients parse 401s like any other failure.
pub async fn require_api_key(
    State(access): State<ApiAccess>,
    req: Request,
    next: Next,
) -> Response {
    if access.admits(req.headers()) {
        return next.run(req).await;
    }

    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    tracing::warn!(
        request_id = %request_id,
        path = %req.uri().path(),
        "rejected request without a valid API key"
    );
    ApiError::new(request_id, "unauthorized", "missing or invalid bearer token").into_response()
}
