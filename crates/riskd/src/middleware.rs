//! Request middleware for body limits and the access-token gate.

use crate::config::mask_secret;
use crate::error::RiskError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Header carrying the shared access token
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Access gate state. With no token configured every request passes.
#[derive(Clone, Default)]
pub struct AccessGate {
    token: Option<Arc<str>>,
}

impl AccessGate {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.map(Arc::from),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    /// Exact string comparison against the configured token
    pub fn allows(&self, presented: Option<&str>) -> bool {
        match &self.token {
            None => true,
            Some(expected) => presented == Some(expected.as_ref()),
        }
    }
}

/// Access-token middleware
///
/// Rejects with 403 unless `X-ACCESS-TOKEN` matches the configured token.
pub async fn require_access_token(
    State(gate): State<AccessGate>,
    request: Request,
    next: Next,
) -> Result<Response, RiskError> {
    let presented = request
        .headers()
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    if !gate.allows(presented) {
        warn!(
            "Access denied for {} (token: {})",
            request.uri().path(),
            presented.map(mask_secret).unwrap_or_else(|| "none".to_string())
        );
        return Err(RiskError::AccessDenied);
    }

    Ok(next.run(request).await)
}

/// Body size limit middleware
///
/// Checks Content-Length and rejects requests exceeding `max_bytes` with 413.
/// Bodies without a length are caught by `DefaultBodyLimit` during decode.
pub async fn body_size_limit(
    State(max_bytes): State<usize>,
    request: Request,
    next: Next,
) -> Result<Response, RiskError> {
    if let Some(length) = request
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok())
    {
        if length > max_bytes {
            warn!("Request body too large: {} bytes (max: {})", length, max_bytes);
            return Err(RiskError::PayloadTooLarge);
        }
        debug!("Request body {} bytes", length);
    }

    Ok(next.run(request).await)
}
