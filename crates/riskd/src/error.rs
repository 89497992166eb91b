//! Error types for riskd.
//!
//! Every request-level failure leaves the daemon as the uniform
//! `{ "success": false, "error": ... }` envelope.

use crate::llm_client::LlmError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use risk_shared::AnalyzeResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    /// Narrative call failed, timed out or returned an unusable reply
    #[error("{0}")]
    AnalysisFailure(String),

    #[error("Access denied")]
    AccessDenied,

    /// Request body was not decodable JSON
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request body too large")]
    PayloadTooLarge,
}

impl RiskError {
    pub fn status(&self) -> StatusCode {
        match self {
            RiskError::AnalysisFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RiskError::AccessDenied => StatusCode::FORBIDDEN,
            RiskError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RiskError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl From<LlmError> for RiskError {
    fn from(e: LlmError) -> Self {
        RiskError::AnalysisFailure(e.to_string())
    }
}

impl IntoResponse for RiskError {
    fn into_response(self) -> Response {
        (self.status(), Json(AnalyzeResponse::failure(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RiskError::AnalysisFailure("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(RiskError::AccessDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            RiskError::InvalidRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RiskError::PayloadTooLarge.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[tokio::test]
    async fn test_payload_too_large_uses_envelope() {
        use http_body_util::BodyExt;

        let response = RiskError::PayloadTooLarge.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"success": false, "error": "Request body too large"})
        );
    }

    #[test]
    fn test_llm_error_message_carried() {
        let err: RiskError = LlmError::Timeout(30).into();
        assert!(matches!(err, RiskError::AnalysisFailure(_)));
        assert_eq!(err.to_string(), "Request timeout after 30 seconds");
    }
}
